use flite_core::{
    truncate_name, CabinGeometry, NewPassenger, PassengerId, PassengerRecord, Seat, SeatClass,
    TripId,
};
use std::collections::BTreeSet;

use crate::chart::SeatingChart;

/// In-memory reservation ledger for every trip of one cabin layout.
///
/// Records are kept in insertion order. Every query is a linear scan, which
/// keeps manifests deterministic and mirrors the order the dataset was read in.
///
/// After every operation:
/// - passenger IDs are unique across the store
/// - no two records on the same trip hold the same seat
/// - every seat lies inside the cabin geometry
#[derive(Debug, Clone)]
pub struct ReservationStore {
    geometry: CabinGeometry,
    records: Vec<PassengerRecord>,
}

impl ReservationStore {
    pub fn new(geometry: CabinGeometry) -> Self {
        Self {
            geometry,
            records: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &CabinGeometry {
        &self.geometry
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PassengerRecord> {
        self.records.iter()
    }

    pub fn find_by_passenger_id(&self, passenger_id: PassengerId) -> Option<&PassengerRecord> {
        self.records.iter().find(|r| r.passenger_id == passenger_id)
    }

    /// Column is compared case-insensitively.
    pub fn is_seat_taken(&self, trip_id: TripId, row: u32, column: char) -> bool {
        let column = column.to_ascii_uppercase();
        self.records
            .iter()
            .any(|r| r.trip_id == trip_id && r.seat_row == row && r.seat_column == column)
    }

    pub fn list_by_trip(&self, trip_id: TripId) -> Vec<&PassengerRecord> {
        self.records.iter().filter(|r| r.trip_id == trip_id).collect()
    }

    pub fn list_by_trip_and_class(&self, trip_id: TripId, class: SeatClass) -> Vec<&PassengerRecord> {
        self.records
            .iter()
            .filter(|r| r.trip_id == trip_id && r.seat_class == class)
            .collect()
    }

    /// Full per-seat occupancy of a trip.
    pub fn seating_chart(&self, trip_id: TripId) -> SeatingChart<'_> {
        let mut chart = SeatingChart::empty(trip_id, self.geometry);
        for record in self.records.iter().filter(|r| r.trip_id == trip_id) {
            if let Some(column) = self.geometry.column_index(record.seat_column) {
                chart.place(record.seat_row as usize, column, record);
            }
        }
        chart
    }

    /// Distinct trip numbers in ascending order.
    pub fn trip_ids(&self) -> BTreeSet<TripId> {
        self.records.iter().map(|r| r.trip_id).collect()
    }

    /// Booked seats on a trip.
    pub fn occupancy(&self, trip_id: TripId) -> usize {
        self.records.iter().filter(|r| r.trip_id == trip_id).count()
    }

    /// Validate and append a reservation.
    ///
    /// Checks run in a fixed order and the first failure is returned; nothing
    /// is written unless every check passes.
    pub fn insert(&mut self, candidate: NewPassenger) -> Result<PassengerId, InsertError> {
        let passenger_id = PassengerId::try_from(candidate.passenger_id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or(InsertError::InvalidPassengerId(candidate.passenger_id))?;

        if self.find_by_passenger_id(passenger_id).is_some() {
            return Err(InsertError::DuplicatePassenger(passenger_id));
        }

        let trip_id = TripId::try_from(candidate.trip_id)
            .ok()
            .filter(|trip| *trip >= 1)
            .ok_or(InsertError::InvalidTrip(candidate.trip_id))?;

        if !self.geometry.contains_row(candidate.seat_row) {
            return Err(InsertError::InvalidSeatRow {
                row: candidate.seat_row,
                rows: self.geometry.rows(),
            });
        }
        // contains_row bounds the row by a u32
        let seat_row = candidate.seat_row as u32;

        if self.geometry.column_index(candidate.seat_column).is_none() {
            return Err(InsertError::InvalidSeatColumn(candidate.seat_column));
        }
        let seat_column = candidate.seat_column.to_ascii_uppercase();

        if self.is_seat_taken(trip_id, seat_row, seat_column) {
            return Err(InsertError::SeatTaken(Seat {
                trip: trip_id,
                row: seat_row,
                column: seat_column,
            }));
        }

        let seat_class: SeatClass = candidate
            .seat_class
            .parse()
            .map_err(|_| InsertError::InvalidClass(candidate.seat_class.clone()))?;

        self.records.push(PassengerRecord {
            passenger_id,
            trip_id,
            name: truncate_name(&candidate.name),
            seat_row,
            seat_column,
            seat_class,
        });
        tracing::debug!(passenger_id, trip_id, seat_row, %seat_column, "Reservation added");

        Ok(passenger_id)
    }

    /// Remove a reservation, keeping the order of everything else.
    pub fn cancel(&mut self, passenger_id: PassengerId) -> Result<PassengerRecord, CancelError> {
        let position = self
            .records
            .iter()
            .position(|r| r.passenger_id == passenger_id)
            .ok_or(CancelError::NotFound(passenger_id))?;

        let removed = self.records.remove(position);
        tracing::debug!(passenger_id, trip_id = removed.trip_id, "Reservation cancelled");
        Ok(removed)
    }
}

impl Default for ReservationStore {
    fn default() -> Self {
        Self::new(CabinGeometry::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InsertError {
    #[error("Passenger ID must be positive, got {0}")]
    InvalidPassengerId(i64),

    #[error("Passenger ID {0} already exists")]
    DuplicatePassenger(PassengerId),

    #[error("Trip number must be 1 or above, got {0}")]
    InvalidTrip(i64),

    #[error("Seat row {} is outside rows 1-{rows}", .row + 1)]
    InvalidSeatRow { row: i64, rows: u32 },

    #[error("Seat column '{0}' is not in this cabin")]
    InvalidSeatColumn(char),

    #[error("Seat {0} is already taken on trip {trip}", trip = .0.trip)]
    SeatTaken(Seat),

    #[error("Invalid class '{0}', expected Economy, Business or First")]
    InvalidClass(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CancelError {
    #[error("Passenger {0} not found")]
    NotFound(PassengerId),
}
