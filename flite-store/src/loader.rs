use chrono::{DateTime, Utc};
use flite_core::{NewPassenger, PassengerId, TripId};
use serde::Serialize;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::dataset::LineError;
use crate::ledger::{InsertError, ReservationStore};

/// A dataset line after field parsing, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    /// 1-based line position after the header. Blank lines count.
    pub ordinal: u64,
    pub passenger_id: i64,
    pub name: String,
    /// 1-based, as written in the dataset.
    pub seat_row: i64,
    pub seat_column: char,
    pub seat_class: String,
}

/// Outcome of a bulk load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub inserted: usize,
    /// Records that ended up on a later trip than their line position implies.
    pub displaced: usize,
    pub skipped: usize,
    pub elapsed: Duration,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
enum SkipReason {
    #[error("{0}")]
    Malformed(LineError),
    #[error("passenger ID {0} is not positive")]
    InvalidPassengerId(i64),
    #[error("passenger ID {0} already seen in this load")]
    DuplicateInLoad(i64),
    #[error("seat row {0} is out of range")]
    RowOutOfRange(i64),
    #[error("{0}")]
    Rejected(InsertError),
}

/// Best-effort ingestion of dataset lines into a store.
///
/// Trips are assigned from line position: each block of `seats_per_trip`
/// lines shares a base trip. When a line's seat is already booked on that
/// trip, it moves to the next trip number until the seat is free. There is no
/// upper bound on how far a line can move.
#[derive(Debug, Default)]
pub struct BulkLoader {
    seen: HashSet<PassengerId>,
}

impl BulkLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run<I>(&mut self, store: &mut ReservationStore, candidates: I) -> LoadReport
    where
        I: IntoIterator<Item = Result<RawCandidate, LineError>>,
    {
        let started = Instant::now();
        let mut inserted = 0;
        let mut displaced = 0;
        let mut skipped = 0;

        for candidate in candidates {
            let ordinal = match &candidate {
                Ok(c) => c.ordinal,
                Err(e) => e.ordinal(),
            };
            match self.admit(store, candidate) {
                Ok(moved) => {
                    inserted += 1;
                    if moved {
                        displaced += 1;
                    }
                }
                Err(reason) => {
                    skipped += 1;
                    tracing::debug!(ordinal, %reason, "Skipping dataset line");
                }
            }
        }

        let report = LoadReport {
            inserted,
            displaced,
            skipped,
            elapsed: started.elapsed(),
            finished_at: Utc::now(),
        };
        tracing::info!(
            inserted = report.inserted,
            displaced = report.displaced,
            skipped = report.skipped,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Bulk load finished"
        );
        report
    }

    /// Returns whether the record was moved off its base trip.
    fn admit(
        &mut self,
        store: &mut ReservationStore,
        candidate: Result<RawCandidate, LineError>,
    ) -> Result<bool, SkipReason> {
        let candidate = candidate.map_err(SkipReason::Malformed)?;

        let passenger_id = PassengerId::try_from(candidate.passenger_id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or(SkipReason::InvalidPassengerId(candidate.passenger_id))?;
        if self.seen.contains(&passenger_id) {
            return Err(SkipReason::DuplicateInLoad(candidate.passenger_id));
        }

        let geometry = *store.geometry();
        let seat_row = candidate.seat_row.saturating_sub(1);
        if !geometry.contains_row(seat_row) {
            return Err(SkipReason::RowOutOfRange(candidate.seat_row));
        }

        let base_trip = geometry.base_trip(candidate.ordinal);
        let mut trip_id: TripId = base_trip;
        while store.is_seat_taken(trip_id, seat_row as u32, candidate.seat_column) {
            trip_id += 1;
        }

        store
            .insert(NewPassenger {
                passenger_id: candidate.passenger_id,
                trip_id: i64::from(trip_id),
                name: candidate.name,
                seat_row,
                seat_column: candidate.seat_column,
                seat_class: candidate.seat_class,
            })
            .map_err(SkipReason::Rejected)?;
        self.seen.insert(passenger_id);

        if trip_id != base_trip {
            tracing::trace!(passenger_id, base_trip, trip_id, "Seat collision, moved to later trip");
        }
        Ok(trip_id != base_trip)
    }
}

impl ReservationStore {
    /// Load dataset lines in order with a fresh duplicate filter.
    pub fn bulk_load<I>(&mut self, candidates: I) -> LoadReport
    where
        I: IntoIterator<Item = Result<RawCandidate, LineError>>,
    {
        BulkLoader::new().run(self, candidates)
    }
}
