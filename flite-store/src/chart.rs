use flite_core::{CabinGeometry, PassengerRecord, TripId};

/// Per-seat occupancy of one trip, row-major.
#[derive(Debug, Clone)]
pub struct SeatingChart<'a> {
    trip_id: TripId,
    geometry: CabinGeometry,
    cells: Vec<Option<&'a PassengerRecord>>,
}

impl<'a> SeatingChart<'a> {
    pub(crate) fn empty(trip_id: TripId, geometry: CabinGeometry) -> Self {
        let size = geometry.seats_per_trip() as usize;
        Self {
            trip_id,
            geometry,
            cells: vec![None; size],
        }
    }

    pub(crate) fn place(&mut self, row: usize, column: usize, record: &'a PassengerRecord) {
        let width = self.geometry.columns() as usize;
        if row < self.geometry.rows() as usize && column < width {
            self.cells[row * width + column] = Some(record);
        }
    }

    pub fn trip_id(&self) -> TripId {
        self.trip_id
    }

    pub fn geometry(&self) -> &CabinGeometry {
        &self.geometry
    }

    /// Occupant of a seat, by zero-based row and column index.
    pub fn get(&self, row: usize, column: usize) -> Option<&'a PassengerRecord> {
        let width = self.geometry.columns() as usize;
        if column >= width {
            return None;
        }
        self.cells.get(row * width + column).copied().flatten()
    }

    /// Rows in cabin order, each one slot per column.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<&'a PassengerRecord>]> {
        self.cells.chunks(self.geometry.columns() as usize)
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn available(&self) -> usize {
        self.cells.len() - self.occupied()
    }
}

#[cfg(test)]
mod tests {
    use crate::ReservationStore;
    use flite_core::{CabinGeometry, NewPassenger};

    fn book(store: &mut ReservationStore, id: i64, trip: i64, row: i64, column: char) {
        store
            .insert(NewPassenger {
                passenger_id: id,
                trip_id: trip,
                name: format!("P{}", id),
                seat_row: row,
                seat_column: column,
                seat_class: "Economy".to_string(),
            })
            .unwrap();
    }

    #[test]
    fn test_chart_exposes_every_seat_in_a_row() {
        let mut store = ReservationStore::new(CabinGeometry::new(3, 4).unwrap());
        book(&mut store, 1, 1, 0, 'A');
        book(&mut store, 2, 1, 0, 'C');
        book(&mut store, 3, 1, 0, 'D');
        book(&mut store, 4, 1, 2, 'b');
        book(&mut store, 5, 2, 1, 'A');

        let chart = store.seating_chart(1);
        assert_eq!(chart.trip_id(), 1);
        assert_eq!(chart.occupied(), 4);
        assert_eq!(chart.available(), 8);

        assert_eq!(chart.get(0, 0).map(|r| r.passenger_id), Some(1));
        assert!(chart.get(0, 1).is_none());
        assert_eq!(chart.get(0, 2).map(|r| r.passenger_id), Some(2));
        assert_eq!(chart.get(0, 3).map(|r| r.passenger_id), Some(3));
        assert_eq!(chart.get(2, 1).map(|r| r.passenger_id), Some(4));
        assert!(chart.get(1, 0).is_none());
        assert!(chart.get(0, 4).is_none());
        assert!(chart.get(3, 0).is_none());

        let layout: Vec<String> = chart
            .rows()
            .map(|row| row.iter().map(|c| if c.is_some() { 'X' } else { 'O' }).collect())
            .collect();
        assert_eq!(layout, vec!["XOXX", "OOOO", "OXOO"]);
    }

    #[test]
    fn test_chart_for_empty_trip() {
        let store = ReservationStore::default();
        let chart = store.seating_chart(12);
        assert_eq!(chart.occupied(), 0);
        assert_eq!(chart.rows().count(), 40);
        assert!(chart.rows().all(|row| row.len() == 6));
    }
}
