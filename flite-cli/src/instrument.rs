use flite_core::PassengerRecord;
use flite_store::ReservationStore;
use serde::Serialize;
use std::mem;
use std::time::{Duration, Instant};

/// Run `f` and measure how long it took.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// `N ms (S seconds)`
pub fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    format!("{} ms ({} seconds)", ms, ms as f64 / 1000.0)
}

/// Approximate heap held by the store's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Footprint {
    pub records: usize,
    pub bytes: usize,
}

pub fn footprint(store: &ReservationStore) -> Footprint {
    let record_size = mem::size_of::<PassengerRecord>();
    let bytes = store
        .iter()
        .map(|record| record_size + record.name.capacity())
        .sum();
    Footprint {
        records: store.len(),
        bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flite_core::NewPassenger;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1500 ms (1.5 seconds)");
        assert_eq!(format_elapsed(Duration::from_micros(300)), "0 ms (0 seconds)");
    }

    #[test]
    fn test_timed_returns_value() {
        let (value, elapsed) = timed(|| 6 * 7);
        assert_eq!(value, 42);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_footprint_grows_with_records() {
        let mut store = ReservationStore::default();
        assert_eq!(footprint(&store), Footprint { records: 0, bytes: 0 });

        store
            .insert(NewPassenger {
                passenger_id: 1,
                trip_id: 1,
                name: "Katherine Johnson".to_string(),
                seat_row: 0,
                seat_column: 'A',
                seat_class: "First".to_string(),
            })
            .unwrap();
        let fp = footprint(&store);
        assert_eq!(fp.records, 1);
        assert!(fp.bytes >= mem::size_of::<PassengerRecord>() + "Katherine Johnson".len());
    }
}
