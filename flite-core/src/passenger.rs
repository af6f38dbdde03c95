use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cabin::Seat;
use crate::CoreError;

pub type PassengerId = u32;
pub type TripId = u32;

/// Longest name kept on a record, in characters.
pub const NAME_MAX_LEN: usize = 49;

/// Cabin class. Parsing is exact-case: only `Economy`, `Business` and `First`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatClass {
    Economy,
    Business,
    First,
}

impl SeatClass {
    pub const ALL: [SeatClass; 3] = [SeatClass::Economy, SeatClass::Business, SeatClass::First];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeatClass::Economy => "Economy",
            SeatClass::Business => "Business",
            SeatClass::First => "First",
        }
    }
}

impl FromStr for SeatClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeatClass::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| CoreError::UnknownSeatClass(s.to_string()))
    }
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One committed reservation. Records only come out of the store by shared
/// reference and are never edited after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassengerRecord {
    pub passenger_id: PassengerId,
    pub trip_id: TripId,
    pub name: String,
    /// Zero-based.
    pub seat_row: u32,
    /// Uppercase column letter.
    pub seat_column: char,
    pub seat_class: SeatClass,
}

impl PassengerRecord {
    pub fn seat(&self) -> Seat {
        Seat {
            trip: self.trip_id,
            row: self.seat_row,
            column: self.seat_column,
        }
    }
}

/// Unvalidated insert request, as typed in by an operator or produced by the
/// loader. Numeric fields are wide so that out-of-range input reaches the
/// store's validation instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassenger {
    pub passenger_id: i64,
    pub trip_id: i64,
    pub name: String,
    /// Zero-based.
    pub seat_row: i64,
    pub seat_column: char,
    pub seat_class: String,
}

/// Cuts a name down to [`NAME_MAX_LEN`] characters.
pub fn truncate_name(name: &str) -> String {
    match name.char_indices().nth(NAME_MAX_LEN) {
        Some((end, _)) => name[..end].to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_class_exact_case() {
        assert_eq!("Economy".parse::<SeatClass>().unwrap(), SeatClass::Economy);
        assert_eq!("Business".parse::<SeatClass>().unwrap(), SeatClass::Business);
        assert_eq!("First".parse::<SeatClass>().unwrap(), SeatClass::First);
        assert!("economy".parse::<SeatClass>().is_err());
        assert!("FIRST".parse::<SeatClass>().is_err());
        assert!("".parse::<SeatClass>().is_err());
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Ada Lovelace"), "Ada Lovelace");

        let long = "x".repeat(80);
        assert_eq!(truncate_name(&long).chars().count(), NAME_MAX_LEN);

        // Multi-byte characters are cut on a char boundary
        let accented = "é".repeat(60);
        let cut = truncate_name(&accented);
        assert_eq!(cut.chars().count(), NAME_MAX_LEN);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_record_serialization() {
        let record = PassengerRecord {
            passenger_id: 7,
            trip_id: 2,
            name: "Grace Hopper".to_string(),
            seat_row: 0,
            seat_column: 'B',
            seat_class: SeatClass::Business,
        };
        let json = serde_json::to_value(&record).expect("Failed to serialize");
        assert_eq!(json["passenger_id"], 7);
        assert_eq!(json["seat_column"], "B");
        assert_eq!(json["seat_class"], "Business");
        assert_eq!(record.seat().to_string(), "1B");
    }
}
