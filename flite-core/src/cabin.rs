use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CoreError, CoreResult, TripId};

/// Seat map shared by every trip in the fleet: `rows` numbered rows of
/// `columns` lettered seats starting at `A`.
///
/// Only `new` (or deserializing through it) builds one, so a geometry in hand
/// always has at least one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CabinDimensions")]
pub struct CabinGeometry {
    rows: u32,
    columns: u32,
}

#[derive(Deserialize)]
struct CabinDimensions {
    rows: u32,
    columns: u32,
}

impl TryFrom<CabinDimensions> for CabinGeometry {
    type Error = CoreError;

    fn try_from(dimensions: CabinDimensions) -> CoreResult<Self> {
        Self::new(dimensions.rows, dimensions.columns)
    }
}

impl CabinGeometry {
    pub const DEFAULT_ROWS: u32 = 40;
    pub const DEFAULT_COLUMNS: u32 = 6;

    pub fn new(rows: u32, columns: u32) -> CoreResult<Self> {
        let geometry = Self { rows, columns };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    fn validate(&self) -> CoreResult<()> {
        if self.rows == 0 {
            return Err(CoreError::InvalidGeometry("cabin needs at least one row".to_string()));
        }
        if self.columns == 0 || self.columns > 26 {
            return Err(CoreError::InvalidGeometry(format!(
                "cabin columns must be between 1 and 26, got {}",
                self.columns
            )));
        }
        if self.rows.checked_mul(self.columns).is_none() {
            return Err(CoreError::InvalidGeometry(format!(
                "{} rows x {} columns overflows the seat count",
                self.rows, self.columns
            )));
        }
        Ok(())
    }

    /// Number of seats a single trip can hold.
    pub fn seats_per_trip(&self) -> u32 {
        self.rows.saturating_mul(self.columns)
    }

    /// Zero-based row check.
    pub fn contains_row(&self, row: i64) -> bool {
        row >= 0 && row < i64::from(self.rows)
    }

    /// Position of a column letter in the cabin alphabet, case-insensitive.
    pub fn column_index(&self, column: char) -> Option<usize> {
        let upper = column.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return None;
        }
        let index = (upper as u8 - b'A') as usize;
        (index < self.columns as usize).then_some(index)
    }

    pub fn column_letter(&self, index: usize) -> Option<char> {
        (index < self.columns.min(26) as usize).then(|| (b'A' + index as u8) as char)
    }

    pub fn column_letters(&self) -> impl Iterator<Item = char> + '_ {
        (0..self.columns as usize).filter_map(move |i| self.column_letter(i))
    }

    /// Trip a dataset line falls into before any collision handling.
    /// `ordinal` is the 1-based position of the line among the data lines.
    pub fn base_trip(&self, ordinal: u64) -> TripId {
        let per_trip = u64::from(self.seats_per_trip().max(1));
        let trip = 1 + ordinal.saturating_sub(1) / per_trip;
        TripId::try_from(trip).unwrap_or(TripId::MAX)
    }
}

impl Default for CabinGeometry {
    fn default() -> Self {
        Self {
            rows: Self::DEFAULT_ROWS,
            columns: Self::DEFAULT_COLUMNS,
        }
    }
}

impl fmt::Display for CabinGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self
            .columns
            .checked_sub(1)
            .and_then(|i| self.column_letter(i as usize))
            .unwrap_or('A');
        write!(f, "{} rows x A-{}", self.rows, last)
    }
}

/// A seat on a specific trip. Row is zero-based, column is uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Seat {
    pub trip: TripId,
    pub row: u32,
    pub column: char,
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row + 1, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let cabin = CabinGeometry::default();
        assert_eq!(cabin.seats_per_trip(), 240);
        assert_eq!(cabin.column_letters().collect::<String>(), "ABCDEF");
        assert_eq!(cabin.to_string(), "40 rows x A-F");
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        assert!(CabinGeometry::new(0, 6).is_err());
        assert!(CabinGeometry::new(10, 0).is_err());
        assert!(CabinGeometry::new(10, 27).is_err());
        assert!(CabinGeometry::new(u32::MAX, 26).is_err());
        assert!(CabinGeometry::new(2, 2).is_ok());
    }

    #[test]
    fn test_deserialize_goes_through_validation() {
        let cabin: CabinGeometry = serde_json::from_str(r#"{"rows":2,"columns":3}"#).unwrap();
        assert_eq!(cabin, CabinGeometry::new(2, 3).unwrap());
        assert_eq!((cabin.rows(), cabin.columns()), (2, 3));

        let err = serde_json::from_str::<CabinGeometry>(r#"{"rows":1,"columns":0}"#).unwrap_err();
        assert!(err.to_string().contains("between 1 and 26"));
        assert!(serde_json::from_str::<CabinGeometry>(r#"{"rows":0,"columns":6}"#).is_err());
    }

    #[test]
    fn test_column_index_is_case_insensitive() {
        let cabin = CabinGeometry::default();
        assert_eq!(cabin.column_index('a'), Some(0));
        assert_eq!(cabin.column_index('F'), Some(5));
        assert_eq!(cabin.column_index('g'), None);
        assert_eq!(cabin.column_index('1'), None);
        assert_eq!(cabin.column_index('é'), None);
    }

    #[test]
    fn test_row_bounds() {
        let cabin = CabinGeometry::new(2, 2).unwrap();
        assert!(cabin.contains_row(0));
        assert!(cabin.contains_row(1));
        assert!(!cabin.contains_row(2));
        assert!(!cabin.contains_row(-1));
    }

    #[test]
    fn test_base_trip_partitions_by_position() {
        let cabin = CabinGeometry::new(2, 2).unwrap();
        let trips: Vec<TripId> = (1..=9).map(|ordinal| cabin.base_trip(ordinal)).collect();
        assert_eq!(trips, vec![1, 1, 1, 1, 2, 2, 2, 2, 3]);
    }

    #[test]
    fn test_seat_display_is_one_based() {
        let seat = Seat { trip: 3, row: 11, column: 'C' };
        assert_eq!(seat.to_string(), "12C");
    }
}
