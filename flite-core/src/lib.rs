pub mod cabin;
pub mod passenger;

pub use cabin::{CabinGeometry, Seat};
pub use passenger::{truncate_name, NewPassenger, PassengerId, PassengerRecord, SeatClass, TripId, NAME_MAX_LEN};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown seat class: {0}")]
    UnknownSeatClass(String),
    #[error("Invalid cabin geometry: {0}")]
    InvalidGeometry(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
