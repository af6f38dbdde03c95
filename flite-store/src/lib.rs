pub mod app_config;
pub mod chart;
pub mod dataset;
pub mod ledger;
pub mod loader;

pub use chart::SeatingChart;
pub use dataset::{load_dataset, DatasetReader, LineError, LoadError};
pub use ledger::{CancelError, InsertError, ReservationStore};
pub use loader::{BulkLoader, LoadReport, RawCandidate};
