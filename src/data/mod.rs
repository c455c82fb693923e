//! Data module - CSV loading and typed records

mod loader;
mod record;

pub use loader::{LoaderError, RecordLoader, REQUIRED_COLUMNS};
pub use record::{AvocadoType, Record, SizeCategory, SizeVolumes, TOTAL_US};
