//! Data module - CSV loading and make tallying

mod loader;
mod tally;

pub use loader::{load_vehicle_data, row_count};
pub use tally::{BucketPolicy, EntryKind, MakeSeries, MakeTally, SeriesEntry};
