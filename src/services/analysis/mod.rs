pub mod analyzer;
pub mod types;
pub mod utils;

pub use analyzer::{ColumnClassifier, FileAggregator};
pub use types::{ColumnProfile, ColumnType, Dataset, FileSummary, NumericStats, SAMPLE_SIZE};
