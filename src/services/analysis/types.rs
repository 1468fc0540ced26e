use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

pub const SAMPLE_SIZE: usize = 5;

/// Header plus data rows, as produced by the loader.
///
/// Rows are not required to match the header length; see
/// [`FileAggregator`](super::FileAggregator) for how ragged rows are treated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    Text,
    Mixed,
    Empty,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Number => "number",
            ColumnType::Text => "text",
            ColumnType::Mixed => "mixed",
            ColumnType::Empty => "empty",
        }
    }

    /// True when the column holds at least one numeric value.
    pub fn has_numbers(self) -> bool {
        matches!(self, ColumnType::Number | ColumnType::Mixed)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Range and average over every numeric value of a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub inferred_type: ColumnType,
    pub unique_count: usize,
    pub empty_count: usize,
    /// Share of empty fields, 0 to 100, one decimal place.
    pub empty_percentage: f64,
    pub sample_values: SmallVec<[String; SAMPLE_SIZE]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub row_count: usize,
    pub column_count: usize,
    /// Rows whose field count differed from the header length.
    pub ragged_rows: usize,
    pub columns: Vec<ColumnProfile>,
}

impl FileSummary {
    /// Looks up a column by its 1-based display position.
    pub fn column(&self, position: usize) -> Option<&ColumnProfile> {
        position.checked_sub(1).and_then(|idx| self.columns.get(idx))
    }
}
