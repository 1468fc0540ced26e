use super::types::*;
use super::utils::*;
use rayon::prelude::*;
use smallvec::SmallVec;
use std::collections::HashSet;

/// Profiles the values found at one column position.
pub struct ColumnClassifier;

impl ColumnClassifier {
    /// Classifies a column in a single pass over its values.
    ///
    /// Whitespace-only fields count as empty. Distinct values are compared by
    /// their original text, so `"1"` and `"1.0"` are two different values.
    pub fn classify<'a, I>(name: &str, values: I) -> ColumnProfile
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut row_count = 0;
        let mut empty_count = 0;
        let mut has_number = false;
        let mut has_text = false;
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut sample_values = SmallVec::<[String; SAMPLE_SIZE]>::new();
        let mut numbers = NumericAccumulator::default();

        for value in values {
            row_count += 1;
            if is_blank(value) {
                empty_count += 1;
                continue;
            }

            match parse_number(value) {
                Some(number) => {
                    has_number = true;
                    numbers.push(number);
                }
                None => has_text = true,
            }

            if seen.insert(value) && sample_values.len() < SAMPLE_SIZE {
                sample_values.push(value.to_string());
            }
        }

        let inferred_type = match (has_number, has_text) {
            (false, false) => ColumnType::Empty,
            (true, false) => ColumnType::Number,
            (false, true) => ColumnType::Text,
            (true, true) => ColumnType::Mixed,
        };

        ColumnProfile {
            name: name.to_string(),
            inferred_type,
            unique_count: seen.len(),
            empty_count,
            empty_percentage: round_percentage(empty_count, row_count),
            sample_values,
            numeric: numbers.finish(),
        }
    }
}

/// Builds a [`FileSummary`] by classifying every header position.
///
/// Rows shorter than the header read as empty at the missing positions and
/// fields beyond the header are ignored, so a ragged row never aborts the
/// analysis.
#[derive(Debug, Clone, Copy)]
pub struct FileAggregator {
    parallel: bool,
}

impl Default for FileAggregator {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl FileAggregator {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    pub fn sequential() -> Self {
        Self::new(false)
    }

    pub fn analyze(&self, dataset: &Dataset) -> FileSummary {
        let start = std::time::Instant::now();
        let width = dataset.column_count();

        let ragged_rows = dataset.rows.iter()
            .filter(|row| row.len() != width)
            .count();
        if ragged_rows > 0 {
            tracing::debug!(
                "{} of {} rows do not have {} fields; padding or truncating",
                ragged_rows,
                dataset.row_count(),
                width
            );
        }

        let columns: Vec<ColumnProfile> = if self.parallel {
            (0..width).into_par_iter()
                .map(|idx| profile_column(dataset, idx))
                .collect()
        } else {
            (0..width)
                .map(|idx| profile_column(dataset, idx))
                .collect()
        };

        tracing::info!(
            "Analyzed {} rows x {} columns in {:?}",
            dataset.row_count(),
            width,
            start.elapsed()
        );

        FileSummary {
            row_count: dataset.row_count(),
            column_count: width,
            ragged_rows,
            columns,
        }
    }
}

fn profile_column(dataset: &Dataset, idx: usize) -> ColumnProfile {
    let values = dataset.rows.iter()
        .map(|row| row.get(idx).map_or("", String::as_str));
    ColumnClassifier::classify(&dataset.header[idx], values)
}
