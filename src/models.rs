use crate::services::analysis::FileSummary;
use crate::services::file_processor::Dialect;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the presenter renders: the summary plus where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub file_name: String,
    pub analyzed_at: DateTime<Utc>,
    pub dialect: Dialect,
    pub summary: FileSummary,
}

impl AnalysisReport {
    pub fn new(file_name: String, dialect: Dialect, summary: FileSummary) -> Self {
        Self {
            file_name,
            analyzed_at: Utc::now(),
            dialect,
            summary,
        }
    }
}
