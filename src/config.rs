use crate::error::InsightError;
use dotenvy::dotenv;
use std::str::FromStr;

fn default_max_file_size() -> u64 {
    // 64 MB in bytes
    64 * 1024 * 1024
}

fn default_sniff_bytes() -> usize {
    10 * 1024
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub max_file_size: u64,
    /// How much of the file the loader inspects to guess the dialect.
    pub sniff_bytes: usize,
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            sniff_bytes: default_sniff_bytes(),
            parallel: default_parallel(),
        }
    }
}

impl Config {
    /// Reads `.env` first, then the process environment.
    pub fn new() -> Result<Self, InsightError> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, InsightError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Config {
            max_file_size: parse_var(&lookup, "CSV_INSIGHT_MAX_FILE_SIZE")?
                .unwrap_or(defaults.max_file_size),
            sniff_bytes: parse_var(&lookup, "CSV_INSIGHT_SNIFF_BYTES")?
                .unwrap_or(defaults.sniff_bytes),
            parallel: parse_var(&lookup, "CSV_INSIGHT_PARALLEL")?
                .unwrap_or(defaults.parallel),
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, InsightError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| InsightError::Config(format!("{}={:?}: {}", key, raw, e))),
    }
}
