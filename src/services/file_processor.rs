use crate::config::Config;
use crate::error::InsightError;
use crate::models::AnalysisReport;
use crate::services::analysis::{Dataset, FileAggregator};
use crate::services::analysis::utils::{is_blank, is_numeric};
use bytes::Bytes;
use serde::Serialize;
use std::path::Path;

const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];
const HEADER_SNIFF_ROWS: usize = 20;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Overrides for what the loader would otherwise detect on its own.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub delimiter: Option<char>,
    pub has_header: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dialect {
    pub delimiter: char,
    pub has_header: bool,
}

pub async fn load_file_bytes(path: &Path, max_file_size: u64) -> Result<Bytes, InsightError> {
    let size = tokio::fs::metadata(path).await?.len();
    if size > max_file_size {
        return Err(InsightError::FileTooLarge { size, limit: max_file_size });
    }

    let data = tokio::fs::read(path).await?;
    tracing::info!("Read {} ({}KB)", path.display(), data.len() / 1024);
    Ok(Bytes::from(data))
}

/// Reads, tokenizes and profiles a file.
///
/// Parsing and classification are CPU bound and run on the blocking pool.
pub async fn analyze_file(
    path: &Path,
    config: &Config,
    options: &LoadOptions,
) -> Result<AnalysisReport, InsightError> {
    let start = std::time::Instant::now();
    let file_data = load_file_bytes(path, config.max_file_size).await?;

    let sniff_bytes = config.sniff_bytes;
    let aggregator = FileAggregator::new(config.parallel);
    let options = options.clone();
    let (dialect, summary) = tokio::task::spawn_blocking(move || {
        let (dataset, dialect) = parse_dataset(&file_data, &options, sniff_bytes)?;
        Ok::<_, InsightError>((dialect, aggregator.analyze(&dataset)))
    })
    .await??;

    tracing::info!("Analysis of {} completed in {:?}", path.display(), start.elapsed());
    Ok(AnalysisReport::new(display_name(path), dialect, summary))
}

pub fn parse_dataset(
    data: &[u8],
    options: &LoadOptions,
    sniff_bytes: usize,
) -> Result<(Dataset, Dialect), InsightError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    let delimiter = match options.delimiter {
        Some(d) => d,
        None => sniff_delimiter(data, sniff_bytes),
    };
    let delimiter_byte = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| InsightError::InvalidInput(format!("delimiter {:?} is not ASCII", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter_byte)
        .from_reader(data);

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        records.push(record.iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect());
    }

    if records.is_empty() {
        return Err(InsightError::InvalidInput("file is empty".to_string()));
    }

    let has_header = options.has_header
        .unwrap_or_else(|| sniff_header(&records));
    let dialect = Dialect { delimiter, has_header };
    tracing::info!(
        "Dialect: delimiter {:?}, header {}, {} records",
        dialect.delimiter,
        dialect.has_header,
        records.len()
    );

    let dataset = if has_header {
        let mut rows = records.into_iter();
        let header = rows.next().unwrap_or_default();
        Dataset::new(header, rows.collect())
    } else {
        let width = records.first().map_or(0, Vec::len);
        let header = (1..=width).map(|i| format!("Column {}", i)).collect();
        Dataset::new(header, records)
    };

    Ok((dataset, dialect))
}

/// Picks the candidate that appears on every sampled line with the most
/// consistent count. Falls back to a comma.
pub fn sniff_delimiter(data: &[u8], sniff_bytes: usize) -> char {
    let truncated = data.len() > sniff_bytes;
    let sample = String::from_utf8_lossy(&data[..data.len().min(sniff_bytes)]);

    let mut lines: Vec<&str> = sample.lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if truncated && lines.len() > 1 {
        lines.pop();
    }
    if lines.is_empty() {
        return ',';
    }

    let mut best: Option<(char, usize, usize)> = None;
    for candidate in CANDIDATE_DELIMITERS {
        let counts: Vec<usize> = lines.iter()
            .map(|line| count_unquoted(line, candidate))
            .collect();
        if counts.iter().any(|&c| c == 0) {
            continue;
        }

        let (mode, agreeing) = mode_of(&counts);
        let better = match best {
            None => true,
            Some((_, best_agreeing, best_mode)) => {
                agreeing > best_agreeing || (agreeing == best_agreeing && mode > best_mode)
            }
        };
        if better {
            best = Some((candidate, agreeing, mode));
        }
    }

    best.map_or(',', |(candidate, _, _)| candidate)
}

fn count_unquoted(line: &str, delimiter: char) -> usize {
    let mut in_quotes = false;
    line.chars()
        .filter(|&c| {
            if c == '"' {
                in_quotes = !in_quotes;
            }
            !in_quotes && c == delimiter
        })
        .count()
}

/// Most common value and how many entries share it. Ties go to the larger value.
fn mode_of(counts: &[usize]) -> (usize, usize) {
    let mut sorted = counts.to_vec();
    sorted.sort_unstable();

    let mut best = (0, 0);
    let mut iter = sorted.into_iter().peekable();
    while let Some(value) = iter.next() {
        let mut run = 1;
        while iter.next_if_eq(&value).is_some() {
            run += 1;
        }
        if run >= best.1 {
            best = (value, run);
        }
    }
    best
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellShape {
    Numeric,
    Length(usize),
}

/// Votes column by column on whether the first record is a header.
///
/// A column whose data cells are all numeric votes for a header when the
/// first cell is not numeric. A column whose data cells share one length
/// votes for a header when the first cell has a different length. A tie
/// keeps the header, since most files carry one.
pub fn sniff_header(records: &[Vec<String>]) -> bool {
    let Some((first, rest)) = records.split_first() else {
        return false;
    };
    let rest: Vec<&Vec<String>> = rest.iter()
        .filter(|row| row.len() == first.len())
        .take(HEADER_SNIFF_ROWS)
        .collect();
    if rest.is_empty() {
        return true;
    }

    let mut votes: i64 = 0;
    for (idx, candidate) in first.iter().enumerate() {
        let Some(shape) = column_shape(rest.iter().map(|row| row[idx].as_str())) else {
            continue;
        };
        let looks_like_data = match shape {
            CellShape::Numeric => is_numeric(candidate),
            CellShape::Length(len) => candidate.chars().count() == len,
        };
        votes += if looks_like_data { -1 } else { 1 };
    }

    votes >= 0
}

fn column_shape<'a>(cells: impl Iterator<Item = &'a str>) -> Option<CellShape> {
    let mut all_numeric = true;
    let mut length: Option<usize> = None;
    let mut same_length = true;
    let mut seen_any = false;

    for cell in cells {
        seen_any = true;
        if is_blank(cell) || !is_numeric(cell) {
            all_numeric = false;
        }
        let len = cell.chars().count();
        match length {
            None => length = Some(len),
            Some(l) if l != len => same_length = false,
            Some(_) => {}
        }
    }

    match (seen_any, all_numeric, same_length) {
        (false, _, _) => None,
        (true, true, _) => Some(CellShape::Numeric),
        (true, false, true) => length.map(CellShape::Length),
        (true, false, false) => None,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
