use crate::error::InsightError;
use crate::models::AnalysisReport;
use crate::services::analysis::{ColumnProfile, SAMPLE_SIZE};
use std::io::Write;

const RULE_WIDTH: usize = 60;
const NAME_WIDTH: usize = 18;
const SAMPLE_WIDTH: usize = 20;

fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

pub fn write_summary<W: Write>(out: &mut W, report: &AnalysisReport) -> Result<(), InsightError> {
    let summary = &report.summary;

    writeln!(out, "\n📊 CSV ANALYSIS REPORT: {}", report.file_name)?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "• Total Rows: {}", group_thousands(summary.row_count))?;
    writeln!(out, "• Total Columns: {}", summary.column_count)?;
    if summary.ragged_rows > 0 {
        writeln!(
            out,
            "• Ragged Rows: {} (padded or truncated to {} fields)",
            group_thousands(summary.ragged_rows),
            summary.column_count
        )?;
    }

    writeln!(out, "\n🔍 COLUMN SUMMARY")?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "{:<20} {:<10} {:<10} {:<10} Sample Values", "Column", "Type", "Unique", "Empty")?;
    writeln!(out, "{}", rule('-'))?;

    for column in &summary.columns {
        let sample = column.sample_values.iter()
            .map(|v| truncate(v, SAMPLE_WIDTH))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "{:<20} {:<10} {:<10} {:>5.1}%    {}",
            clip(&column.name, NAME_WIDTH),
            column.inferred_type.as_str(),
            group_thousands(column.unique_count),
            column.empty_percentage,
            sample
        )?;
    }

    Ok(())
}

/// Detail view for one column. `position` is 1-based.
pub fn write_column_details<W: Write>(
    out: &mut W,
    report: &AnalysisReport,
    position: usize,
) -> Result<(), InsightError> {
    let column = lookup_column(report, position)?;

    writeln!(out, "\n🔎 DETAILED ANALYSIS: {}", column.name)?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "• Column Type: {}", column.inferred_type.as_str().to_uppercase())?;
    writeln!(out, "• Unique Values: {}", group_thousands(column.unique_count))?;
    writeln!(
        out,
        "• Empty Values: {} ({:.1}%)",
        group_thousands(column.empty_count),
        column.empty_percentage
    )?;

    if let Some(stats) = column.numeric.filter(|_| column.inferred_type.has_numbers()) {
        writeln!(out, "\n📈 Number Analysis:")?;
        writeln!(out, "  • Min: {}", format_decimal(stats.min))?;
        writeln!(out, "  • Max: {}", format_decimal(stats.max))?;
        writeln!(out, "  • Avg: {}", format_decimal(stats.mean))?;
    }

    write_values(out, column)
}

fn write_values<W: Write>(out: &mut W, column: &ColumnProfile) -> Result<(), InsightError> {
    if column.sample_values.is_empty() {
        return Ok(());
    }

    // Samples hold every distinct value only when there are few enough of them.
    if column.unique_count <= SAMPLE_SIZE {
        writeln!(out, "\n🌟 All Unique Values:")?;
        let mut values: Vec<&String> = column.sample_values.iter().collect();
        values.sort();
        for value in values {
            writeln!(out, "  • {}", value)?;
        }
    } else {
        writeln!(out, "\n🌟 Sample Values:")?;
        for value in &column.sample_values {
            writeln!(out, "  • {}", value)?;
        }
    }
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, report: &AnalysisReport) -> Result<(), InsightError> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_column_json<W: Write>(
    out: &mut W,
    report: &AnalysisReport,
    position: usize,
) -> Result<(), InsightError> {
    let column = lookup_column(report, position)?;
    serde_json::to_writer_pretty(&mut *out, column)?;
    writeln!(out)?;
    Ok(())
}

fn lookup_column(report: &AnalysisReport, position: usize) -> Result<&ColumnProfile, InsightError> {
    report.summary.column(position).ok_or_else(|| {
        InsightError::InvalidInput(format!(
            "column {} out of range (1-{})",
            position, report.summary.column_count
        ))
    })
}

/// Cuts to `max` characters without marking the cut.
fn clip(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Cuts to `max` characters and appends `...` when anything was dropped.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        format!("{}...", clip(value, max))
    } else {
        value.to_string()
    }
}

pub fn group_thousands(value: usize) -> String {
    group_digits(&value.to_string())
}

/// Two decimals with thousands separators, e.g. `-1,234.50`.
pub fn format_decimal(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, group_digits(int_part), frac_part)
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::{Dataset, FileAggregator};
    use crate::services::file_processor::Dialect;

    fn report() -> AnalysisReport {
        let dataset = Dataset::new(
            vec!["id".into(), "a_rather_long_column_name".into(), "notes".into()],
            vec![
                vec!["1".into(), "x".into(), "".into()],
                vec!["2500".into(), "y".into(), "".into()],
                vec!["-3.5".into(), "x".into(), "a value that is definitely longer than twenty".into()],
            ],
        );
        let summary = FileAggregator::sequential().analyze(&dataset);
        AnalysisReport::new(
            "people.csv".into(),
            Dialect { delimiter: ',', has_header: true },
            summary,
        )
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<(), InsightError>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn number_formatting() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(format_decimal(1234.5), "1,234.50");
        assert_eq!(format_decimal(-1234567.891), "-1,234,567.89");
        assert_eq!(format_decimal(-0.001), "0.00");
    }

    #[test]
    fn truncation_is_char_aware() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("ééééé", 3), "ééé...");
    }

    #[test]
    fn summary_lists_every_column() {
        let report = report();
        let text = render(|out| write_summary(out, &report));
        assert!(text.contains("CSV ANALYSIS REPORT: people.csv"));
        assert!(text.contains("• Total Rows: 3"));
        assert!(text.contains("• Total Columns: 3"));
        assert!(!text.contains("Ragged Rows"));
        assert!(text.contains("a_rather_long_colu "));
        assert!(text.contains(" 66.7%"));
        assert!(text.contains("a value that is defi..."));
    }

    #[test]
    fn details_show_number_analysis() {
        let report = report();
        let text = render(|out| write_column_details(out, &report, 1));
        assert!(text.contains("DETAILED ANALYSIS: id"));
        assert!(text.contains("• Column Type: NUMBER"));
        assert!(text.contains("• Min: -3.50"));
        assert!(text.contains("• Max: 2,500.00"));
        assert!(text.contains("• Avg: 832.50"));
        assert!(text.contains("All Unique Values"));
    }

    #[test]
    fn details_for_text_skip_numbers() {
        let report = report();
        let text = render(|out| write_column_details(out, &report, 2));
        assert!(text.contains("• Column Type: TEXT"));
        assert!(!text.contains("Number Analysis"));
        assert!(text.contains("  • x\n  • y\n"));
    }

    #[test]
    fn out_of_range_column_is_an_error() {
        let report = report();
        let mut out = Vec::new();
        assert!(write_column_details(&mut out, &report, 0).is_err());
        assert!(write_column_details(&mut out, &report, 4).is_err());
    }

    #[test]
    fn column_json_holds_one_profile() {
        let report = report();
        let text = render(|out| write_column_json(out, &report, 1));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["name"], "id");
        assert_eq!(value["inferred_type"], "number");
        assert_eq!(value["unique_count"], 3);
        assert_eq!(value["numeric"]["count"], 3);
        assert!(value.get("summary").is_none());

        let mut out = Vec::new();
        let err = write_column_json(&mut out, &report, 4).unwrap_err();
        assert!(matches!(err, InsightError::InvalidInput(_)));
        assert!(err.to_string().contains("out of range (1-3)"));
        assert!(out.is_empty());
    }

    #[test]
    fn json_uses_lowercase_types() {
        let report = report();
        let text = render(|out| write_json(out, &report));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["file_name"], "people.csv");
        assert_eq!(value["summary"]["row_count"], 3);
        assert_eq!(value["summary"]["columns"][0]["inferred_type"], "number");
        assert_eq!(value["summary"]["columns"][2]["empty_percentage"], 66.7);
        assert!(value["summary"]["columns"][1].get("numeric").is_none());
    }
}
