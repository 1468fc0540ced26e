use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use csv_insight::config::Config;
use csv_insight::presenter::{self, Session};
use csv_insight::services::file_processor::{analyze_file, LoadOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::BufReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "csv-insight", version, about = "Profile the columns of a CSV file")]
pub struct Cli {
    /// CSV file to analyze
    #[arg(required_unless_present = "interactive")]
    pub file: Option<PathBuf>,

    /// Output format for the report
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Show details for one column (1-based position)
    #[arg(short, long)]
    pub column: Option<usize>,

    /// Browse reports from a menu instead of printing once
    #[arg(short, long)]
    pub interactive: bool,

    /// Field delimiter. Detected from the file when omitted.
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Treat the first record as a header
    #[arg(long, conflicts_with = "no_header")]
    pub header: bool,

    /// Treat the first record as data and name columns "Column N"
    #[arg(long)]
    pub no_header: bool,

    /// Classify columns on one thread
    #[arg(long)]
    pub no_parallel: bool,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        let has_header = match (self.header, self.no_header) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        LoadOptions {
            delimiter: self.delimiter,
            has_header,
        }
    }

    /// Flags take precedence over the environment.
    pub fn apply(&self, config: &mut Config) {
        if self.no_parallel {
            config.parallel = false;
        }
    }
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let options = cli.load_options();
    let stdout = std::io::stdout();

    if cli.interactive {
        let mut session = Session::new(config, options);
        let mut out = stdout.lock();
        if let Some(path) = &cli.file {
            session.open(path, &mut out).await?;
        }
        let mut input = BufReader::new(tokio::io::stdin());
        session.run(&mut input, &mut out).await?;
        return Ok(());
    }

    let path = cli.file.as_deref().context("no input file given")?;
    let report = analyze_file(path, &config, &options)
        .await
        .with_context(|| format!("Failed to analyze {}", path.display()))?;

    let mut out = stdout.lock();
    match (cli.format, cli.column) {
        (OutputFormat::Table, None) => presenter::write_summary(&mut out, &report)?,
        (OutputFormat::Table, Some(position)) => presenter::write_column_details(&mut out, &report, position)?,
        (OutputFormat::Json, None) => presenter::write_json(&mut out, &report)?,
        (OutputFormat::Json, Some(position)) => presenter::write_column_json(&mut out, &report, position)?,
    }
    out.flush()?;

    Ok(())
}
