use super::render::{write_column_details, write_summary};
use crate::config::Config;
use crate::error::InsightError;
use crate::models::AnalysisReport;
use crate::services::file_processor::{analyze_file, LoadOptions};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Summary,
    /// 1-based column position.
    Column(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Column(usize),
    Refresh,
    NewFile,
    Quit,
    Invalid,
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim().to_lowercase();
        match input.as_str() {
            "q" => Command::Quit,
            "n" => Command::NewFile,
            "r" => Command::Refresh,
            digits if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
                digits.parse().map_or(Command::Invalid, Command::Column)
            }
            _ => Command::Invalid,
        }
    }
}

/// Menu-driven browsing of analysis reports.
///
/// The session owns all presentation state: the report on display and the
/// current screen. Input and output are injected so the loop can be driven
/// from tests.
pub struct Session {
    config: Config,
    options: LoadOptions,
    report: Option<AnalysisReport>,
    screen: Screen,
    clear_screen: bool,
}

impl Session {
    pub fn new(config: Config, options: LoadOptions) -> Self {
        Self {
            config,
            options,
            report: None,
            screen: Screen::Summary,
            clear_screen: true,
        }
    }

    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Loads and shows a file. Failures are reported on `out` and leave the
    /// session without a report.
    pub async fn open<W: Write>(&mut self, path: &Path, out: &mut W) -> Result<bool, InsightError> {
        self.report = None;
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            writeln!(out, "🚨 File not found: {}", path.display())?;
            return Ok(false);
        }

        match analyze_file(path, &self.config, &self.options).await {
            Ok(report) => {
                self.report = Some(report);
                self.show(Screen::Summary, out)?;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Failed to analyze {}: {}", path.display(), e);
                writeln!(out, "🚨 Error processing file: {}", e)?;
                Ok(false)
            }
        }
    }

    pub async fn run<R, W>(&mut self, input: &mut R, out: &mut W) -> Result<(), InsightError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        if self.report.is_none() {
            self.clear(out)?;
            writeln!(out, "\n{}", "=".repeat(50))?;
            writeln!(out, "📂 CSV INSIGHT ANALYZER")?;
            writeln!(out, "{}", "=".repeat(50))?;
        }

        loop {
            if self.report.is_none() {
                let Some(line) = prompt(input, out, "\nEnter CSV file path (or 'exit'): ").await? else {
                    return Ok(());
                };
                let path = line.trim();
                if matches!(path.to_lowercase().as_str(), "exit" | "quit") {
                    return Ok(());
                }
                if path.is_empty() {
                    continue;
                }
                self.open(Path::new(path), out).await?;
                continue;
            }

            writeln!(out, "\n{}", "=".repeat(60))?;
            writeln!(out, "{}", self.menu())?;
            let Some(line) = prompt(input, out, "Select: ").await? else {
                return Ok(());
            };

            match Command::parse(&line) {
                Command::Quit => return Ok(()),
                Command::NewFile => {
                    self.report = None;
                    self.screen = Screen::Summary;
                }
                Command::Refresh => self.show(Screen::Summary, out)?,
                Command::Column(position) if self.has_column(position) => {
                    self.show(Screen::Column(position), out)?;
                }
                Command::Column(_) => writeln!(out, "Invalid column number!")?,
                Command::Invalid => writeln!(out, "Invalid option!")?,
            }
        }
    }

    fn menu(&self) -> String {
        let columns = self.report.as_ref().map_or(0, |r| r.summary.column_count);
        let range = match columns {
            0 => "-".to_string(),
            1 => "1".to_string(),
            n => format!("1-{}", n),
        };
        format!("OPTIONS: [{}] Column Details | [R]efresh | [N]ew File | [Q]uit", range)
    }

    fn has_column(&self, position: usize) -> bool {
        self.report.as_ref()
            .and_then(|r| r.summary.column(position))
            .is_some()
    }

    fn show<W: Write>(&mut self, screen: Screen, out: &mut W) -> Result<(), InsightError> {
        let Some(report) = self.report.as_ref() else {
            return Ok(());
        };
        self.clear(out)?;
        match screen {
            Screen::Summary => write_summary(out, report)?,
            Screen::Column(position) => write_column_details(out, report, position)?,
        }
        self.screen = screen;
        Ok(())
    }

    fn clear<W: Write>(&self, out: &mut W) -> Result<(), InsightError> {
        if self.clear_screen {
            write!(out, "{}", CLEAR_SCREEN)?;
        }
        Ok(())
    }
}

async fn prompt<R, W>(input: &mut R, out: &mut W, text: &str) -> Result<Option<String>, InsightError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{}", text)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn drive(session: &mut Session, script: String) -> String {
        let mut input = script.as_bytes();
        let mut out = Vec::new();
        tokio_test::block_on(session.run(&mut input, &mut out)).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn session() -> Session {
        Session::new(Config::default(), LoadOptions::default()).with_clear_screen(false)
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("q\n"), Command::Quit);
        assert_eq!(Command::parse(" N "), Command::NewFile);
        assert_eq!(Command::parse("R"), Command::Refresh);
        assert_eq!(Command::parse("12"), Command::Column(12));
        assert_eq!(Command::parse(""), Command::Invalid);
        assert_eq!(Command::parse("-1"), Command::Invalid);
        assert_eq!(Command::parse("x"), Command::Invalid);
    }

    #[test]
    fn browses_a_file() {
        let file = csv_file("id,name\n1,ann\n2,bob\n");
        let mut session = session();
        let script = format!("{}\n2\n9\nwhat\nr\nq\n", file.path().display());
        let text = drive(&mut session, script);

        assert!(text.contains("CSV INSIGHT ANALYZER"));
        assert!(text.contains("• Total Rows: 2"));
        assert!(text.contains("OPTIONS: [1-2] Column Details"));
        assert!(text.contains("DETAILED ANALYSIS: name"));
        assert!(text.contains("Invalid column number!"));
        assert!(text.contains("Invalid option!"));
        assert_eq!(session.screen(), Screen::Summary);
        assert_eq!(session.report().unwrap().summary.row_count, 2);
    }

    #[test]
    fn missing_file_prompts_again() {
        let mut session = session();
        let text = drive(&mut session, "/definitely/not/here.csv\nexit\n".to_string());
        assert!(text.contains("🚨 File not found: /definitely/not/here.csv"));
        assert!(session.report().is_none());
    }

    #[test]
    fn new_file_returns_to_path_prompt() {
        let file = csv_file("a\n1\n");
        let mut session = session();
        let script = format!("{}\nn\nquit\n", file.path().display());
        let text = drive(&mut session, script);
        assert_eq!(text.matches("Enter CSV file path").count(), 2);
        assert!(session.report().is_none());
    }

    #[test]
    fn end_of_input_stops_the_loop() {
        let file = csv_file("a\n1\n");
        let mut session = session();
        tokio_test::block_on(session.open(file.path(), &mut Vec::new())).unwrap();
        let text = drive(&mut session, "1\n".to_string());
        assert!(!text.contains("CSV INSIGHT ANALYZER"));
        assert_eq!(session.screen(), Screen::Column(1));
    }
}
