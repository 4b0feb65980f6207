//! JSON output formatter

use super::OutputFormatter;
use crate::alert::Alert;
use crate::engine::{Report, SummaryRow};
use serde::Serialize;
use std::io::{self, Write};

/// JSON formatter for machine-readable output
///
/// Linter output is carried as text, so bytes that are not valid UTF-8
/// become U+FFFD here. The text formatter relays them untouched.
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn write_json<T: Serialize>(&self, value: &T, out: &mut dyn Write) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, value)?;
        } else {
            serde_json::to_writer(&mut *out, value)?;
        }
        writeln!(out)
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    root: String,
    pattern: Option<&'a str>,
    matched_files: usize,
    total_files: usize,
    runs: Vec<JsonRun<'a>>,
    alerts: &'a [Alert],
    summary: Vec<SummaryRow>,
    total_issues: usize,
    exit_code: i32,
    duration_ms: u128,
}

#[derive(Serialize)]
struct JsonRun<'a> {
    file: String,
    command: &'a str,
    exit_code: i32,
    stdout: String,
    stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl OutputFormatter for JsonFormatter {
    fn write_report(&self, report: &Report, out: &mut dyn Write) -> io::Result<()> {
        let runs = report
            .outcomes
            .iter()
            .map(|o| JsonRun {
                file: o.file.display().to_string(),
                command: &o.command,
                exit_code: o.exit_code(),
                stdout: o.stdout_text(),
                stderr: o.stderr_text(),
                error: o.error.as_deref(),
            })
            .collect();

        let output = JsonOutput {
            root: report.root.display().to_string(),
            pattern: report.pattern.as_deref(),
            matched_files: report.matched_files(),
            total_files: report.total_files,
            runs,
            alerts: &report.alerts,
            summary: report.summary(),
            total_issues: report.total_issues(),
            exit_code: report.exit_code(),
            duration_ms: report.duration.as_millis(),
        };

        self.write_json(&output, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::Severity;
    use crate::invocation::RunOutcome;
    use std::path::PathBuf;

    fn render(formatter: &JsonFormatter, report: &Report) -> serde_json::Value {
        serde_json::from_slice(&formatter.format(report)).unwrap()
    }

    #[test]
    fn test_json_alerts() {
        let report = Report {
            alerts: vec![Alert::new(
                PathBuf::from("a.md"),
                10,
                5,
                Severity::Warning,
                "Consider removing 'very'.",
                "write-good.Weasel",
            )],
            ..Default::default()
        };

        let value = render(&JsonFormatter::new(), &report);
        assert_eq!(value["alerts"][0]["check"], "write-good.Weasel");
        assert_eq!(value["alerts"][0]["severity"], "warning");
        assert_eq!(value["alerts"][0]["line"], 10);
        assert_eq!(value["summary"][0]["count"], 1);
        assert_eq!(value["total_issues"], 1);
    }

    #[test]
    fn test_json_format_report() {
        let report = Report {
            root: PathBuf::from("docs"),
            files: vec![PathBuf::from("docs/a.md")],
            total_files: 4,
            outcomes: vec![RunOutcome {
                file: PathBuf::from("docs/a.md"),
                command: "vale docs/a.md".to_string(),
                status: Some(0),
                stdout: b"  kept  as-is \n".to_vec(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let value = render(&JsonFormatter::new(), &report);
        assert_eq!(value["matched_files"], 1);
        assert_eq!(value["total_files"], 4);
        assert_eq!(value["runs"][0]["stdout"], "  kept  as-is \n");
        assert_eq!(value["runs"][0]["exit_code"], 0);
        assert!(value["runs"][0].get("error").is_none());
        assert_eq!(value["total_issues"], 0);
        assert_eq!(value["exit_code"], 0);
    }

    #[test]
    fn test_json_pretty() {
        let output = JsonFormatter::new().pretty().format(&Report::default());
        let text = String::from_utf8(output).unwrap();
        assert!(text.trim_end().contains('\n'));
        assert!(text.ends_with("}\n"));
    }
}
