//! Human-readable text output formatter

use super::table::{render_table, Align};
use super::OutputFormatter;
use crate::discovery::FileTree;
use crate::engine::Report;
use crate::invocation::RunOutcome;
use colored::*;
use std::io::{self, Write};

/// Text formatter: file tree, relayed linter output, then summary tables
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show the matched file tree
    pub show_tree: bool,

    /// Show the table of every parsed alert
    pub show_table: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_tree: true,
            show_table: true,
        }
    }
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    pub fn without_tree(mut self) -> Self {
        self.show_tree = false;
        self
    }

    pub fn without_table(mut self) -> Self {
        self.show_table = false;
        self
    }

    fn heading(&self, text: &str) -> String {
        if self.colored {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Relay one run: header, command, then the linter's bytes untouched
    fn write_run(&self, outcome: &RunOutcome, out: &mut dyn Write) -> io::Result<()> {
        let header = format!("File: {}", outcome.file.display());
        let command = format!("Running command: `{}`", outcome.command);
        if self.colored {
            writeln!(out, "\n{}\n{}", header.green().bold(), command.dimmed())?;
        } else {
            writeln!(out, "\n{}\n{}", header, command)?;
        }

        if !outcome.stdout.is_empty() {
            write_raw(out, &outcome.stdout)?;
        }

        let label = if self.colored {
            "Error:".red().to_string()
        } else {
            "Error:".to_string()
        };
        if !outcome.stderr.is_empty() {
            writeln!(out, "{}", label)?;
            write_raw(out, &outcome.stderr)?;
        }
        if let Some(err) = &outcome.error {
            writeln!(out, "{}\n{}", label, err)?;
        }

        Ok(())
    }

    fn alerts_table(&self, report: &Report) -> String {
        let rows: Vec<Vec<String>> = report
            .alerts
            .iter()
            .map(|a| {
                vec![
                    a.file.display().to_string(),
                    a.line.to_string(),
                    a.column.to_string(),
                    a.severity.to_string(),
                    a.message.clone(),
                    a.check.clone(),
                ]
            })
            .collect();

        render_table(
            &["filename", "line", "col", "severity", "message", "check"],
            &[
                Align::Left,
                Align::Right,
                Align::Right,
                Align::Left,
                Align::Left,
                Align::Left,
            ],
            &rows,
        )
    }

    fn summary_table(&self, report: &Report) -> String {
        let rows: Vec<Vec<String>> = report
            .summary()
            .into_iter()
            .map(|r| vec![r.severity.to_string(), r.check, r.count.to_string()])
            .collect();

        render_table(
            &["severity", "check", "count"],
            &[Align::Left, Align::Left, Align::Right],
            &rows,
        )
    }
}

/// Write captured output as-is, ending it with a newline if it lacks one
fn write_raw(out: &mut dyn Write, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)?;
    if !bytes.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    Ok(())
}

impl OutputFormatter for TextFormatter {
    fn write_report(&self, report: &Report, out: &mut dyn Write) -> io::Result<()> {
        if self.show_tree {
            let mut tree = FileTree::new(&report.root, report.pattern.as_deref(), &report.files);
            if !self.colored {
                tree = tree.without_color();
            }
            out.write_all(tree.render().as_bytes())?;
        }

        writeln!(
            out,
            "\n{}",
            self.heading(&format!(
                "Files matching pattern: {} (out of {} total files)",
                report.matched_files(),
                report.total_files
            ))
        )?;

        for outcome in &report.outcomes {
            self.write_run(outcome, out)?;
        }

        if report.alerts.is_empty() {
            return Ok(());
        }

        if self.show_table {
            writeln!(out, "\n{}", self.heading("All Parsed Results:"))?;
            out.write_all(self.alerts_table(report).as_bytes())?;
        }

        writeln!(out, "\n{}", self.heading("Error Report Summary:"))?;
        out.write_all(self.summary_table(report).as_bytes())?;

        writeln!(
            out,
            "\n{}",
            self.heading(&format!("Total issues found: {}", report.total_issues()))
        )
    }
}
