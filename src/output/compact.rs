//! Compact output formatter
//!
//! One line per alert, minimal output for scripting.

use super::OutputFormatter;
use crate::alert::Alert;
use crate::engine::Report;
use std::io::{self, Write};

/// Compact one-line-per-alert formatter
#[derive(Debug, Default)]
pub struct CompactFormatter;

impl CompactFormatter {
    /// Create a new compact formatter
    pub fn new() -> Self {
        Self
    }

    fn format_alert(alert: &Alert) -> String {
        format!(
            "{}:{}:{}: {}: {}: {}",
            alert.file.display(),
            alert.line,
            alert.column,
            alert.severity,
            alert.check,
            alert.message
        )
    }
}

impl OutputFormatter for CompactFormatter {
    fn write_report(&self, report: &Report, out: &mut dyn Write) -> io::Result<()> {
        for alert in &report.alerts {
            writeln!(out, "{}", Self::format_alert(alert))?;
        }
        Ok(())
    }
}
