//! Output formatters for check reports

mod compact;
mod json;
mod table;
mod text;

pub use compact::CompactFormatter;
pub use json::JsonFormatter;
pub use table::{render_table, Align};
pub use text::TextFormatter;

use crate::engine::Report;
use std::io::{self, Write};

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Write the entire report to `out`
    fn write_report(&self, report: &Report, out: &mut dyn Write) -> io::Result<()>;

    /// Render the report into a byte buffer
    fn format(&self, report: &Report) -> Vec<u8> {
        let mut buf = Vec::new();
        // Writes into a Vec never fail
        let _ = self.write_report(report, &mut buf);
        buf
    }
}
