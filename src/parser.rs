//! Parser for Vale's line-oriented CLI output
//!
//! Vale's default output looks like:
//!
//! ```text
//!  docs/intro.md
//!  3:7   error    Use 'email' instead of 'e-mail'.   Docs.Terms
//!  9:1   warning  Try to keep sentences short (< 30   Docs.SentenceLength
//!                 words).
//!
//! ✖ 1 error, 1 warning and 0 suggestions in 1 file.
//! ```

use crate::alert::{Alert, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static ANSI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("valid ANSI regex"));

static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+):(\d+)\s+(\w+)\s+(.+)$").expect("valid location regex")
});

static ALERT_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+:\d+").expect("valid alert start regex"));

static COLUMN_GAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("valid column gap regex"));

const SUMMARY_MARKER: char = '✖';

/// Remove ANSI escape sequences from text
pub fn strip_ansi_codes(text: &str) -> String {
    ANSI_RE.replace_all(text, "").into_owned()
}

fn is_file_header(line: &str) -> bool {
    let line = line.trim();
    line.ends_with(".md") || line.ends_with(".mdx")
}

fn is_continuation(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !ALERT_START_RE.is_match(line) && !line.starts_with(SUMMARY_MARKER)
}

/// Parse Vale's output for one file into alerts
///
/// `file` names the checked file; when absent the file header line printed
/// by Vale is used instead.
pub fn parse_vale_output(stdout: &str, file: Option<&Path>) -> Vec<Alert> {
    let cleaned = strip_ansi_codes(stdout);
    let lines: Vec<&str> = cleaned.trim().lines().collect();

    let header = lines.first().copied().filter(|l| is_file_header(l));
    let file = match (file, header) {
        (Some(f), _) => f.to_path_buf(),
        (None, Some(h)) => PathBuf::from(h.trim()),
        (None, None) => PathBuf::new(),
    };

    let mut alerts = Vec::new();
    let mut i = usize::from(header.is_some() && lines.len() > 1);

    while i < lines.len() {
        let line = lines[i].trim();
        i += 1;

        if line.is_empty() || line.starts_with(SUMMARY_MARKER) {
            continue;
        }

        let Some(caps) = LOCATION_RE.captures(line) else {
            continue;
        };
        let (Ok(line_num), Ok(column)) = (caps[1].parse::<usize>(), caps[2].parse::<usize>())
        else {
            continue;
        };
        let Ok(severity) = caps[3].parse::<Severity>() else {
            log::debug!("Skipping line with unknown severity '{}'", &caps[3]);
            continue;
        };

        let parts: Vec<&str> = COLUMN_GAP_RE.split(&caps[4]).collect();
        let Some((check, message_parts)) = parts.split_last() else {
            continue;
        };
        if message_parts.is_empty() {
            continue;
        }

        let mut message = message_parts.join(" ").trim().to_string();
        while i < lines.len() && is_continuation(lines[i]) {
            message.push(' ');
            message.push_str(lines[i].trim());
            i += 1;
        }

        alerts.push(Alert::new(
            file.clone(),
            line_num,
            column,
            severity,
            &message,
            check.trim(),
        ));
    }

    alerts
}
