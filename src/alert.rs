//! Alert types parsed from Vale output

use serde::Serialize;
use std::path::PathBuf;

/// Vale alert level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Stylistic suggestion
    Suggestion,
    /// Warning - likely style issue
    Warning,
    /// Error - style guide violation
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Suggestion => write!(f, "suggestion"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Vale only ever prints these three words, in lowercase
        match s {
            "suggestion" => Ok(Severity::Suggestion),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// A single alert reported by the linter for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// File the alert belongs to
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Alert level
    pub severity: Severity,
    /// Message, with wrapped continuation lines joined
    pub message: String,
    /// Style check that fired, e.g. `Vale.Spelling`
    pub check: String,
}

impl Alert {
    pub fn new(
        file: PathBuf,
        line: usize,
        column: usize,
        severity: Severity,
        message: &str,
        check: &str,
    ) -> Self {
        Self {
            file,
            line,
            column,
            severity,
            message: message.to_string(),
            check: check.to_string(),
        }
    }
}
