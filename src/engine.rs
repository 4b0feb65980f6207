//! Core checker: runs the linter over a selection and aggregates results

use crate::alert::{Alert, Severity};
use crate::discovery::Selection;
use crate::invocation::{Invocation, RunError, RunOutcome, Runner};
use crate::parser::parse_vale_output;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// One row of the per-check summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub severity: Severity,
    pub check: String,
    pub count: usize,
}

/// Result of checking a selection
#[derive(Debug, Default)]
pub struct Report {
    /// Directory (or file) that was searched
    pub root: PathBuf,

    /// File-name filter used
    pub pattern: Option<String>,

    /// Files matched by the selection
    pub files: Vec<PathBuf>,

    /// Entries seen below the root
    pub total_files: usize,

    /// One outcome per matched file, in file order
    pub outcomes: Vec<RunOutcome>,

    /// Alerts parsed from every outcome
    pub alerts: Vec<Alert>,

    /// Processing duration
    pub duration: Duration,
}

impl Report {
    /// Report for a selection that has not been run
    pub fn listing(selection: Selection) -> Self {
        Self {
            root: selection.root,
            pattern: selection.pattern,
            files: selection.files,
            total_files: selection.total_files,
            ..Default::default()
        }
    }

    pub fn matched_files(&self) -> usize {
        self.files.len()
    }

    /// Number of files handed to the linter
    pub fn files_checked(&self) -> usize {
        self.outcomes.len()
    }

    pub fn total_issues(&self) -> usize {
        self.alerts.len()
    }

    /// Number of distinct files with at least one alert
    pub fn files_with_alerts(&self) -> usize {
        self.alerts
            .iter()
            .map(|a| &a.file)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Alert counts per (severity, check), most frequent first
    pub fn summary(&self) -> Vec<SummaryRow> {
        let mut counts: BTreeMap<(Severity, &str), usize> = BTreeMap::new();
        for alert in &self.alerts {
            *counts
                .entry((alert.severity, alert.check.as_str()))
                .or_default() += 1;
        }

        let mut rows: Vec<SummaryRow> = counts
            .into_iter()
            .map(|((severity, check), count)| SummaryRow {
                severity,
                check: check.to_string(),
                count,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(b.severity.cmp(&a.severity))
                .then(a.check.cmp(&b.check))
        });
        rows
    }

    /// Exit code relayed from the linter runs (0 when nothing ran)
    pub fn exit_code(&self) -> i32 {
        self.outcomes
            .iter()
            .map(RunOutcome::exit_code)
            .max()
            .unwrap_or(0)
    }
}

/// Runs the external linter over every selected file
pub struct Checker {
    runner: Runner,
    jobs: usize,
}

impl Checker {
    /// Create a checker; `jobs == 0` uses one process per CPU
    pub fn new(invocation: Invocation, jobs: usize) -> Self {
        Self {
            runner: Runner::new(invocation),
            jobs,
        }
    }

    fn thread_count(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get()
        } else {
            self.jobs
        }
    }

    /// Run the linter on every file in `selection`
    pub fn run(&self, selection: Selection) -> Result<Report, RunError> {
        self.runner.invocation().ensure_available()?;

        let start = Instant::now();
        let threads = self.thread_count();

        let outcomes: Vec<RunOutcome> = if threads <= 1 || selection.files.len() <= 1 {
            selection.files.iter().map(|f| self.runner.run(f)).collect()
        } else {
            log::debug!("Running linter with {} parallel jobs", threads);
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            pool.install(|| {
                selection
                    .files
                    .par_iter()
                    .map(|f| self.runner.run(f))
                    .collect()
            })
        };

        let alerts = outcomes
            .iter()
            .flat_map(|o| parse_vale_output(&o.stdout_text(), Some(o.file.as_path())))
            .collect();

        Ok(Report {
            root: selection.root,
            pattern: selection.pattern,
            files: selection.files,
            total_files: selection.total_files,
            outcomes,
            alerts,
            duration: start.elapsed(),
        })
    }
}
