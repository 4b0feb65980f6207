//! vale-docs - Documentation style checking through Vale
//!
//! Walks a documentation tree, runs the external [Vale](https://vale.sh)
//! linter once per matching file, relays whatever Vale prints, and parses
//! the alerts into a summary. All style rules live in Vale's own
//! configuration; this crate never interprets them.
//!
//! # Architecture
//!
//! ```text
//! CLI -> discovery -> Checker -> Invocation (vale) -> parser -> Report -> formatter
//! ```
//!
//! # Example
//!
//! ```no_run
//! use vale_docs::{collect_files, Checker, FileSelector, Invocation};
//!
//! let selector = FileSelector::new(Some(r"\.mdx?$"), &[]).unwrap();
//! let selection = collect_files(std::path::Path::new("docs"), &selector).unwrap();
//! let checker = Checker::new(Invocation::program("vale"), 1);
//! let report = checker.run(selection).unwrap();
//! std::process::exit(report.exit_code());
//! ```

pub mod alert;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod invocation;
pub mod output;
pub mod parser;

pub use alert::{Alert, Severity};
pub use config::Config;
pub use discovery::{collect_files, DiscoveryError, FileSelector, FileTree, Selection};
pub use engine::{Checker, Report, SummaryRow};
pub use invocation::{Invocation, RunError, RunOutcome, Runner};
pub use output::{CompactFormatter, JsonFormatter, OutputFormatter, TextFormatter};
pub use parser::{parse_vale_output, strip_ansi_codes};
