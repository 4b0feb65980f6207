//! vale-docs CLI - check documentation trees with Vale
//!
//! Runs Vale on every matching file, relays its output, and summarizes the alerts.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use vale_docs::config::{CliOverrides, Config, OutputFormat};
use vale_docs::engine::{Checker, Report};
use vale_docs::invocation::{RunError, EXIT_CANNOT_EXECUTE, EXIT_NOT_FOUND};
use vale_docs::output::{CompactFormatter, JsonFormatter, OutputFormatter, TextFormatter};
use vale_docs::{collect_files, FileSelector};

/// Exit code for failures of this tool itself
const EXIT_USAGE: i32 = 2;

#[derive(Parser)]
#[command(
    name = "vale-docs",
    version,
    about = "Check documentation with Vale",
    long_about = "Runs the Vale prose linter on every matching file below a directory, \
                  relays its output unchanged, and summarizes the alerts. \
                  The exit code is the linter's own."
)]
struct Cli {
    /// Directory (or single file) to check
    target: PathBuf,

    /// Regex matched against file names (default: '\.mdx?$')
    #[arg(short, long)]
    pattern: Option<String>,

    /// Shell command run per file; {filepath} is replaced by the path, otherwise it is appended
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Linter program spawned per file
    #[arg(long)]
    linter: Option<String>,

    /// Vale configuration file, forwarded as --config
    #[arg(long)]
    vale_config: Option<PathBuf>,

    /// Extra argument for the linter (repeatable)
    #[arg(long = "linter-arg", allow_hyphen_values = true)]
    linter_args: Vec<String>,

    /// Exclude paths matching these globs (comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Number of parallel linter processes (0 = one per CPU)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Do not print the matched file tree
    #[arg(long)]
    no_tree: bool,

    /// Do not print the table of every parsed alert
    #[arg(long)]
    no_table: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Only list matching files; do not run the linter
    #[arg(long)]
    list: bool,

    /// Exit with 0 even if the linter reported problems
    #[arg(long)]
    exit_zero: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Compact,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Compact => OutputFormat::Compact,
        }
    }
}

fn formatter_for(config: &Config, colored: bool) -> Box<dyn OutputFormatter> {
    match config.output.format {
        OutputFormat::Text => {
            let mut text = TextFormatter::new();
            text.colored = colored;
            text.show_tree = config.output.tree;
            text.show_table = config.output.table;
            Box::new(text)
        }
        OutputFormat::Json => Box::new(JsonFormatter::new().pretty()),
        OutputFormat::Compact => Box::new(CompactFormatter::new()),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default().context("Failed to load config")?,
    };

    config.merge_cli(CliOverrides {
        program: cli.linter.clone(),
        vale_config: cli.vale_config.clone(),
        args: cli.linter_args.clone(),
        command: cli.command.clone(),
        pattern: cli.pattern.clone(),
        exclude: cli.exclude.clone(),
        jobs: cli.jobs,
        format: cli.format.map(Into::into),
        no_color: cli.no_color,
        no_tree: cli.no_tree,
        no_table: cli.no_table,
        verbose: cli.verbose,
    });

    Ok(config)
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config = load_config(cli)?;

    let colored = config.use_color(std::io::stdout().is_terminal());
    colored::control::set_override(colored);

    let selector = FileSelector::new(config.files.pattern.as_deref(), &config.files.exclude)?;
    let selection = collect_files(&cli.target, &selector)?;
    log::info!(
        "Files matching pattern: {} (out of {} total files)",
        selection.matched_files(),
        selection.total_files
    );

    let formatter = formatter_for(&config, colored);

    let (report, exit_code) = if cli.list {
        (Report::listing(selection), 0)
    } else {
        let checker = Checker::new(config.invocation()?, config.engine.jobs);
        let report = checker.run(selection)?;
        let code = report.exit_code();
        (report, code)
    };

    let mut stdout = std::io::stdout().lock();
    formatter.write_report(&report, &mut stdout)?;
    stdout.flush()?;

    if config.output.verbose && !cli.list {
        eprintln!(
            "Checked {} files in {:.2}s",
            report.files_checked(),
            report.duration.as_secs_f64()
        );
    }

    Ok(if cli.exit_zero { 0 } else { exit_code })
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<RunError>() {
        Some(RunError::ToolNotFound(_)) => EXIT_NOT_FOUND,
        Some(RunError::NotExecutable(_)) => EXIT_CANNOT_EXECUTE,
        _ => EXIT_USAGE,
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{}: {:#}", "error".red().bold(), err);
            std::process::exit(exit_code_for(&err));
        }
    }
}
