//! Spawning the external linter for one file

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Placeholder replaced by the quoted file path in shell templates
pub const FILEPATH_PLACEHOLDER: &str = "{filepath}";

/// Exit code reported when the linter executable cannot be found
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit code reported when the linter exists but cannot be started
pub const EXIT_CANNOT_EXECUTE: i32 = 126;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("{0} not found. Install Vale from https://vale.sh/docs/install")]
    ToolNotFound(String),

    #[error("{0} exists but is not executable")]
    NotExecutable(String),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// How the linter is started for each file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `program [--config <config>] [args...] <file>`, without a shell
    Program {
        program: String,
        config: Option<PathBuf>,
        args: Vec<String>,
    },
    /// A command line run through the platform shell
    Shell { template: String },
}

impl Invocation {
    /// Plain program invocation with no extra arguments
    pub fn program(program: &str) -> Self {
        Invocation::Program {
            program: program.to_string(),
            config: None,
            args: Vec::new(),
        }
    }

    pub fn shell(template: &str) -> Self {
        Invocation::Shell {
            template: template.to_string(),
        }
    }

    /// Make sure the linter executable can be resolved
    pub fn ensure_available(&self) -> Result<(), RunError> {
        match self {
            Invocation::Program { program, .. } => match which::which(program) {
                Ok(path) => {
                    log::debug!("Using linter at {}", path.display());
                    Ok(())
                }
                // `which` rejects a path to a file lacking the execute bit
                Err(_) if is_path(program) && Path::new(program).is_file() => {
                    Err(RunError::NotExecutable(program.clone()))
                }
                Err(_) => Err(RunError::ToolNotFound(program.clone())),
            },
            // The shell reports a missing tool itself
            Invocation::Shell { .. } => Ok(()),
        }
    }

    /// Arguments passed to the program, ending with the file
    fn program_args(config: Option<&Path>, args: &[String], file: &Path) -> Vec<String> {
        let mut out = Vec::with_capacity(args.len() + 3);
        if let Some(config) = config {
            out.push("--config".to_string());
            out.push(config.display().to_string());
        }
        out.extend(args.iter().cloned());
        out.push(file.display().to_string());
        out
    }

    /// Expand a shell template for one file
    pub fn shell_line(template: &str, file: &Path) -> String {
        let quoted = shell_quote(&file.display().to_string());
        if template.contains(FILEPATH_PLACEHOLDER) {
            template.replace(FILEPATH_PLACEHOLDER, &quoted)
        } else {
            format!("{} {}", template, quoted)
        }
    }

    /// Human-readable command line for one file
    pub fn display_for(&self, file: &Path) -> String {
        match self {
            Invocation::Program {
                program,
                config,
                args,
            } => {
                let mut parts = vec![program.clone()];
                parts.extend(
                    Self::program_args(config.as_deref(), args, file)
                        .iter()
                        .map(|a| shell_quote(a)),
                );
                parts.join(" ")
            }
            Invocation::Shell { template } => Self::shell_line(template, file),
        }
    }

    fn command_for(&self, file: &Path) -> Command {
        match self {
            Invocation::Program {
                program,
                config,
                args,
            } => {
                let mut cmd = Command::new(program);
                cmd.args(Self::program_args(config.as_deref(), args, file));
                cmd
            }
            Invocation::Shell { template } => {
                let line = Self::shell_line(template, file);
                if cfg!(windows) {
                    let mut cmd = Command::new("cmd");
                    cmd.args(["/C", line.as_str()]);
                    cmd
                } else {
                    let mut cmd = Command::new("sh");
                    cmd.args(["-c", line.as_str()]);
                    cmd
                }
            }
        }
    }
}

fn is_path(program: &str) -> bool {
    Path::new(program).components().count() > 1
}

/// Quote a single argument for the platform shell
pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if plain {
        return arg.to_string();
    }

    if cfg!(windows) {
        format!("\"{}\"", arg.replace('"', "\"\""))
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Captured result of running the linter on one file
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// File that was checked
    pub file: PathBuf,
    /// Command line as displayed to the user
    pub command: String,
    /// Exit code of the linter, if it exited normally
    pub status: Option<i32>,
    /// Raw standard output
    pub stdout: Vec<u8>,
    /// Raw standard error
    pub stderr: Vec<u8>,
    /// Failure to start the linter at all
    pub error: Option<String>,
    pub(crate) not_found: bool,
}

impl RunOutcome {
    /// Outcome for a linter that could not be started
    pub fn spawn_failed(file: &Path, command: String, err: &io::Error) -> Self {
        Self {
            file: file.to_path_buf(),
            command,
            error: Some(err.to_string()),
            not_found: err.kind() == io::ErrorKind::NotFound,
            ..Default::default()
        }
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Exit code this run contributes to the overall result
    pub fn exit_code(&self) -> i32 {
        if self.error.is_some() {
            return if self.not_found {
                EXIT_NOT_FOUND
            } else {
                EXIT_CANNOT_EXECUTE
            };
        }
        self.status.unwrap_or(1)
    }
}

/// Runs an invocation against individual files
pub struct Runner {
    invocation: Invocation,
}

impl Runner {
    pub fn new(invocation: Invocation) -> Self {
        Self { invocation }
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Run the linter on `file`, capturing all output
    pub fn run(&self, file: &Path) -> RunOutcome {
        let command = self.invocation.display_for(file);
        log::debug!("Running command: `{}`", command);

        match self.invocation.command_for(file).output() {
            Ok(output) => {
                log::debug!("{} exited with {}", file.display(), output.status);
                RunOutcome {
                    file: file.to_path_buf(),
                    command,
                    status: output.status.code(),
                    stdout: output.stdout,
                    stderr: output.stderr,
                    error: None,
                    not_found: false,
                }
            }
            Err(e) => {
                log::warn!("Failed to run `{}`: {}", command, e);
                RunOutcome::spawn_failed(file, command, &e)
            }
        }
    }
}
