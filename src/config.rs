//! Configuration for the checker
//!
//! Reads configuration from:
//! - `.vale-docs.yaml` / `.vale-docs.json` (project-level)
//! - `~/.vale-docs.yaml` (user-level)
//!
//! Vale's own `.vale.ini` is never read here; it is only forwarded.

use crate::invocation::Invocation;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_LINTER: &str = "vale";
pub const DEFAULT_PATTERN: &str = r"\.mdx?$";

const CONFIG_NAMES: [&str; 3] = [".vale-docs.yaml", ".vale-docs.yml", ".vale-docs.json"];

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// External linter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinterConfig {
    /// Program spawned per file
    pub program: String,

    /// Vale configuration file, forwarded as `--config`
    pub config: Option<PathBuf>,

    /// Extra arguments placed before the file path
    pub args: Vec<String>,

    /// Shell command template; replaces `program` when set
    pub command: Option<String>,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_LINTER.to_string(),
            config: None,
            args: Vec::new(),
            command: None,
        }
    }
}

/// File selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Regex searched against file names
    pub pattern: Option<String>,

    /// Glob patterns, relative to the target directory
    pub exclude: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            pattern: Some(DEFAULT_PATTERN.to_string()),
            exclude: vec!["**/node_modules/**".to_string(), "**/.git/**".to_string()],
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of parallel linter processes (0 = one per CPU)
    pub jobs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Show the matched file tree
    pub tree: bool,

    /// Show the table of every parsed alert
    pub table: bool,

    /// Verbose output
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: ColorMode::Auto,
            tree: true,
            table: true,
            verbose: false,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Compact,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "compact" => Ok(OutputFormat::Compact),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External linter settings
    pub linter: LinterConfig,

    /// File selection settings
    pub files: FilesConfig,

    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Values taken from the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub program: Option<String>,
    pub vale_config: Option<PathBuf>,
    pub args: Vec<String>,
    pub command: Option<String>,
    pub pattern: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub jobs: Option<usize>,
    pub format: Option<OutputFormat>,
    pub no_color: bool,
    pub no_tree: bool,
    pub no_table: bool,
    pub verbose: bool,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_dirs(Path::new("."), dirs::home_dir().as_deref())
    }

    /// Search `project_dir`, then `home_dir`, for a configuration file
    pub fn load_from_dirs(project_dir: &Path, home_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let candidates = std::iter::once(project_dir).chain(home_dir);
        for dir in candidates {
            for name in &CONFIG_NAMES {
                let path = dir.join(name);
                if path.is_file() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(&mut self, cli: CliOverrides) {
        if let Some(program) = cli.program {
            self.linter.program = program;
            // An explicit program wins over a configured shell template
            self.linter.command = None;
        }
        if let Some(path) = cli.vale_config {
            self.linter.config = Some(path);
        }
        self.linter.args.extend(cli.args);
        if let Some(command) = cli.command {
            self.linter.command = Some(command);
        }
        if let Some(pattern) = cli.pattern {
            self.files.pattern = Some(pattern);
        }
        if let Some(exclude) = cli.exclude {
            self.files.exclude.extend(exclude);
        }
        if let Some(jobs) = cli.jobs {
            self.engine.jobs = jobs;
        }
        if let Some(format) = cli.format {
            self.output.format = format;
        }
        if cli.no_color {
            self.output.color = ColorMode::Never;
        }
        if cli.no_tree {
            self.output.tree = false;
        }
        if cli.no_table {
            self.output.table = false;
        }
        if cli.verbose {
            self.output.verbose = true;
        }
    }

    /// Build the invocation described by the linter section
    ///
    /// A shell template carries its own arguments, so `config` and `args`
    /// cannot be combined with it.
    pub fn invocation(&self) -> Result<Invocation, ConfigError> {
        match &self.linter.command {
            Some(template) => {
                if self.linter.config.is_some() || !self.linter.args.is_empty() {
                    return Err(ConfigError::Invalid(
                        "linter config and args only apply to a program; \
                         put them in the command template instead"
                            .to_string(),
                    ));
                }
                Ok(Invocation::shell(template))
            }
            None => Ok(Invocation::Program {
                program: self.linter.program.clone(),
                config: self.linter.config.clone(),
                args: self.linter.args.clone(),
            }),
        }
    }

    /// Resolve the `auto` color mode against the terminal
    pub fn use_color(&self, is_terminal: bool) -> bool {
        match self.output.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => is_terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert_eq!(config.linter.program, "vale");
        assert_eq!(config.files.pattern.as_deref(), Some(DEFAULT_PATTERN));
        assert_eq!(config.engine.jobs, 1);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.output.tree);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "compact".parse::<OutputFormat>().unwrap(),
            OutputFormat::Compact
        );
        assert!("sarif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_yaml_deserialize() {
        let yaml = r#"
linter:
  config: styles/.vale.ini
  args: ["--no-wrap"]
files:
  pattern: '\.rst$'
engine:
  jobs: 4
output:
  format: json
  tree: false
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.linter.program, "vale");
        assert_eq!(
            config.linter.config,
            Some(PathBuf::from("styles/.vale.ini"))
        );
        assert_eq!(config.linter.args, vec!["--no-wrap".to_string()]);
        assert_eq!(config.files.pattern.as_deref(), Some(r"\.rst$"));
        // Unlisted sections keep their defaults
        assert_eq!(config.files.exclude.len(), 2);
        assert_eq!(config.engine.jobs, 4);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.tree);
        assert!(config.output.table);
    }

    #[test]
    fn test_load_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"linter": {"program": "vale-nightly"}}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.linter.program, "vale-nightly");
    }

    #[test]
    fn test_load_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".vale-docs.yaml");
        std::fs::write(&path, "engine: [not, a, map").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_load_from_dirs_prefers_project() {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        std::fs::write(
            project.path().join(".vale-docs.yaml"),
            "engine:\n  jobs: 3\n",
        )
        .unwrap();
        std::fs::write(home.path().join(".vale-docs.yaml"), "engine:\n  jobs: 8\n").unwrap();

        let config = Config::load_from_dirs(project.path(), Some(home.path())).unwrap();
        assert_eq!(config.engine.jobs, 3);
    }

    #[test]
    fn test_load_from_dirs_falls_back_to_home() {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join(".vale-docs.yml"), "engine:\n  jobs: 8\n").unwrap();

        let config = Config::load_from_dirs(project.path(), Some(home.path())).unwrap();
        assert_eq!(config.engine.jobs, 8);
    }

    #[test]
    fn test_load_from_dirs_defaults() {
        let project = TempDir::new().unwrap();
        let config = Config::load_from_dirs(project.path(), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_merge_cli() {
        let mut config = Config::new();
        config.merge_cli(CliOverrides {
            vale_config: Some(PathBuf::from(".vale.ini")),
            pattern: Some(r"\.txt$".to_string()),
            exclude: Some(vec!["drafts/**".to_string()]),
            jobs: Some(0),
            format: Some(OutputFormat::Compact),
            no_color: true,
            no_table: true,
            ..Default::default()
        });

        assert_eq!(config.linter.config, Some(PathBuf::from(".vale.ini")));
        assert_eq!(config.files.pattern.as_deref(), Some(r"\.txt$"));
        assert!(config.files.exclude.contains(&"drafts/**".to_string()));
        assert_eq!(config.engine.jobs, 0);
        assert_eq!(config.output.format, OutputFormat::Compact);
        assert_eq!(config.output.color, ColorMode::Never);
        assert!(!config.output.table);
        assert!(config.output.tree);
    }

    #[test]
    fn test_invocation_selection() {
        let mut config = Config::new();
        assert!(matches!(config.invocation(), Ok(Invocation::Program { .. })));

        config.merge_cli(CliOverrides {
            command: Some("vale --minAlertLevel=error".to_string()),
            ..Default::default()
        });
        assert!(matches!(config.invocation(), Ok(Invocation::Shell { .. })));

        config.merge_cli(CliOverrides {
            program: Some("vale".to_string()),
            ..Default::default()
        });
        assert!(matches!(config.invocation(), Ok(Invocation::Program { .. })));
    }

    #[test]
    fn test_shell_template_rejects_program_options() {
        let mut config = Config::new();
        config.merge_cli(CliOverrides {
            command: Some("vale".to_string()),
            vale_config: Some(PathBuf::from(".vale.ini")),
            ..Default::default()
        });
        assert!(matches!(config.invocation(), Err(ConfigError::Invalid(_))));

        let mut config = Config::new();
        config.merge_cli(CliOverrides {
            command: Some("vale".to_string()),
            args: vec!["--no-wrap".to_string()],
            ..Default::default()
        });
        assert!(matches!(config.invocation(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_use_color() {
        let mut config = Config::new();
        assert!(config.use_color(true));
        assert!(!config.use_color(false));
        config.output.color = ColorMode::Always;
        assert!(config.use_color(false));
        config.output.color = ColorMode::Never;
        assert!(!config.use_color(true));
    }
}
