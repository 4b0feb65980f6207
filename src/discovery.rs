//! Locating documentation files to check

use colored::Colorize;
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("{0} is not a valid directory or file")]
    InvalidTarget(PathBuf),

    #[error("Invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid exclude glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Decides which files are handed to the linter
#[derive(Debug, Clone)]
pub struct FileSelector {
    pattern: Option<Regex>,
    exclude: GlobSet,
}

impl FileSelector {
    pub fn new(pattern: Option<&str>, exclude: &[String]) -> Result<Self, DiscoveryError> {
        let pattern = pattern
            .map(|p| {
                Regex::new(p).map_err(|source| DiscoveryError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .transpose()?;

        let mut builder = GlobSetBuilder::new();
        for glob in exclude {
            let compiled = Glob::new(glob).map_err(|source| DiscoveryError::InvalidGlob {
                pattern: glob.clone(),
                source,
            })?;
            builder.add(compiled);
        }
        let exclude = builder
            .build()
            .map_err(|source| DiscoveryError::InvalidGlob {
                pattern: exclude.join(","),
                source,
            })?;

        Ok(Self { pattern, exclude })
    }

    /// Selector that accepts every file
    pub fn all() -> Self {
        Self {
            pattern: None,
            exclude: GlobSet::empty(),
        }
    }

    /// The file-name regex, if any
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    /// Check a path relative to the walked root
    pub fn matches(&self, relative: &Path) -> bool {
        if self.exclude.is_match(relative) {
            return false;
        }
        match &self.pattern {
            Some(re) => relative
                .file_name()
                .map(|name| re.is_match(&name.to_string_lossy()))
                .unwrap_or(false),
            None => true,
        }
    }
}

/// Files picked out of a target path
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Directory (or single file) that was searched
    pub root: PathBuf,
    /// File-name regex used for filtering
    pub pattern: Option<String>,
    /// Matching files, sorted
    pub files: Vec<PathBuf>,
    /// Every entry below the root, matched or not
    pub total_files: usize,
}

impl Selection {
    pub fn matched_files(&self) -> usize {
        self.files.len()
    }
}

/// Recursively collect the files under `target` accepted by `selector`
pub fn collect_files(target: &Path, selector: &FileSelector) -> Result<Selection, DiscoveryError> {
    let pattern = selector.pattern().map(str::to_string);

    if target.is_file() {
        let name = target.file_name().map(PathBuf::from).unwrap_or_default();
        let files = if selector.matches(&name) {
            vec![target.to_path_buf()]
        } else {
            Vec::new()
        };
        return Ok(Selection {
            root: target.to_path_buf(),
            pattern,
            files,
            total_files: 1,
        });
    }

    if !target.is_dir() {
        return Err(DiscoveryError::InvalidTarget(target.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut total_files = 0;

    for entry in WalkDir::new(target).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", target.display(), e);
                continue;
            }
        };
        total_files += 1;

        // Follows symlinks, so a linked document is checked like a regular one
        if !entry.path().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(target).unwrap_or(entry.path());
        if selector.matches(relative) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    log::debug!(
        "Matched {} of {} entries under {}",
        files.len(),
        total_files,
        target.display()
    );

    Ok(Selection {
        root: target.to_path_buf(),
        pattern,
        files,
        total_files,
    })
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Tree rendering of matched files below a root
pub struct FileTree<'a> {
    root: &'a Path,
    pattern: Option<&'a str>,
    files: &'a [PathBuf],
    colored: bool,
}

impl<'a> FileTree<'a> {
    pub fn new(root: &'a Path, pattern: Option<&'a str>, files: &'a [PathBuf]) -> Self {
        Self {
            root,
            pattern,
            files,
            colored: true,
        }
    }

    pub fn from_selection(selection: &'a Selection) -> Self {
        Self::new(
            &selection.root,
            selection.pattern.as_deref(),
            &selection.files,
        )
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    pub fn render(&self) -> String {
        let root = absolute(self.root);
        let mut output = String::new();

        let label = root.display().to_string();
        if self.colored {
            output.push_str(&format!("📁 {}", label.blue().bold()));
        } else {
            output.push_str(&format!("📁 {}", label));
        }
        if let Some(pattern) = self.pattern {
            let filter = format!("(Filter: {})", pattern);
            if self.colored {
                output.push_str(&format!(" {}", filter.yellow()));
            } else {
                output.push_str(&format!(" {}", filter));
            }
        }
        output.push('\n');

        let count = self.files.len();
        for (i, file) in self.files.iter().enumerate() {
            let branch = if i + 1 == count { "└── " } else { "├── " };
            let abs_file = absolute(file);
            let relative = abs_file
                .strip_prefix(&root)
                .ok()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| file.file_name().map(PathBuf::from).unwrap_or_default());

            let rel = relative.display().to_string();
            let abs = abs_file.display().to_string();
            if self.colored {
                output.push_str(&format!(
                    "{}📄 {} ({})\n",
                    branch,
                    rel.green(),
                    abs.dimmed()
                ));
            } else {
                output.push_str(&format!("{}📄 {} ({})\n", branch, rel, abs));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn docs_fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("guide/advanced")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("index.md"), "# Home\n").unwrap();
        fs::write(root.join("guide/setup.mdx"), "# Setup\n").unwrap();
        fs::write(root.join("guide/advanced/tuning.md"), "# Tuning\n").unwrap();
        fs::write(root.join("guide/logo.png"), [0u8; 4]).unwrap();
        fs::write(root.join("node_modules/pkg/README.md"), "vendored\n").unwrap();
        dir
    }

    fn relative(selection: &Selection) -> Vec<String> {
        selection
            .files
            .iter()
            .map(|f| {
                f.strip_prefix(&selection.root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_collect_with_pattern_and_exclude() {
        let dir = docs_fixture();
        let selector =
            FileSelector::new(Some(r"\.mdx?$"), &["**/node_modules/**".to_string()]).unwrap();

        let selection = collect_files(dir.path(), &selector).unwrap();
        assert_eq!(
            relative(&selection),
            vec!["guide/advanced/tuning.md", "guide/setup.mdx", "index.md"]
        );
        // 4 directories + 5 files
        assert_eq!(selection.total_files, 9);
        assert_eq!(selection.matched_files(), 3);
    }

    #[test]
    fn test_collect_without_pattern() {
        let dir = docs_fixture();
        let selection = collect_files(dir.path(), &FileSelector::all()).unwrap();
        assert_eq!(selection.matched_files(), 5);
        assert_eq!(selection.pattern, None);
    }

    #[test]
    fn test_pattern_matches_file_name_only() {
        let selector = FileSelector::new(Some("guide"), &[]).unwrap();
        assert!(!selector.matches(Path::new("guide/setup.md")));
        assert!(selector.matches(Path::new("docs/guide.md")));
    }

    #[test]
    fn test_single_file_target() {
        let dir = docs_fixture();
        let file = dir.path().join("index.md");
        let selector = FileSelector::new(Some(r"\.md$"), &[]).unwrap();

        let selection = collect_files(&file, &selector).unwrap();
        assert_eq!(selection.files, vec![file]);
        assert_eq!(selection.total_files, 1);
    }

    #[test]
    fn test_invalid_target() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let err = collect_files(&missing, &FileSelector::all()).unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidTarget(_)));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FileSelector::new(Some("(unclosed"), &[]).unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidPattern { .. }));
    }

    #[test]
    fn test_invalid_glob() {
        let err = FileSelector::new(None, &["a[".to_string()]).unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidGlob { .. }));
    }

    #[test]
    fn test_tree_render() {
        let dir = docs_fixture();
        let selector = FileSelector::new(Some(r"\.md$"), &["**/node_modules/**".to_string()])
            .unwrap();
        let selection = collect_files(dir.path(), &selector).unwrap();

        let tree = FileTree::from_selection(&selection).without_color().render();
        let lines: Vec<_> = tree.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(r"(Filter: \.md$)"));
        assert!(lines[1].starts_with("├── 📄 guide"));
        assert!(lines[2].starts_with("└── 📄 index.md"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_collected() {
        let dir = docs_fixture();
        let shared = TempDir::new().unwrap();
        let target = shared.path().join("shared.md");
        fs::write(&target, "# Shared\n").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("shared.md")).unwrap();

        let selector =
            FileSelector::new(Some(r"\.mdx?$"), &["**/node_modules/**".to_string()]).unwrap();
        let selection = collect_files(dir.path(), &selector).unwrap();

        assert_eq!(
            relative(&selection),
            vec![
                "guide/advanced/tuning.md",
                "guide/setup.mdx",
                "index.md",
                "shared.md"
            ]
        );
        assert_eq!(selection.total_files, 10);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = docs_fixture();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.md"), "# Hidden\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let selector =
            FileSelector::new(Some(r"\.mdx?$"), &["**/node_modules/**".to_string()]).unwrap();
        let result = collect_files(dir.path(), &selector);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let selection = result.unwrap();
        let files = relative(&selection);
        assert!(files.contains(&"index.md".to_string()));
        assert!(files.contains(&"guide/setup.mdx".to_string()));
    }
}
