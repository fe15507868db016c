//! Runtime configuration: extra category rules and exclusion filters.
//!
//! Configuration is optional; with no file present the defaults reproduce
//! the built-in behavior exactly (fixed category table, nothing excluded,
//! hidden files included). A TOML file can assign extra extensions to the
//! built-in categories and exclude files from organization:
//!
//! ```toml
//! skip_hidden = true
//!
//! [rules]
//! Images = [".heic", ".tiff"]
//!
//! [exclude]
//! filenames = ["Thumbs.db"]
//! extensions = ["tmp"]
//! patterns = ["*.partial"]
//! regex = ['^~\$']
//! ```
//!
//! Filters narrow what organize and preview consider; undo always restores
//! everything it finds in the category folders.

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::categories::{Category, CategoryTable, ExtensionConflict};

/// Errors raised while loading or compiling configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    NotFound(PathBuf),
    /// The file is not valid TOML (or has the wrong shape).
    Invalid(String),
    /// The file could not be read.
    Io(String),
    /// A `[rules]` key is not one of the known category names.
    UnknownCategory(String),
    /// A `[rules]` extension is already claimed by another category.
    RuleConflict(ExtensionConflict),
    /// An `exclude.patterns` entry is not a valid glob.
    InvalidGlob(String),
    /// An `exclude.regex` entry failed to compile.
    InvalidRegex { pattern: String, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            Self::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::Io(msg) => write!(f, "IO error reading configuration: {msg}"),
            Self::UnknownCategory(name) => {
                write!(f, "Unknown category '{name}' in [rules]")
            }
            Self::RuleConflict(conflict) => write!(f, "Invalid rule: {conflict}"),
            Self::InvalidGlob(pattern) => write!(f, "Invalid glob pattern '{pattern}'"),
            Self::InvalidRegex { pattern, reason } => {
                write!(f, "Invalid regex pattern '{pattern}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Skip files whose names start with a dot. Off by default: the
    /// organizer's candidate set is every regular file in the folder.
    #[serde(default)]
    pub skip_hidden: bool,

    /// Extra extensions per category, e.g. `Images = [".heic"]`.
    #[serde(default)]
    pub rules: HashMap<String, Vec<String>>,

    /// Rules for leaving files where they are.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Exclusion rule lists; all empty by default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames (e.g. "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns (e.g. "*.partial").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions, case-insensitive, leading dot optional.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the filename.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl Config {
    /// Loads configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. the explicitly provided path (missing file is an error here)
    /// 2. `.sortdir.toml` in the current directory
    /// 3. `~/.config/sortdir/config.toml`
    /// 4. built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local = PathBuf::from(".sortdir.toml");
        if local.exists() {
            return Self::load_from_file(&local);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sortdir")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Builds the category table: the built-in mapping plus any `[rules]`
    /// additions, validated against the table's disjointness invariant.
    pub fn category_table(&self) -> Result<CategoryTable, ConfigError> {
        let mut table = CategoryTable::new();
        for (name, extensions) in &self.rules {
            let category = Category::from_name(name)
                .ok_or_else(|| ConfigError::UnknownCategory(name.clone()))?;
            for extension in extensions {
                table
                    .add_extension(category, extension)
                    .map_err(ConfigError::RuleConflict)?;
            }
        }
        Ok(table)
    }

    /// Compiles the exclusion rules for matching.
    pub fn filters(&self) -> Result<CompiledFilters, ConfigError> {
        let patterns = self
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlob(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let regexes = self
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegex {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledFilters {
            skip_hidden: self.skip_hidden,
            filenames: self.exclude.filenames.iter().cloned().collect(),
            extensions: self
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            patterns,
            regexes,
        })
    }
}

/// Pre-compiled exclusion rules. The default excludes nothing.
#[derive(Debug, Default)]
pub struct CompiledFilters {
    skip_hidden: bool,
    filenames: HashSet<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
    regexes: Vec<Regex>,
}

impl CompiledFilters {
    /// True when the file is a candidate for organization.
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.skip_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            if self.extensions.contains(&ext) {
                return false;
            }
        }

        if self.patterns.iter().any(|p| p.matches(&file_name)) {
            return false;
        }

        if self.regexes.iter().any(|r| r.is_match(&file_name)) {
            return false;
        }

        true
    }
}
