//! Patcher settings and file filtering rules.
//!
//! Settings are loaded from a TOML file and control the config file extension,
//! the default match type, the run log, and which files are ignored when the
//! config and ROM directories are scanned. Filters support:
//! - Exact filename matching
//! - Glob pattern matching
//! - File extension matching
//! - Regex pattern matching
//! - Include (whitelist) rules that override exclude rules
//!
//! # Configuration File Format
//!
//! ```toml
//! [patcher]
//! config_extension = "cfg"
//! match_type = "alternate"
//! log_prefix = "patch-log"
//! write_log = true
//!
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.srm"]
//! extensions = ["sav", "txt"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```

use crate::matcher::MatchType;
use crate::patcher::{DEFAULT_CONFIG_EXTENSION, PatchOptions};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the settings file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".bezelpatcherrc.toml";

/// Errors that can occur during settings loading and filtering.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Settings file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// IO error while reading settings.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for the patcher, deserialized from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatcherConfig {
    #[serde(default)]
    pub patcher: PatcherSettings,
    #[serde(default)]
    pub filters: FilterRules,
}

/// The `[patcher]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatcherSettings {
    /// Extension of config files, with or without the leading dot.
    #[serde(default = "default_config_extension")]
    pub config_extension: String,

    /// Weakest match type allowed to create files unless overridden on the
    /// command line.
    #[serde(default = "default_match_type")]
    pub match_type: MatchType,

    /// File name prefix of the run log.
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,

    /// Whether to write the run log into the config directory.
    #[serde(default = "default_write_log")]
    pub write_log: bool,
}

fn default_config_extension() -> String {
    DEFAULT_CONFIG_EXTENSION.to_string()
}

fn default_match_type() -> MatchType {
    MatchType::Fuzzy
}

fn default_log_prefix() -> String {
    "patch-log".to_string()
}

fn default_write_log() -> bool {
    true
}

impl Default for PatcherSettings {
    fn default() -> Self {
        Self {
            config_extension: default_config_extension(),
            match_type: default_match_type(),
            log_prefix: default_log_prefix(),
            write_log: default_write_log(),
        }
    }
}

/// Root-level filter rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to include hidden files (starting with "."). Defaults to true,
    /// since titles such as ".hack" start with a dot.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_enable_hidden_files() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

/// Rules for excluding files from matching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.srm").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude (e.g., "sav", "txt").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns to exclude (for advanced users).
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl PatcherConfig {
    /// Load settings from a file, with fallback to defaults.
    ///
    /// Attempts to load settings in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.bezelpatcherrc.toml` in the current directory
    /// 3. Look for `~/.config/bezel-patcher/config.toml` in home directory
    /// 4. Fall back to default settings
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read or parsed,
    /// or if an explicitly provided file does not exist.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("bezel-patcher")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load settings from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;

        let extension = config
            .patcher
            .config_extension
            .trim()
            .trim_start_matches('.')
            .to_string();
        if extension.is_empty() {
            return Err(ConfigError::ConfigInvalid(
                "config_extension must not be empty".to_string(),
            ));
        }
        config.patcher.config_extension = extension;

        if config.patcher.match_type == MatchType::None {
            return Err(ConfigError::ConfigInvalid(
                "match_type must be one of exact, alternate or fuzzy".to_string(),
            ));
        }

        Ok(config)
    }

    /// Builds the options for a run. A `match_type` given on the command line
    /// takes precedence over the one from the settings file.
    pub fn patch_options(&self, commit: bool, match_type: Option<MatchType>) -> PatchOptions {
        PatchOptions {
            commit,
            match_type: match_type.unwrap_or(self.patcher.match_type),
            config_extension: self.patcher.config_extension.clone(),
        }
    }

    /// Compile the filter rules into structures ready for matching.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

/// Compiled filter rules.
///
/// Glob and regex patterns are compiled once so that checking a file name does
/// not reparse them.
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    /// Create compiled filters from filter rules.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex patterns are invalid.
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Check if a file should be considered for matching.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. File extension match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex pattern match - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.matches_include_patterns(file_path) {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(file_path))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }

    fn matches_include_patterns(&self, file_path: &Path) -> bool {
        self.include_patterns
            .iter()
            .any(|pattern| pattern.matches_path(file_path))
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}
