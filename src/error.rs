//! Error types for rule bank construction and configuration loading.

use std::path::PathBuf;

/// Errors raised while building a rule bank.
///
/// Every variant that concerns a single rule carries its id so the offending
/// entry can be found in the rule file.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The declarative bank uses a format version this build cannot read.
    #[error("Unsupported rule bank version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A rule was declared without an id.
    #[error("Rule #{index} has an empty id")]
    EmptyId { index: usize },

    /// A signal has no human-readable label.
    #[error("Signal '{id}' has an empty label")]
    EmptyLabel { id: String },

    /// Two rules share the same id.
    #[error("Duplicate rule id '{id}'")]
    DuplicateId { id: String },

    /// Both `pattern` and `phrases` were given.
    #[error("Rule '{id}' declares both a pattern and a phrase list")]
    MatcherConflict { id: String },

    /// Neither `pattern` nor `phrases` was given.
    #[error("Rule '{id}' declares neither a pattern nor a phrase list")]
    MissingMatcher { id: String },

    /// A phrase list is empty or contains an empty phrase.
    #[error("Rule '{id}' has an empty phrase")]
    EmptyPhrase { id: String },

    /// The regex failed to compile.
    #[error("Rule '{id}' has an invalid pattern: {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: regex::Error,
    },

    /// The phrase automaton failed to build.
    #[error("Rule '{id}' phrase matcher failed to build: {reason}")]
    PhraseMatcher { id: String, reason: String },

    /// Signal weights must be finite and strictly positive.
    #[error("Signal '{id}' has invalid weight {weight} (must be > 0)")]
    InvalidWeight { id: String, weight: f64 },

    /// Intensifier multipliers must be finite and strictly greater than one.
    #[error("Intensifier '{id}' has invalid multiplier {multiplier} (must be > 1.0)")]
    InvalidMultiplier { id: String, multiplier: f64 },
}

/// Errors raised while loading configuration or rule files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for the expected schema.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The rule bank failed validation.
    #[error("Invalid rule bank: {0}")]
    Rules(#[from] RuleError),

    /// A configuration value is out of range.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
