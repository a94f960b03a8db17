//! Runtime configuration for the scoring shell.
//!
//! Configuration comes from, lowest precedence first:
//! 1. built-in defaults
//! 2. `ragebait.toml` in the working directory, or the file given explicitly
//! 3. environment variables / command-line flags (applied by the CLI)
//!
//! ```toml
//! # ragebait.toml
//! rules_path = "rules/strict.toml"
//! top_reasons = 3
//!
//! [presentation.high]
//! reaction = "🛑"
//! color = 0xcc0000
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::presentation::{Presentation, StyleOverride};
use crate::scoring::{Category, DEFAULT_TOP_REASONS, ScoringEngine};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "ragebait.toml";

/// Effective configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Rule bank file; the reference bank is used when unset.
    pub rules_path: Option<PathBuf>,
    /// Reasons shown by a breakdown.
    pub top_reasons: usize,
    /// Category presentation.
    pub presentation: Presentation,
    /// File the configuration was read from, if any.
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_path: None,
            top_reasons: DEFAULT_TOP_REASONS,
            presentation: Presentation::default(),
            source: None,
        }
    }
}

/// On-disk shape of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    rules_path: Option<PathBuf>,
    #[serde(default)]
    top_reasons: Option<usize>,
    #[serde(default)]
    presentation: BTreeMap<Category, StyleOverride>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse. Without one, the default file
    /// is used when present; if it is broken a warning is logged and the
    /// defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if !default_path.exists() {
            tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
            return Ok(Self::default());
        }
        match Self::from_file(default_path) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", default_path.display(), e);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source, path)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration text. A relative `rules_path` is resolved against
    /// the directory containing `path`.
    pub fn from_toml_str(source: &str, path: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let top_reasons = file.top_reasons.unwrap_or(DEFAULT_TOP_REASONS);
        if top_reasons == 0 {
            return Err(ConfigError::InvalidValue {
                key: "top_reasons".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let mut presentation = Presentation::default();
        for (category, overrides) in &file.presentation {
            presentation.apply(*category, overrides);
        }

        let rules_path = file.rules_path.map(|rules| match path.parent() {
            Some(dir) if rules.is_relative() => dir.join(rules),
            _ => rules,
        });

        Ok(Self {
            rules_path,
            top_reasons,
            presentation,
            source: Some(path.to_path_buf()),
        })
    }

    /// Override the rule bank file.
    pub fn with_rules_path(mut self, rules_path: Option<PathBuf>) -> Self {
        if rules_path.is_some() {
            self.rules_path = rules_path;
        }
        self
    }

    /// Override the breakdown length.
    pub fn with_top_reasons(mut self, top_reasons: Option<usize>) -> Self {
        if let Some(n) = top_reasons.filter(|n| *n > 0) {
            self.top_reasons = n;
        }
        self
    }

    /// Build the engine this configuration describes. Rule errors are fatal.
    pub fn engine(&self) -> Result<ScoringEngine> {
        match &self.rules_path {
            Some(path) => ScoringEngine::from_path(path),
            None => {
                let engine = ScoringEngine::reference()?;
                tracing::info!(
                    "Using reference rule bank ({} signals, {} intensifiers)",
                    engine.bank().signals().len(),
                    engine.bank().intensifiers().len()
                );
                Ok(engine)
            }
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" | "plain" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("invalid log format '{}', expected 'pretty' or 'json'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.top_reasons, DEFAULT_TOP_REASONS);
        assert!(config.rules_path.is_none());
        assert!(config.engine().is_ok());
    }

    #[test]
    fn test_parse_config_file() {
        let source = r#"
            rules_path = "strict.toml"
            top_reasons = 3

            [presentation.high]
            reaction = "🛑"
            color = 0xcc0000
        "#;
        let config = Config::from_toml_str(source, Path::new("/etc/ragebait/ragebait.toml")).unwrap();
        assert_eq!(config.top_reasons, 3);
        assert_eq!(
            config.rules_path,
            Some(PathBuf::from("/etc/ragebait/strict.toml"))
        );
        assert_eq!(config.presentation.reaction(Category::High), Some("🛑"));
        assert_eq!(config.presentation.style(Category::High).color, 0xcc0000);
        assert_eq!(config.presentation.reaction(Category::Medium), Some("⚠️"));
    }

    #[test]
    fn test_absolute_rules_path_kept() {
        let config = Config::from_toml_str(
            "rules_path = \"/srv/rules.toml\"",
            Path::new("conf/ragebait.toml"),
        )
        .unwrap();
        assert_eq!(config.rules_path, Some(PathBuf::from("/srv/rules.toml")));
    }

    #[test]
    fn test_zero_top_reasons_rejected() {
        let err = Config::from_toml_str("top_reasons = 0", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "top_reasons"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = Config::from_toml_str("[presentation.severe]\ncolor = 1", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_rules_path(Some(PathBuf::from("a.toml")))
            .with_top_reasons(Some(2))
            .with_rules_path(None)
            .with_top_reasons(Some(0));
        assert_eq!(config.rules_path, Some(PathBuf::from("a.toml")));
        assert_eq!(config.top_reasons, 2);
    }

    #[test]
    fn test_engine_from_bad_rules_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "version = 1\n[[signals]]\nid = \"x\"\npattern = \"(\"\nweight = 0.2\nlabel = \"X\""
        )
        .unwrap();
        let config = Config::default().with_rules_path(Some(file.path().to_path_buf()));
        let err = config.engine().unwrap_err();
        assert!(matches!(err, ConfigError::Rules(_)));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/ragebait.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
