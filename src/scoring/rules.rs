//! Rule records and the validated, immutable rule bank.
//!
//! Banks are described declaratively (see [`RuleBankSpec`]) and compiled once.
//! Compilation either yields a fully valid bank or the first error found; a
//! partially valid bank is never produced.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RuleError};
use crate::scoring::matcher::Matcher;

/// Highest declarative format version this build understands.
pub const SUPPORTED_VERSION: u32 = 1;

/// Declarative form of a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrases: Option<Vec<String>>,
    #[serde(default)]
    pub case_sensitive: bool,
    pub weight: f64,
    pub label: String,
}

/// Declarative form of an intensifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntensifierSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrases: Option<Vec<String>>,
    #[serde(default)]
    pub case_sensitive: bool,
    pub multiplier: f64,
}

/// Declarative form of a whole rule bank, as stored in a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleBankSpec {
    pub version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub signals: Vec<SignalSpec>,
    #[serde(default)]
    pub intensifiers: Vec<IntensifierSpec>,
}

/// A weighted textual feature.
#[derive(Debug, Clone)]
pub struct Signal {
    /// Unique rule identifier.
    pub id: String,
    /// Reason reported when the signal fires.
    pub label: String,
    /// Score contribution, added once per text regardless of match count.
    pub weight: f64,
    /// Whether the matcher distinguishes case.
    pub case_sensitive: bool,
    matcher: Matcher,
}

impl Signal {
    /// Compile a signal from its declarative form.
    pub fn from_spec(spec: &SignalSpec) -> Result<Self, RuleError> {
        if spec.label.trim().is_empty() {
            return Err(RuleError::EmptyLabel {
                id: spec.id.clone(),
            });
        }
        if !spec.weight.is_finite() || spec.weight <= 0.0 {
            return Err(RuleError::InvalidWeight {
                id: spec.id.clone(),
                weight: spec.weight,
            });
        }
        let matcher = compile_matcher(
            &spec.id,
            spec.pattern.as_deref(),
            spec.phrases.as_deref(),
            spec.case_sensitive,
        )?;
        Ok(Self {
            id: spec.id.clone(),
            label: spec.label.clone(),
            weight: spec.weight,
            case_sensitive: spec.case_sensitive,
            matcher,
        })
    }

    /// The compiled matcher.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

/// A multiplier applied to the accumulated signal score.
#[derive(Debug, Clone)]
pub struct Intensifier {
    /// Unique rule identifier.
    pub id: String,
    /// Factor applied when present; always greater than one.
    pub multiplier: f64,
    /// Whether the matcher distinguishes case.
    pub case_sensitive: bool,
    matcher: Matcher,
}

impl Intensifier {
    /// Compile an intensifier from its declarative form.
    pub fn from_spec(spec: &IntensifierSpec) -> Result<Self, RuleError> {
        if !spec.multiplier.is_finite() || spec.multiplier <= 1.0 {
            return Err(RuleError::InvalidMultiplier {
                id: spec.id.clone(),
                multiplier: spec.multiplier,
            });
        }
        let matcher = compile_matcher(
            &spec.id,
            spec.pattern.as_deref(),
            spec.phrases.as_deref(),
            spec.case_sensitive,
        )?;
        Ok(Self {
            id: spec.id.clone(),
            multiplier: spec.multiplier,
            case_sensitive: spec.case_sensitive,
            matcher,
        })
    }

    /// The compiled matcher.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

fn compile_matcher(
    id: &str,
    pattern: Option<&str>,
    phrases: Option<&[String]>,
    case_sensitive: bool,
) -> Result<Matcher, RuleError> {
    match (pattern, phrases) {
        (Some(_), Some(_)) => Err(RuleError::MatcherConflict { id: id.to_string() }),
        (Some(p), None) if p.is_empty() => Err(RuleError::MissingMatcher { id: id.to_string() }),
        (Some(p), None) => Matcher::pattern(id, p, case_sensitive),
        (None, Some(list)) => Matcher::phrases(id, list, case_sensitive),
        (None, None) => Err(RuleError::MissingMatcher { id: id.to_string() }),
    }
}

/// The ordered, validated set of signals and intensifiers.
///
/// Declaration order is preserved and drives the order in which reasons are
/// reported.
#[derive(Debug, Clone)]
pub struct RuleBank {
    version: u32,
    name: String,
    signals: Vec<Signal>,
    intensifiers: Vec<Intensifier>,
}

impl RuleBank {
    /// Compile and validate a declarative bank.
    pub fn from_spec(spec: &RuleBankSpec) -> Result<Self, RuleError> {
        if spec.version == 0 || spec.version > SUPPORTED_VERSION {
            return Err(RuleError::UnsupportedVersion {
                found: spec.version,
                supported: SUPPORTED_VERSION,
            });
        }

        // Signals and intensifiers share one id namespace.
        let mut seen = HashSet::new();
        let ids = spec
            .signals
            .iter()
            .map(|s| s.id.as_str())
            .chain(spec.intensifiers.iter().map(|i| i.id.as_str()));
        for (index, id) in ids.enumerate() {
            if id.trim().is_empty() {
                return Err(RuleError::EmptyId { index });
            }
            if !seen.insert(id) {
                return Err(RuleError::DuplicateId { id: id.to_string() });
            }
        }

        let signals = spec
            .signals
            .iter()
            .map(Signal::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        let intensifiers = spec
            .intensifiers
            .iter()
            .map(Intensifier::from_spec)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            name = %spec.name,
            version = spec.version,
            signals = signals.len(),
            intensifiers = intensifiers.len(),
            "Compiled rule bank"
        );

        Ok(Self {
            version: spec.version,
            name: spec.name.clone(),
            signals,
            intensifiers,
        })
    }

    /// Parse and compile a bank from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let spec = parse_spec(source, Path::new("<inline>"))?;
        Ok(Self::from_spec(&spec)?)
    }

    /// Load, parse and compile a bank from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = parse_spec(&source, path)?;
        let bank = Self::from_spec(&spec)?;
        tracing::info!(
            "Loaded rule bank '{}' v{} from {} ({} signals, {} intensifiers)",
            bank.name,
            bank.version,
            path.display(),
            bank.signals.len(),
            bank.intensifiers.len()
        );
        Ok(bank)
    }

    /// Format version of the source data.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Bank name, empty when the source did not set one.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signals in declaration order.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Intensifiers in declaration order.
    pub fn intensifiers(&self) -> &[Intensifier] {
        &self.intensifiers
    }
}

fn parse_spec(source: &str, path: &Path) -> Result<RuleBankSpec, ConfigError> {
    toml::from_str(source).map_err(|source| ConfigError::Parse {
        path: PathBuf::from(path),
        source,
    })
}

/// Programmatic construction of small banks.
///
/// Collects declarative entries and validates them all at [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct RuleBankBuilder {
    spec: RuleBankSpec,
}

impl RuleBankBuilder {
    /// Start an empty version-1 bank.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            spec: RuleBankSpec {
                version: SUPPORTED_VERSION,
                name: name.into(),
                signals: Vec::new(),
                intensifiers: Vec::new(),
            },
        }
    }

    /// Add a case-insensitive regex signal.
    pub fn signal(
        self,
        id: impl Into<String>,
        pattern: impl Into<String>,
        weight: f64,
        label: impl Into<String>,
    ) -> Self {
        self.signal_spec(SignalSpec {
            id: id.into(),
            pattern: Some(pattern.into()),
            phrases: None,
            case_sensitive: false,
            weight,
            label: label.into(),
        })
    }

    /// Add a case-sensitive regex signal.
    pub fn case_sensitive_signal(
        self,
        id: impl Into<String>,
        pattern: impl Into<String>,
        weight: f64,
        label: impl Into<String>,
    ) -> Self {
        self.signal_spec(SignalSpec {
            id: id.into(),
            pattern: Some(pattern.into()),
            phrases: None,
            case_sensitive: true,
            weight,
            label: label.into(),
        })
    }

    /// Add a case-insensitive phrase-list signal.
    pub fn phrase_signal(
        self,
        id: impl Into<String>,
        phrases: &[&str],
        weight: f64,
        label: impl Into<String>,
    ) -> Self {
        self.signal_spec(SignalSpec {
            id: id.into(),
            pattern: None,
            phrases: Some(phrases.iter().map(|p| p.to_string()).collect()),
            case_sensitive: false,
            weight,
            label: label.into(),
        })
    }

    /// Add a fully specified signal.
    pub fn signal_spec(mut self, spec: SignalSpec) -> Self {
        self.spec.signals.push(spec);
        self
    }

    /// Add a case-insensitive regex intensifier.
    pub fn intensifier(
        self,
        id: impl Into<String>,
        pattern: impl Into<String>,
        multiplier: f64,
    ) -> Self {
        self.intensifier_spec(IntensifierSpec {
            id: id.into(),
            pattern: Some(pattern.into()),
            phrases: None,
            case_sensitive: false,
            multiplier,
        })
    }

    /// Add a case-insensitive phrase-list intensifier.
    pub fn phrase_intensifier(
        self,
        id: impl Into<String>,
        phrases: &[&str],
        multiplier: f64,
    ) -> Self {
        self.intensifier_spec(IntensifierSpec {
            id: id.into(),
            pattern: None,
            phrases: Some(phrases.iter().map(|p| p.to_string()).collect()),
            case_sensitive: false,
            multiplier,
        })
    }

    /// Add a fully specified intensifier.
    pub fn intensifier_spec(mut self, spec: IntensifierSpec) -> Self {
        self.spec.intensifiers.push(spec);
        self
    }

    /// Validate and compile.
    pub fn build(self) -> Result<RuleBank, RuleError> {
        RuleBank::from_spec(&self.spec)
    }
}
