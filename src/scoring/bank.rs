//! The reference rule bank shipped with the crate.

use crate::error::ConfigError;
use crate::scoring::rules::RuleBank;

/// TOML source of the reference bank.
pub const REFERENCE_RULES: &str = include_str!("../../rules/reference.toml");

impl RuleBank {
    /// Compile the reference bank.
    pub fn reference() -> Result<Self, ConfigError> {
        Self::from_toml_str(REFERENCE_RULES)
    }
}
