//! Rule-driven provocation scoring for chat messages.
//!
//! The core is [`scoring::ScoringEngine`]: a pure function from text to a
//! score in `[0, 1]`, a [`scoring::Category`] and an ordered list of reasons,
//! parameterised by an immutable, data-driven [`scoring::RuleBank`].
//!
//! Everything around it belongs to the caller:
//! - [`stats`] keeps running counters
//! - [`presentation`] maps categories to reactions and colours
//! - [`config`] and [`cli`] wire the engine into a command-line shell
//!
//! # Example
//!
//! ```
//! use ragebait::scoring::{Category, ScoringEngine};
//!
//! let engine = ScoringEngine::reference()?;
//! let result = engine.classify("YOU ARE ALL IDIOTS!!!! WAKE UP SHEEPLE!!!");
//! assert!(result.category >= Category::High);
//! assert_eq!(result.reasons[0], "ALL CAPS yelling");
//! # Ok::<(), ragebait::error::ConfigError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod presentation;
pub mod scoring;
pub mod stats;

pub use error::{ConfigError, RuleError};
pub use scoring::{Breakdown, Category, ClassificationResult, RuleBank, ScoringEngine};
