//! Provocation scoring engine.
//!
//! The engine holds an immutable [`RuleBank`] and scores text with a pure,
//! deterministic pipeline:
//! - accumulate the weight of every signal that matches at least once
//! - multiply by every intensifier present
//! - add length and repetition bonuses (never amplified)
//! - saturate to `[0, 1]` and bin into a [`Category`]
//!
//! The engine keeps no state between calls and is safe to share across
//! threads without locking.

mod bank;
mod category;
mod heuristics;
mod matcher;
mod rules;

pub use bank::REFERENCE_RULES;
pub use category::{Category, THRESHOLDS};
pub use heuristics::{Bonus, normalize_token, word_count};
pub use matcher::Matcher;
pub use rules::{
    Intensifier, IntensifierSpec, RuleBank, RuleBankBuilder, RuleBankSpec, SUPPORTED_VERSION,
    Signal, SignalSpec,
};

use std::path::Path;

use serde::Serialize;

use crate::error::ConfigError;

/// Number of reasons surfaced by a breakdown unless the caller asks otherwise.
pub const DEFAULT_TOP_REASONS: usize = 5;

/// A signal that fired for a given text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredSignal {
    pub id: String,
    pub label: String,
    pub weight: f64,
    /// Occurrences found; informational only, the weight is counted once.
    pub match_count: usize,
}

/// Outcome of scoring one text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Final score in `[0, 1]`.
    pub score: f64,
    pub category: Category,
    /// Signal labels then bonus reasons, deduplicated, in evaluation order.
    pub reasons: Vec<String>,
    pub word_count: usize,
    /// Signals that fired, in rule bank order.
    pub triggered_signals: Vec<TriggeredSignal>,
    /// Product of the intensifiers present; `1.0` when none matched.
    pub multiplier: f64,
    /// Ids of the intensifiers present, in rule bank order.
    pub intensifiers: Vec<String>,
}

impl ClassificationResult {
    /// Whether the text landed in any category above `none`.
    pub fn is_flagged(&self) -> bool {
        self.category.is_flagged()
    }
}

/// A classification plus the summary shown in detailed analyses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    #[serde(flatten)]
    pub result: ClassificationResult,
    /// Leading reasons, in the same order as `result.reasons`.
    pub top_reasons: Vec<String>,
    /// Multiplier actually applied: present only when above `1.0` and some
    /// signal score existed to scale.
    pub applied_multiplier: Option<f64>,
}

/// Stateless scorer over an immutable rule bank.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    bank: RuleBank,
}

impl ScoringEngine {
    /// Create an engine over a validated bank.
    pub fn new(bank: RuleBank) -> Self {
        Self { bank }
    }

    /// Create an engine over the reference bank.
    pub fn reference() -> Result<Self, ConfigError> {
        Ok(Self::new(RuleBank::reference()?))
    }

    /// Create an engine over a bank loaded from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::new(RuleBank::from_path(path)?))
    }

    /// The rule bank in use.
    pub fn bank(&self) -> &RuleBank {
        &self.bank
    }

    /// Score `text`. Total over all strings, including empty input.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let mut score = 0.0;
        let mut reasons = Vec::new();
        let mut triggered_signals = Vec::new();

        for signal in self.bank.signals() {
            let match_count = signal.matcher().count(text);
            if match_count == 0 {
                continue;
            }
            score += signal.weight;
            push_reason(&mut reasons, &signal.label);
            triggered_signals.push(TriggeredSignal {
                id: signal.id.clone(),
                label: signal.label.clone(),
                weight: signal.weight,
                match_count,
            });
        }

        let mut multiplier = 1.0;
        let mut intensifiers = Vec::new();
        for intensifier in self.bank.intensifiers() {
            if intensifier.matcher().is_match(text) {
                multiplier *= intensifier.multiplier;
                intensifiers.push(intensifier.id.clone());
            }
        }
        // Intensifiers only amplify existing signal score.
        if score > 0.0 {
            score *= multiplier;
        }

        let word_count = heuristics::word_count(text);
        if let Some(bonus) = heuristics::short_bonus(word_count, score) {
            apply_bonus(&mut score, &mut reasons, bonus);
        }
        if let Some(bonus) = heuristics::rant_bonus(word_count, score) {
            apply_bonus(&mut score, &mut reasons, bonus);
        }
        if let Some(bonus) = heuristics::repetition_bonus(text, score) {
            apply_bonus(&mut score, &mut reasons, bonus);
        }

        let score = f64::clamp(score, 0.0, 1.0);
        let category = Category::from_score(score);

        tracing::debug!(
            score,
            category = %category,
            word_count,
            signals = triggered_signals.len(),
            multiplier,
            "Classified text"
        );

        ClassificationResult {
            score,
            category,
            reasons,
            word_count,
            triggered_signals,
            multiplier,
            intensifiers,
        }
    }

    /// Score `text` and surface the first `top_n` reasons and the applied
    /// multiplier.
    pub fn breakdown(&self, text: &str, top_n: usize) -> Breakdown {
        let result = self.classify(text);
        let top_reasons = result.reasons.iter().take(top_n).cloned().collect();
        // Signal weights are positive, so a triggered signal means the
        // multiplier really scaled the score.
        let applied = result.multiplier > 1.0 && !result.triggered_signals.is_empty();
        let applied_multiplier = applied.then_some(result.multiplier);
        Breakdown {
            result,
            top_reasons,
            applied_multiplier,
        }
    }
}

fn push_reason(reasons: &mut Vec<String>, reason: &str) {
    if !reasons.iter().any(|r| r == reason) {
        reasons.push(reason.to_string());
    }
}

fn apply_bonus(score: &mut f64, reasons: &mut Vec<String>, bonus: Bonus) {
    *score += bonus.amount;
    push_reason(reasons, bonus.reason);
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    const EPSILON: f64 = 1e-9;

    fn engine(bank: RuleBank) -> ScoringEngine {
        ScoringEngine::new(bank)
    }

    fn reference() -> ScoringEngine {
        ScoringEngine::reference().unwrap()
    }

    fn single_signal(weight: f64) -> ScoringEngine {
        engine(
            RuleBankBuilder::new("single")
                .signal("marker", r"\bmarker\b", weight, "Marker")
                .build()
                .unwrap(),
        )
    }

    /// Eleven words, no repeats: avoids every length and repetition bonus.
    const MARKER_TEXT: &str = "this sentence carries the marker word and nothing else at all";

    fn neutral_paragraph() -> String {
        "The library opens at nine and closes early on Sundays. ".repeat(20)
    }

    #[test]
    fn test_empty_input() {
        let result = reference().classify("");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.category, Category::None);
        assert!(result.reasons.is_empty());
        assert!(result.triggered_signals.is_empty());
        assert_eq!(result.word_count, 0);
        assert_eq!(result.multiplier, 1.0);
    }

    #[test]
    fn test_whitespace_input() {
        let result = reference().classify("  \n\t  ");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.word_count, 0);
        assert_eq!(result.category, Category::None);
    }

    #[test]
    fn test_category_boundaries_exact() {
        let cases = [
            (0.15, Category::Low),
            (0.35, Category::Medium),
            (0.55, Category::High),
            (0.75, Category::Extreme),
        ];
        for (weight, expected) in cases {
            let result = single_signal(weight).classify(MARKER_TEXT);
            assert_eq!(result.score, weight);
            assert_eq!(result.category, expected, "weight {weight}");
            assert_eq!(result.reasons, vec!["Marker".to_string()]);
        }
    }

    #[test]
    fn test_category_just_below_boundaries() {
        let cases = [
            (0.149, Category::None),
            (0.349, Category::Low),
            (0.549, Category::Medium),
            (0.749, Category::High),
        ];
        for (weight, expected) in cases {
            let result = single_signal(weight).classify(MARKER_TEXT);
            assert_eq!(result.category, expected, "weight {weight}");
        }
    }

    #[test]
    fn test_presence_is_binary() {
        let engine = engine(
            RuleBankBuilder::new("t")
                .signal("insult", r"\b(idiot|moron)\b", 0.25, "Insult")
                .build()
                .unwrap(),
        );
        let text = "idiot moron idiot moron, what else would you call a person like that";
        let result = engine.classify(text);
        assert_eq!(result.reasons, vec!["Insult".to_string()]);
        assert_eq!(result.triggered_signals.len(), 1);
        assert_eq!(result.triggered_signals[0].match_count, 4);
        assert!((result.score - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_shared_labels_deduplicated() {
        let engine = engine(
            RuleBankBuilder::new("t")
                .signal("first", r"\bfoo\b", 0.1, "Shared")
                .signal("second", r"\bbar\b", 0.1, "Shared")
                .build()
                .unwrap(),
        );
        let result = engine.classify("foo and bar appear together in this one short line");
        assert_eq!(result.reasons, vec!["Shared".to_string()]);
        assert_eq!(result.triggered_signals.len(), 2);
        assert!((result.score - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_signal_order_follows_bank() {
        let engine = engine(
            RuleBankBuilder::new("t")
                .signal("a", r"\balpha\b", 0.1, "A")
                .signal("b", r"\bbeta\b", 0.1, "B")
                .build()
                .unwrap(),
        );
        for text in [
            "beta shows up well before alpha in this particular line",
            "alpha shows up well before beta in this particular line",
        ] {
            let result = engine.classify(text);
            assert_eq!(result.reasons, vec!["A".to_string(), "B".to_string()]);
        }
    }

    #[test]
    fn test_intensifier_alone_scores_zero() {
        let engine = engine(
            RuleBankBuilder::new("t")
                .signal("angry", r"\bangry\b", 0.3, "Angry")
                .phrase_intensifier("very", &["literally"], 2.0)
                .build()
                .unwrap(),
        );
        let result = engine.classify("literally");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.category, Category::None);
        assert!(result.reasons.is_empty());
        assert_eq!(result.multiplier, 2.0);
        assert_eq!(result.intensifiers, vec!["very".to_string()]);
    }

    #[test]
    fn test_intensifiers_compose_before_bonuses() {
        let engine = engine(
            RuleBankBuilder::new("t")
                .signal("angry", r"\bangry\b", 0.2, "Angry")
                .phrase_intensifier("very", &["very"], 1.5)
                .phrase_intensifier("so", &["so"], 1.2)
                .build()
                .unwrap(),
        );
        // 0.2 * 1.5 * 1.2 = 0.36, then +0.15 unscaled for a three-word text.
        let result = engine.classify("so very angry");
        assert!((result.multiplier - 1.8).abs() < EPSILON);
        assert!((result.score - 0.51).abs() < EPSILON);
        assert_eq!(
            result.reasons,
            vec!["Angry".to_string(), "Very short + charged".to_string()]
        );
    }

    #[test]
    fn test_short_angry_bonus() {
        let engine = engine(
            RuleBankBuilder::new("t")
                .signal("angry", r"\bangry\b", 0.25, "Angry")
                .build()
                .unwrap(),
        );
        let result = engine.classify("I am really angry right now");
        assert!((result.score - 0.35).abs() < EPSILON);
        assert_eq!(
            result.reasons,
            vec!["Angry".to_string(), "Short + angry".to_string()]
        );
    }

    #[test]
    fn test_rant_bonus_applies_to_charged_long_text() {
        let engine = engine(
            RuleBankBuilder::new("t")
                .signal("angry", r"\bangry\b", 0.3, "Angry")
                .build()
                .unwrap(),
        );
        let text = format!("angry {}", neutral_paragraph());
        let result = engine.classify(&text);
        assert_eq!(result.word_count, 201);
        assert!(result.reasons.contains(&"Extended rant".to_string()));
        assert!(!result.reasons.contains(&"Long rant".to_string()));
    }

    #[test]
    fn test_repetition_bonus_fires_once() {
        let engine = engine(
            RuleBankBuilder::new("t")
                .signal("angry", r"\bangry\b", 0.25, "Angry")
                .build()
                .unwrap(),
        );
        let text = "angry people shouting loudly, people shouting loudly, \
                    people shouting loudly, again and again and again everywhere today";
        let result = engine.classify(text);
        assert!((result.score - 0.35).abs() < EPSILON);
        assert_eq!(
            result.reasons,
            vec!["Angry".to_string(), "Repetition (agitation)".to_string()]
        );
    }

    #[test]
    fn test_score_saturates() {
        let engine = engine(
            RuleBankBuilder::new("t")
                .signal("a", "a", 0.9, "A")
                .signal("b", "b", 0.9, "B")
                .phrase_intensifier("x", &["ab"], 3.0)
                .build()
                .unwrap(),
        );
        let result = engine.classify("ab");
        assert_eq!(result.score, 1.0);
        assert_eq!(result.category, Category::Extreme);
    }

    #[test]
    fn test_end_to_end_reference() {
        let result = reference().classify("YOU ARE ALL IDIOTS!!!! WAKE UP SHEEPLE!!!");
        assert_eq!(
            &result.reasons[..4],
            &[
                "ALL CAPS yelling".to_string(),
                "Exclamation spam".to_string(),
                "Ad hominem".to_string(),
                "Conspiracy rhetoric".to_string(),
            ]
        );
        assert!(result.category >= Category::High);
        assert_eq!(result.word_count, 7);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_long_neutral_text() {
        let text = neutral_paragraph();
        let result = reference().classify(&text);
        assert_eq!(result.word_count, 200);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.category, Category::None);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let engine = reference();
        for text in [
            "",
            "Why do liberals always ruin everything???",
            "You won't believe this 🔥🔥🔥",
            "A calm note about the weather.",
        ] {
            assert_eq!(engine.classify(text), engine.classify(text));
        }
    }

    #[test]
    fn test_concurrent_classification_matches_sequential() {
        let engine = Arc::new(reference());
        let samples = [
            "THIS IS ABSOLUTELY DISGUSTING!!!",
            "you people are literally the worst",
            "Meeting moved to 3pm, see you there.",
            "Why do boomers always complain???",
        ];
        let expected: Vec<_> = samples.iter().map(|s| engine.classify(s)).collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let engine = Arc::clone(&engine);
                    scope.spawn(move || {
                        samples
                            .iter()
                            .map(|s| engine.classify(s))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScoringEngine>();
    }

    #[test]
    fn test_breakdown() {
        let engine = reference();
        let breakdown = engine.breakdown("This is literally the WORST, you idiots!!!", 2);
        assert_eq!(breakdown.top_reasons.len(), 2);
        assert_eq!(breakdown.top_reasons[..], breakdown.result.reasons[..2]);
        assert_eq!(breakdown.applied_multiplier, Some(1.15));

        let calm = engine.breakdown("The idiots here are fine people, honestly.", 5);
        assert_eq!(calm.applied_multiplier, None);
        assert!(calm.top_reasons.len() <= 5);
    }

    #[test]
    fn test_breakdown_omits_multiplier_without_signal_score() {
        let breakdown = reference().breakdown("literally a nice day at the park today", 5);
        assert_eq!(breakdown.result.score, 0.0);
        assert_eq!(breakdown.result.multiplier, 1.15);
        assert_eq!(breakdown.result.intensifiers, vec!["absolutes".to_string()]);
        assert_eq!(breakdown.applied_multiplier, None);
    }

    #[test]
    fn test_breakdown_serializes_flat() {
        let breakdown = reference().breakdown("", DEFAULT_TOP_REASONS);
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["category"], "none");
        assert!(json["applied_multiplier"].is_null());
        assert_eq!(json["top_reasons"].as_array().unwrap().len(), 0);
    }
}
