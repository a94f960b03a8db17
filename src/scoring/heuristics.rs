//! Derived heuristics: message length tiers and word repetition.
//!
//! Bonuses are additive and are applied after intensifier amplification, so
//! they are never scaled by a multiplier.

use std::collections::HashMap;

/// An additive bonus and the reason reported for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bonus {
    pub amount: f64,
    pub reason: &'static str,
}

/// A word-count tier. `min_score` is an exclusive lower bound.
struct Tier {
    words: usize,
    min_score: f64,
    bonus: Bonus,
}

/// Short-message tiers, tightest first. At most one applies.
const SHORT_TIERS: [Tier; 2] = [
    Tier {
        words: 3,
        min_score: 0.15,
        bonus: Bonus {
            amount: 0.15,
            reason: "Very short + charged",
        },
    },
    Tier {
        words: 8,
        min_score: 0.20,
        bonus: Bonus {
            amount: 0.10,
            reason: "Short + angry",
        },
    },
];

/// Long-message tiers, longest first. At most one applies.
const RANT_TIERS: [Tier; 2] = [
    Tier {
        words: 150,
        min_score: 0.25,
        bonus: Bonus {
            amount: 0.15,
            reason: "Extended rant",
        },
    },
    Tier {
        words: 80,
        min_score: 0.30,
        bonus: Bonus {
            amount: 0.10,
            reason: "Long rant",
        },
    },
];

/// Bonus for repeated words.
pub const REPETITION_BONUS: Bonus = Bonus {
    amount: 0.10,
    reason: "Repetition (agitation)",
};

/// Score a text must exceed before repetition counts as agitation.
pub const REPETITION_MIN_SCORE: f64 = 0.20;

/// Normalised tokens must be longer than this many characters.
const REPETITION_MIN_TOKEN_CHARS: usize = 3;

/// A normalised token must occur more than this many times.
const REPETITION_MAX_OCCURRENCES: usize = 2;

/// Number of whitespace-separated words; empty tokens are not counted.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Bonus for a short, already-charged message.
pub fn short_bonus(word_count: usize, score: f64) -> Option<Bonus> {
    SHORT_TIERS
        .iter()
        .find(|tier| word_count <= tier.words && score > tier.min_score)
        .map(|tier| tier.bonus)
}

/// Bonus for a long, already-charged message.
pub fn rant_bonus(word_count: usize, score: f64) -> Option<Bonus> {
    RANT_TIERS
        .iter()
        .find(|tier| word_count > tier.words && score > tier.min_score)
        .map(|tier| tier.bonus)
}

/// Bonus when some normalised word repeats and the score is already high
/// enough. Fires at most once however many words repeat.
pub fn repetition_bonus(text: &str, score: f64) -> Option<Bonus> {
    if score > REPETITION_MIN_SCORE && has_repeated_word(text) {
        Some(REPETITION_BONUS)
    } else {
        None
    }
}

/// Lower-case a word and drop every non-alphabetic character.
pub fn normalize_token(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect()
}

fn has_repeated_word(text: &str) -> bool {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in text.split_whitespace() {
        let token = normalize_token(word);
        if token.chars().count() <= REPETITION_MIN_TOKEN_CHARS {
            continue;
        }
        let count = counts.entry(token).or_default();
        *count += 1;
        if *count > REPETITION_MAX_OCCURRENCES {
            return true;
        }
    }
    false
}
