//! Compiled matchers shared by signals and intensifiers.
//!
//! A rule matches either through a regular expression or through a literal
//! phrase list. Phrase lists run on an Aho-Corasick automaton and only count
//! hits that sit on word boundaries, so `"so"` never fires inside `"also"`.
//! Case-insensitive phrase lists fold both phrases and text to Unicode lower
//! case, matching what `RegexBuilder::case_insensitive` does for patterns.

use std::borrow::Cow;

use aho_corasick::{AhoCorasick, MatchKind};
use regex::{Regex, RegexBuilder};

use crate::error::RuleError;

/// A compiled text matcher.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Regular expression, case sensitivity baked in at compile time.
    Pattern(Regex),
    /// Literal phrases matched at word boundaries.
    Phrases(PhraseSet),
}

impl Matcher {
    /// Compile a regex matcher for rule `id`.
    pub fn pattern(id: &str, pattern: &str, case_sensitive: bool) -> Result<Self, RuleError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|source| RuleError::InvalidPattern {
                id: id.to_string(),
                source,
            })?;
        Ok(Self::Pattern(regex))
    }

    /// Build a phrase matcher for rule `id`.
    pub fn phrases<S: AsRef<str>>(
        id: &str,
        phrases: &[S],
        case_sensitive: bool,
    ) -> Result<Self, RuleError> {
        if phrases.is_empty() || phrases.iter().any(|p| p.as_ref().trim().is_empty()) {
            return Err(RuleError::EmptyPhrase { id: id.to_string() });
        }
        let phrases: Vec<String> = phrases.iter().map(|p| p.as_ref().to_string()).collect();
        let needles: Vec<String> = phrases
            .iter()
            .map(|p| fold_case(p, case_sensitive).into_owned())
            .collect();
        // Overlapping search needs standard semantics; the leftmost-longest
        // choice is made after boundary filtering.
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&needles)
            .map_err(|e| RuleError::PhraseMatcher {
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::Phrases(PhraseSet {
            automaton,
            phrases,
            case_sensitive,
        }))
    }

    /// Number of non-overlapping occurrences in `text`.
    pub fn count(&self, text: &str) -> usize {
        match self {
            Self::Pattern(regex) => regex.find_iter(text).count(),
            Self::Phrases(set) => set.count(text),
        }
    }

    /// Whether `text` contains at least one occurrence.
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Pattern(regex) => regex.is_match(text),
            Self::Phrases(set) => set.is_match(text),
        }
    }

    /// Source form, for listing rules.
    pub fn describe(&self) -> String {
        match self {
            Self::Pattern(regex) => regex.as_str().to_string(),
            Self::Phrases(set) => set.phrases.join(" | "),
        }
    }
}

/// Literal phrases compiled into a single automaton.
#[derive(Debug, Clone)]
pub struct PhraseSet {
    automaton: AhoCorasick,
    phrases: Vec<String>,
    case_sensitive: bool,
}

impl PhraseSet {
    /// Word-bounded hits, leftmost first, longest first at equal start,
    /// without overlaps.
    fn bounded_spans(&self, text: &str) -> Vec<(usize, usize)> {
        let haystack = fold_case(text, self.case_sensitive);
        let mut spans: Vec<(usize, usize)> = self
            .automaton
            .find_overlapping_iter(haystack.as_ref())
            .filter(|m| on_word_boundary(&haystack, m.start(), m.end()))
            .map(|m| (m.start(), m.end()))
            .collect();
        spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut free_from = 0;
        spans.retain(|&(start, end)| {
            if start < free_from {
                return false;
            }
            free_from = end;
            true
        });
        spans
    }

    fn count(&self, text: &str) -> usize {
        self.bounded_spans(text).len()
    }

    fn is_match(&self, text: &str) -> bool {
        let haystack = fold_case(text, self.case_sensitive);
        self.automaton
            .find_overlapping_iter(haystack.as_ref())
            .any(|m| on_word_boundary(&haystack, m.start(), m.end()))
    }
}

fn fold_case(text: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.to_lowercase())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when the span is not glued to word characters on either side.
fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    let first = text[start..end].chars().next();
    let last = text[start..end].chars().next_back();

    // Only enforce a boundary on a side where the phrase itself ends in a
    // word character; phrases like "!!" have no word edge to protect.
    let left_ok = match (before, first) {
        (Some(b), Some(f)) if is_word_char(f) => !is_word_char(b),
        _ => true,
    };
    let right_ok = match (after, last) {
        (Some(a), Some(l)) if is_word_char(l) => !is_word_char(a),
        _ => true,
    };
    left_ok && right_ok
}
