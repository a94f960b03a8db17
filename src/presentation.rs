//! Caller-side presentation of classification results.
//!
//! Maps each category to a reaction, an embed colour and a verdict string.
//! The engine knows nothing about this; callers pick the defaults or inject
//! their own mapping (usually from the config file).

use serde::{Deserialize, Serialize};

use crate::scoring::{Breakdown, Category, ClassificationResult};

const GREEN: u32 = 0x00ff00;
const ORANGE: u32 = 0xffa500;
const RED: u32 = 0xff0000;

/// How one category is shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Reaction added to a flagged message, if any.
    pub reaction: Option<String>,
    /// RGB colour for rich embeds.
    pub color: u32,
    /// Verdict text.
    pub verdict: String,
}

impl Style {
    fn new(reaction: Option<&str>, color: u32, verdict: &str) -> Self {
        Self {
            reaction: reaction.map(str::to_string),
            color,
            verdict: verdict.to_string(),
        }
    }
}

/// Partial override of a [`Style`]. An empty `reaction` removes the reaction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleOverride {
    pub reaction: Option<String>,
    pub color: Option<u32>,
    pub verdict: Option<String>,
}

/// Category to style mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    none: Style,
    low: Style,
    medium: Style,
    high: Style,
    extreme: Style,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            none: Style::new(None, GREEN, "NONE"),
            low: Style::new(Some("🤔"), GREEN, "LOW"),
            medium: Style::new(Some("⚠️"), ORANGE, "MEDIUM"),
            high: Style::new(Some("🚩"), RED, "HIGH"),
            extreme: Style::new(Some("🚨"), RED, "EXTREME"),
        }
    }
}

impl Presentation {
    /// Style for `category`.
    pub fn style(&self, category: Category) -> &Style {
        match category {
            Category::None => &self.none,
            Category::Low => &self.low,
            Category::Medium => &self.medium,
            Category::High => &self.high,
            Category::Extreme => &self.extreme,
        }
    }

    /// Replace the style for `category`.
    pub fn with_style(mut self, category: Category, style: Style) -> Self {
        *self.style_mut(category) = style;
        self
    }

    /// Merge a partial override into the style for `category`.
    pub fn apply(&mut self, category: Category, overrides: &StyleOverride) {
        let style = self.style_mut(category);
        if let Some(reaction) = &overrides.reaction {
            style.reaction = (!reaction.is_empty()).then(|| reaction.clone());
        }
        if let Some(color) = overrides.color {
            style.color = color;
        }
        if let Some(verdict) = &overrides.verdict {
            style.verdict = verdict.clone();
        }
    }

    /// Reaction for `category`, if any.
    pub fn reaction(&self, category: Category) -> Option<&str> {
        self.style(category).reaction.as_deref()
    }

    /// Plain-text analysis of a result.
    pub fn render(&self, result: &ClassificationResult) -> String {
        self.render_reasons(result, &result.reasons, None)
    }

    /// Plain-text analysis of a breakdown: only the leading reasons, plus the
    /// multiplier when one applied.
    pub fn render_breakdown(&self, breakdown: &Breakdown) -> String {
        self.render_reasons(
            &breakdown.result,
            &breakdown.top_reasons,
            breakdown.applied_multiplier,
        )
    }

    fn render_reasons(
        &self,
        result: &ClassificationResult,
        reasons: &[String],
        multiplier: Option<f64>,
    ) -> String {
        let style = self.style(result.category);
        let mut out = String::new();
        out.push_str(&format!("Score: {:.2}/1.0\n", result.score));
        out.push_str("Indicators:\n");
        if reasons.is_empty() {
            out.push_str("  None detected\n");
        }
        for reason in reasons {
            out.push_str(&format!("  • {}\n", reason));
        }
        if let Some(multiplier) = multiplier {
            out.push_str(&format!("Intensity: x{:.2}\n", multiplier));
        }
        match &style.reaction {
            Some(reaction) => out.push_str(&format!("Verdict: {} {}", reaction, style.verdict)),
            None => out.push_str(&format!("Verdict: {}", style.verdict)),
        }
        out
    }

    fn style_mut(&mut self, category: Category) -> &mut Style {
        match category {
            Category::None => &mut self.none,
            Category::Low => &mut self.low,
            Category::Medium => &mut self.medium,
            Category::High => &mut self.high,
            Category::Extreme => &mut self.extreme,
        }
    }
}
