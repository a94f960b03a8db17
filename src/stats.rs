//! Running counters over classified messages.
//!
//! The scoring engine never touches these; whoever drives the engine owns a
//! [`StatsCollector`] and decides when to record or reset it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::scoring::{Category, ClassificationResult};

/// Raw counters.
#[derive(Debug, Clone, Default)]
pub struct ClassificationStats {
    /// Messages recorded since the last reset.
    pub messages_processed: u64,
    /// Messages whose category was above `none`.
    pub flagged: u64,
    /// Tally per category.
    pub by_category: BTreeMap<Category, u64>,
    /// Sum of scores, for the mean.
    pub total_score: f64,
    /// How often each reason was reported.
    pub reason_counts: BTreeMap<String, u64>,
}

/// Collects counters from classification results.
#[derive(Debug, Default)]
pub struct StatsCollector {
    stats: ClassificationStats,
}

impl StatsCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one classification.
    pub fn record(&mut self, result: &ClassificationResult) {
        self.stats.messages_processed += 1;
        self.stats.total_score += result.score;
        if result.is_flagged() {
            self.stats.flagged += 1;
        }
        *self.stats.by_category.entry(result.category).or_default() += 1;
        for reason in &result.reasons {
            *self
                .stats
                .reason_counts
                .entry(reason.clone())
                .or_default() += 1;
        }
    }

    /// Current counters.
    pub fn stats(&self) -> &ClassificationStats {
        &self.stats
    }

    pub fn messages_processed(&self) -> u64 {
        self.stats.messages_processed
    }

    pub fn flagged(&self) -> u64 {
        self.stats.flagged
    }

    /// Messages recorded in `category`.
    pub fn count(&self, category: Category) -> u64 {
        self.stats.by_category.get(&category).copied().unwrap_or(0)
    }

    /// Share of recorded messages that were flagged.
    pub fn flag_rate(&self) -> f64 {
        if self.stats.messages_processed == 0 {
            0.0
        } else {
            self.stats.flagged as f64 / self.stats.messages_processed as f64
        }
    }

    /// Mean score over recorded messages.
    pub fn mean_score(&self) -> f64 {
        if self.stats.messages_processed == 0 {
            0.0
        } else {
            self.stats.total_score / self.stats.messages_processed as f64
        }
    }

    /// Clear all counters.
    pub fn reset(&mut self) {
        self.stats = ClassificationStats::default();
    }

    /// Snapshot suitable for display.
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            messages_processed: self.stats.messages_processed,
            flagged: self.stats.flagged,
            flag_rate: self.flag_rate(),
            mean_score: self.mean_score(),
            by_category: Category::ALL
                .iter()
                .map(|c| (*c, self.count(*c)))
                .collect(),
            // Ties go to the alphabetically first reason.
            top_reason: self
                .stats
                .reason_counts
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(reason, count)| (reason.clone(), *count)),
        }
    }
}

/// Summary of collected counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub messages_processed: u64,
    pub flagged: u64,
    pub flag_rate: f64,
    pub mean_score: f64,
    /// Every category, mildest first, including zero counts.
    pub by_category: Vec<(Category, u64)>,
    pub top_reason: Option<(String, u64)>,
}
