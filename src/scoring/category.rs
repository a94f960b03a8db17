//! Severity categories and the fixed score thresholds that produce them.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bounds (exclusive) for each category below `Extreme`, lowest first.
pub const THRESHOLDS: [(f64, Category); 4] = [
    (0.15, Category::None),
    (0.35, Category::Low),
    (0.55, Category::Medium),
    (0.75, Category::High),
];

/// Discrete severity bucket derived from a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    None,
    Low,
    Medium,
    High,
    Extreme,
}

impl Category {
    /// All categories, mildest first.
    pub const ALL: [Category; 5] = [
        Category::None,
        Category::Low,
        Category::Medium,
        Category::High,
        Category::Extreme,
    ];

    /// Map a saturated score to its category. Thresholds are half-open: a
    /// score equal to a threshold belongs to the next category up.
    pub fn from_score(score: f64) -> Self {
        THRESHOLDS
            .iter()
            .find(|(limit, _)| score < *limit)
            .map(|(_, category)| *category)
            .unwrap_or(Category::Extreme)
    }

    /// Lower-case name, as used in output and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Extreme => "extreme",
        }
    }

    /// Whether a message in this category counts as flagged.
    pub fn is_flagged(&self) -> bool {
        !matches!(self, Self::None)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Extreme => 4,
        }
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "extreme" => Ok(Self::Extreme),
            _ => Err(format!(
                "invalid category '{}', expected 'none', 'low', 'medium', 'high', or 'extreme'",
                s
            )),
        }
    }
}
