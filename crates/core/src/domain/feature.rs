use std::fmt;

use serde::{Deserialize, Serialize};

use super::framework::Framework;

// ============================================
// Feature
// ============================================

/// A candidate product feature, identified by its exact text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(transparent)]
pub struct Feature(String);

impl Feature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased text used for keyword matching.
    pub fn folded(&self) -> String {
        self.0.to_lowercase()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Feature {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Feature {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Feature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================
// Category
// ============================================

/// Categorical outcome of the MoSCoW and Kano strategies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// MoSCoW: cannot ship without it
    Must,
    /// MoSCoW: important, not critical
    Should,
    /// MoSCoW: nice to have
    Could,
    /// Kano: expected by every user
    Basic,
    /// Kano: more is better
    Performance,
    /// Kano: unexpected value
    Delighter,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Must => "must",
            Self::Should => "should",
            Self::Could => "could",
            Self::Basic => "basic",
            Self::Performance => "performance",
            Self::Delighter => "delighter",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Must => "Must Have",
            Self::Should => "Should Have",
            Self::Could => "Could Have",
            Self::Basic => "Basic Expectation",
            Self::Performance => "Performance Feature",
            Self::Delighter => "Delighter",
        }
    }

    /// The framework this category belongs to.
    pub fn framework(&self) -> Framework {
        match self {
            Self::Must | Self::Should | Self::Could => Framework::Moscow,
            Self::Basic | Self::Performance | Self::Delighter => Framework::Kano,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================
// Scored features
// ============================================

/// Inputs that produced a formula score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreBreakdown {
    Rice {
        reach: u32,
        impact: u32,
        confidence: f64,
        effort: u32,
    },
    Ice {
        impact: u32,
        confidence: f64,
        ease: u32,
    },
}

/// One feature's prioritization result.
///
/// `score` is always present. For MoSCoW and Kano it is the numeric rank of
/// `category`, which keeps sorting uniform across frameworks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ScoredFeature {
    pub feature: Feature,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl ScoredFeature {
    pub fn numeric(feature: Feature, score: f64, breakdown: ScoreBreakdown) -> Self {
        Self {
            feature,
            score,
            category: None,
            breakdown: Some(breakdown),
        }
    }

    pub fn categorical(feature: Feature, score: f64, category: Category) -> Self {
        Self {
            feature,
            score,
            category: Some(category),
            breakdown: None,
        }
    }

    /// Category label if present, otherwise the score rendered to three decimals.
    pub fn score_label(&self) -> String {
        match self.category {
            Some(category) => category.label().to_string(),
            None => format!("{:.3}", self.score),
        }
    }
}

/// Copy of `scored` ordered by descending score.
///
/// The sort is stable, so equal scores keep their input order.
pub fn ranked(scored: &[ScoredFeature]) -> Vec<ScoredFeature> {
    let mut ordered = scored.to_vec();
    ordered.sort_by(|a, b| b.score.total_cmp(&a.score));
    ordered
}
