use roadmap_core::{Feature, Framework, ScoreBreakdown, ScoredFeature};

use super::{round3, PrioritizationStrategy};
use crate::tables::IceTable;

/// Impact, Confidence and Ease, estimated from the feature text.
///
/// Ease starts at `ease_ceiling` and drops one step for every
/// `chars_per_ease_step` characters, never below 1. The score is
/// `impact * confidence / ease`.
#[derive(Debug, Clone, PartialEq)]
pub struct IceStrategy {
    table: IceTable,
}

impl IceStrategy {
    pub fn new(table: IceTable) -> Self {
        Self { table }
    }

    fn ease(&self, feature: &Feature) -> u32 {
        let step = self.table.chars_per_ease_step.max(1) as usize;
        let lost = (feature.char_len() / step).min(u32::MAX as usize) as u32;
        self.table.ease_ceiling.saturating_sub(lost).max(1)
    }
}

impl Default for IceStrategy {
    fn default() -> Self {
        Self::new(IceTable::default())
    }
}

impl PrioritizationStrategy for IceStrategy {
    fn framework(&self) -> Framework {
        Framework::Ice
    }

    fn score(&self, feature: &Feature) -> ScoredFeature {
        let impact = 1 + self.table.impact_keywords.count_in(&feature.folded()) as u32;
        let confidence = self.table.confidence;
        let ease = self.ease(feature);
        let score = round3(f64::from(impact) * confidence / f64::from(ease));

        ScoredFeature::numeric(
            feature.clone(),
            score,
            ScoreBreakdown::Ice {
                impact,
                confidence,
                ease,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> ScoredFeature {
        IceStrategy::default().score(&Feature::from(text))
    }

    #[test]
    fn test_short_feature() {
        let scored = score("Add dark mode");
        assert_eq!(
            scored.breakdown,
            Some(ScoreBreakdown::Ice {
                impact: 2,
                confidence: 0.6,
                ease: 5,
            })
        );
        assert_eq!(scored.score, 0.24);
    }

    #[test]
    fn test_ease_drops_every_forty_chars() {
        let text = "x".repeat(85);
        match score(&text).breakdown {
            Some(ScoreBreakdown::Ice { ease, .. }) => assert_eq!(ease, 3),
            other => panic!("unexpected breakdown: {other:?}"),
        }
    }

    #[test]
    fn test_ease_never_below_one() {
        let text = "y".repeat(1000);
        let scored = score(&text);
        match scored.breakdown {
            Some(ScoreBreakdown::Ice { ease, impact, .. }) => {
                assert_eq!(ease, 1);
                assert_eq!(impact, 1);
            }
            other => panic!("unexpected breakdown: {other:?}"),
        }
        assert_eq!(scored.score, 0.6);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let scored = score("INCREASE retention and REDUCE churn");
        match scored.breakdown {
            Some(ScoreBreakdown::Ice { impact, .. }) => assert_eq!(impact, 3),
            other => panic!("unexpected breakdown: {other:?}"),
        }
    }
}
