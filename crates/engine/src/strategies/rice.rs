use roadmap_core::{Feature, Framework, ScoreBreakdown, ScoredFeature};

use super::{round3, PrioritizationStrategy};
use crate::tables::RiceTable;

/// Reach x Impact x Confidence / Effort, estimated from the feature text.
///
/// - reach: word count, at least 1
/// - impact: 1 + number of impact keywords present
/// - confidence: fixed by the table
/// - effort: one unit per `chars_per_effort` characters, rounded up, at least 1
#[derive(Debug, Clone, PartialEq)]
pub struct RiceStrategy {
    table: RiceTable,
}

impl RiceStrategy {
    pub fn new(table: RiceTable) -> Self {
        Self { table }
    }

    fn breakdown(&self, feature: &Feature) -> (u32, u32, u32) {
        let text = feature.folded();
        let reach = feature.word_count().max(1) as u32;
        let impact = 1 + self.table.impact_keywords.count_in(&text) as u32;
        let per_unit = self.table.chars_per_effort.max(1) as usize;
        let effort = feature.char_len().div_ceil(per_unit).max(1) as u32;
        (reach, impact, effort)
    }
}

impl Default for RiceStrategy {
    fn default() -> Self {
        Self::new(RiceTable::default())
    }
}

impl PrioritizationStrategy for RiceStrategy {
    fn framework(&self) -> Framework {
        Framework::Rice
    }

    fn score(&self, feature: &Feature) -> ScoredFeature {
        let (reach, impact, effort) = self.breakdown(feature);
        let confidence = self.table.confidence;
        let score = round3(f64::from(reach) * f64::from(impact) * confidence / f64::from(effort));

        ScoredFeature::numeric(
            feature.clone(),
            score,
            ScoreBreakdown::Rice {
                reach,
                impact,
                confidence,
                effort,
            },
        )
    }
}
