use roadmap_core::{Feature, Framework, ScoredFeature};

use super::PrioritizationStrategy;
use crate::tables::CategoryTable;

/// Must / Should / Could by first matching keyword rule.
#[derive(Debug, Clone, PartialEq)]
pub struct MoscowStrategy {
    table: CategoryTable,
}

impl MoscowStrategy {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }
}

impl Default for MoscowStrategy {
    fn default() -> Self {
        Self::new(CategoryTable::moscow())
    }
}

impl PrioritizationStrategy for MoscowStrategy {
    fn framework(&self) -> Framework {
        Framework::Moscow
    }

    fn score(&self, feature: &Feature) -> ScoredFeature {
        let rule = self.table.classify(&feature.folded());
        ScoredFeature::categorical(feature.clone(), rule.score, rule.category)
    }
}
