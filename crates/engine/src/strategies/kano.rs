use roadmap_core::{Feature, Framework, ScoredFeature};

use super::PrioritizationStrategy;
use crate::tables::CategoryTable;

/// Basic / Performance / Delighter by first matching keyword rule.
#[derive(Debug, Clone, PartialEq)]
pub struct KanoStrategy {
    table: CategoryTable,
}

impl KanoStrategy {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }
}

impl Default for KanoStrategy {
    fn default() -> Self {
        Self::new(CategoryTable::kano())
    }
}

impl PrioritizationStrategy for KanoStrategy {
    fn framework(&self) -> Framework {
        Framework::Kano
    }

    fn score(&self, feature: &Feature) -> ScoredFeature {
        let rule = self.table.classify(&feature.folded());
        ScoredFeature::categorical(feature.clone(), rule.score, rule.category)
    }
}

#[cfg(test)]
mod tests {
    use roadmap_core::Category;

    use super::*;

    fn classify(text: &str) -> (Option<Category>, f64) {
        let scored = KanoStrategy::default().score(&Feature::from(text));
        (scored.category, scored.score)
    }

    #[test]
    fn test_basic_expectations() {
        assert_eq!(classify("App crash on launch"), (Some(Category::Basic), 80.0));
        assert_eq!(classify("Clearer ERROR messages"), (Some(Category::Basic), 80.0));
    }

    #[test]
    fn test_performance_features() {
        assert_eq!(classify("Reduce search latency"), (Some(Category::Performance), 60.0));
        assert_eq!(classify("Faster sync speed"), (Some(Category::Performance), 60.0));
    }

    #[test]
    fn test_basic_outranks_performance() {
        assert_eq!(classify("Fix performance regression"), (Some(Category::Basic), 80.0));
    }

    #[test]
    fn test_everything_else_delights() {
        assert_eq!(classify("Animated confetti"), (Some(Category::Delighter), 40.0));
    }
}
