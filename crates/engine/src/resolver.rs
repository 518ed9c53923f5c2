//! Framework token to strategy dispatch.

use roadmap_core::{Feature, Framework, ScoredFeature};
use serde::Serialize;
use tracing::warn;

use crate::strategies::{PrioritizationStrategy, Strategy};
use crate::tables::ScoringTables;

/// Scored features plus the framework that actually produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// Token as the caller supplied it.
    pub requested: String,
    pub framework: Framework,
    /// True when `requested` was not recognized and RICE was used instead.
    pub fell_back: bool,
    pub scored_features: Vec<ScoredFeature>,
}

/// Resolves framework tokens to one of four prebuilt strategies.
///
/// Unrecognized tokens fall back to RICE. The fallback is reported on the
/// returned [`Resolution`] rather than raised.
#[derive(Debug, Clone)]
pub struct StrategyResolver {
    strategies: [Strategy; 4],
}

impl StrategyResolver {
    pub fn new(tables: &ScoringTables) -> Self {
        Self {
            strategies: Framework::ALL.map(|f| Strategy::for_framework(f, tables)),
        }
    }

    /// Strategy for a known framework.
    pub fn strategy(&self, framework: Framework) -> &Strategy {
        // `strategies` is built in `Framework::ALL` order, which is declaration order.
        &self.strategies[framework as usize]
    }

    /// Normalize `framework`, score `features` with the matching strategy.
    pub fn resolve(&self, framework: &str, features: &[Feature]) -> Resolution {
        let (resolved, fell_back) = Framework::parse_or_default(framework);
        if fell_back {
            warn!(
                requested = %framework,
                fallback = %resolved,
                "Unknown framework, scoring with fallback"
            );
        }

        Resolution {
            requested: framework.to_string(),
            framework: resolved,
            fell_back,
            scored_features: self.score(resolved, features),
        }
    }

    /// Score `features` with an already-parsed framework.
    pub fn score(&self, framework: Framework, features: &[Feature]) -> Vec<ScoredFeature> {
        self.strategy(framework).apply(features)
    }
}

impl Default for StrategyResolver {
    fn default() -> Self {
        Self::new(&ScoringTables::default())
    }
}

#[cfg(test)]
mod tests {
    use roadmap_core::Category;

    use super::*;

    fn features(items: &[&str]) -> Vec<Feature> {
        items.iter().copied().map(Feature::from).collect()
    }

    #[test]
    fn test_tokens_are_case_insensitive() {
        let resolver = StrategyResolver::default();
        let input = features(&["Fix checkout"]);

        for token in ["moscow", "MoSCoW", " MOSCOW "] {
            let resolution = resolver.resolve(token, &input);
            assert_eq!(resolution.framework, Framework::Moscow);
            assert!(!resolution.fell_back);
            assert_eq!(resolution.scored_features[0].category, Some(Category::Must));
        }
    }

    #[test]
    fn test_unknown_token_falls_back_to_rice() {
        let resolver = StrategyResolver::default();
        let input = features(&["Improve checkout reliability", "Add referral loop"]);

        let bogus = resolver.resolve("bogus", &input);
        let rice = resolver.resolve("RICE", &input);

        assert!(bogus.fell_back);
        assert_eq!(bogus.requested, "bogus");
        assert_eq!(bogus.framework, Framework::Rice);
        assert_eq!(bogus.scored_features, rice.scored_features);
    }

    #[test]
    fn test_every_result_has_a_score() {
        let resolver = StrategyResolver::default();
        let input = features(&["Onboarding checklist", "Crash reporter"]);

        for token in ["RICE", "ICE", "MOSCOW", "KANO", "unknown"] {
            let resolution = resolver.resolve(token, &input);
            assert_eq!(resolution.scored_features.len(), input.len());
            assert!(resolution
                .scored_features
                .iter()
                .all(|s| s.score.is_finite() && s.score > 0.0));
        }
    }

    #[test]
    fn test_strategy_lookup() {
        let resolver = StrategyResolver::default();
        for framework in Framework::ALL {
            assert_eq!(resolver.strategy(framework).framework(), framework);
        }
    }
}
