//! Prioritization strategies
//!
//! Four deterministic scorers, one per [`Framework`]. Each maps a feature's text
//! to a [`ScoredFeature`] without randomness or hidden state, and
//! [`PrioritizationStrategy::apply`] preserves input order.

mod ice;
mod kano;
mod moscow;
mod rice;

pub use ice::IceStrategy;
pub use kano::KanoStrategy;
pub use moscow::MoscowStrategy;
pub use rice::RiceStrategy;

use roadmap_core::{Feature, Framework, ScoredFeature};

use crate::tables::ScoringTables;

/// Scores features under one framework.
pub trait PrioritizationStrategy: Send + Sync + std::fmt::Debug {
    /// Framework implemented by this strategy.
    fn framework(&self) -> Framework;

    /// Score a single feature.
    fn score(&self, feature: &Feature) -> ScoredFeature;

    /// Score every feature, one result per input, in input order.
    fn apply(&self, features: &[Feature]) -> Vec<ScoredFeature> {
        features.iter().map(|f| self.score(f)).collect()
    }
}

/// Closed set of strategies, one per framework.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Rice(RiceStrategy),
    Ice(IceStrategy),
    Moscow(MoscowStrategy),
    Kano(KanoStrategy),
}

impl Strategy {
    /// Build the strategy for `framework` from the scoring tables.
    pub fn for_framework(framework: Framework, tables: &ScoringTables) -> Self {
        match framework {
            Framework::Rice => Self::Rice(RiceStrategy::new(tables.rice.clone())),
            Framework::Ice => Self::Ice(IceStrategy::new(tables.ice.clone())),
            Framework::Moscow => Self::Moscow(MoscowStrategy::new(tables.moscow.clone())),
            Framework::Kano => Self::Kano(KanoStrategy::new(tables.kano.clone())),
        }
    }

    fn inner(&self) -> &dyn PrioritizationStrategy {
        match self {
            Self::Rice(s) => s,
            Self::Ice(s) => s,
            Self::Moscow(s) => s,
            Self::Kano(s) => s,
        }
    }
}

impl PrioritizationStrategy for Strategy {
    fn framework(&self) -> Framework {
        self.inner().framework()
    }

    fn score(&self, feature: &Feature) -> ScoredFeature {
        self.inner().score(feature)
    }

    fn apply(&self, features: &[Feature]) -> Vec<ScoredFeature> {
        self.inner().apply(features)
    }
}

/// Round to three decimal places.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
