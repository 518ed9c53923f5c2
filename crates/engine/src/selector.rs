//! Framework selection
//!
//! Scores every framework against a problem type and summary using the additive
//! signals in [`SelectorPolicy`], then picks the highest score. Ties resolve by
//! the policy's fixed priority order and a signal-free problem gets the default
//! framework. Selection never fails.

use std::collections::BTreeMap;

use roadmap_core::Framework;
use serde::Serialize;
use tracing::debug;

use crate::tables::SelectorPolicy;

/// How the winning framework was decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// No signal fired.
    Default,
    /// One framework had the strictly highest score.
    Highest,
    /// Several frameworks shared the highest score.
    TieBreak { candidates: Vec<Framework> },
}

/// Outcome of [`FrameworkSelector::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameworkSelection {
    pub framework: Framework,
    /// Problem type after lowercasing and alias resolution.
    pub problem_type: String,
    pub scores: BTreeMap<Framework, u32>,
    pub decided_by: Decision,
}

impl FrameworkSelection {
    pub fn score_of(&self, framework: Framework) -> u32 {
        self.scores.get(&framework).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameworkSelector {
    policy: SelectorPolicy,
}

impl FrameworkSelector {
    pub fn new(policy: SelectorPolicy) -> Self {
        Self { policy }
    }

    /// Pick the framework that best fits the problem.
    pub fn select(&self, problem_type: &str, summary: &str) -> Framework {
        self.evaluate(problem_type, summary).framework
    }

    /// Pick a framework and report the scores behind the choice.
    pub fn evaluate(&self, problem_type: &str, summary: &str) -> FrameworkSelection {
        let problem_type = self.policy.canonical_problem_type(problem_type);
        let text = summary.to_lowercase();

        let mut scores: BTreeMap<Framework, u32> =
            Framework::ALL.into_iter().map(|f| (f, 0)).collect();

        for bonus in &self.policy.type_bonuses {
            if bonus.problem_types.contains_exact(&problem_type) {
                *scores.entry(bonus.framework).or_default() += bonus.points;
            }
        }

        for indicator in &self.policy.indicators {
            if indicator.fires(&text) {
                *scores.entry(indicator.framework).or_default() += indicator.points;
            }
        }

        let best = scores.values().copied().max().unwrap_or(0);
        let (framework, decided_by) = if best == 0 {
            (self.policy.default_framework, Decision::Default)
        } else {
            let leaders: Vec<Framework> = scores
                .iter()
                .filter(|(_, score)| **score == best)
                .map(|(&framework, _)| framework)
                .collect();

            if leaders.len() == 1 {
                (leaders[0], Decision::Highest)
            } else {
                let winner = self
                    .policy
                    .tie_break
                    .iter()
                    .copied()
                    .find(|f| leaders.contains(f))
                    .unwrap_or(leaders[0]);
                (winner, Decision::TieBreak { candidates: leaders })
            }
        };

        debug!(
            problem_type = %problem_type,
            scores = ?scores,
            framework = %framework,
            decided_by = ?decided_by,
            "Selected prioritization framework"
        );

        FrameworkSelection {
            framework,
            problem_type,
            scores,
            decided_by,
        }
    }
}
