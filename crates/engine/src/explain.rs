//! Framework profiles and plain-language narration of a run.

use roadmap_core::{ranked, Framework, Roadmap, ScoredFeature};
use serde::Serialize;

use crate::selector::{Decision, FrameworkSelection};

/// What a framework is good and bad at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameworkProfile {
    pub framework: Framework,
    pub best_for: &'static str,
    pub strength: &'static str,
    pub weakness: &'static str,
    /// One-line decision lens.
    pub lens: &'static str,
    /// Why the framework suits the problem when it is selected.
    pub rationale: &'static str,
}

pub fn profile(framework: Framework) -> FrameworkProfile {
    match framework {
        Framework::Rice => FrameworkProfile {
            framework,
            best_for: "Roadmap prioritization",
            strength: "Data-driven scoring",
            weakness: "Needs estimates",
            lens: "RICE helps compare multiple options objectively using reach, impact, confidence, and effort.",
            rationale: "RICE was selected because this decision involves roadmap planning where reach, impact, confidence, and effort can be reasonably estimated.",
        },
        Framework::Ice => FrameworkProfile {
            framework,
            best_for: "Fast decisions",
            strength: "Simple & quick",
            weakness: "Subjective",
            lens: "ICE enables fast decisions under uncertainty by balancing impact, confidence, and ease.",
            rationale: "ICE was selected because this decision needs a fast prioritization based on impact, confidence, and ease.",
        },
        Framework::Moscow => FrameworkProfile {
            framework,
            best_for: "Requirement sorting",
            strength: "Stakeholder clarity",
            weakness: "No numeric score",
            lens: "MoSCoW helps prioritize must-haves over nice-to-haves when scope or timelines are tight.",
            rationale: "MoSCoW was selected to clearly separate must-have features from optional ones for delivery planning.",
        },
        Framework::Kano => FrameworkProfile {
            framework,
            best_for: "Customer delight",
            strength: "UX focused",
            weakness: "Needs user research",
            lens: "Kano helps distinguish basic expectations from performance drivers and delighters.",
            rationale: "Kano was selected to understand which features are basic expectations versus those that can delight users.",
        },
    }
}

/// Profiles of all frameworks, in canonical order.
pub fn comparison() -> Vec<FrameworkProfile> {
    Framework::ALL.into_iter().map(profile).collect()
}

/// Turns engine output into short explanations.
pub struct Narrator;

impl Narrator {
    /// Why `framework` is used, optionally citing the selector's decision.
    pub fn explain_framework(framework: Framework, selection: Option<&FrameworkSelection>) -> String {
        let rationale = profile(framework).rationale;
        match selection.map(|s| (&s.decided_by, s.score_of(framework))) {
            None => format!("{rationale} It was chosen explicitly by the caller."),
            Some((Decision::Default, _)) => format!(
                "{rationale} No framework signal was detected, so {framework} is used as the default."
            ),
            Some((Decision::Highest, score)) => {
                format!("{rationale} It scored highest with {score} signal points.")
            }
            Some((Decision::TieBreak { candidates }, score)) => {
                let tied: Vec<String> = candidates.iter().map(Framework::to_string).collect();
                format!(
                    "{rationale} {} tied at {score} signal points; {framework} wins the fixed priority order.",
                    tied.join(", ")
                )
            }
        }
    }

    /// Name the top-ranked feature.
    pub fn explain_prioritization(scored: &[ScoredFeature]) -> String {
        match ranked(scored).first() {
            None => "Features were prioritized based on qualitative impact and feasibility, focusing first on solving core user problems.".to_string(),
            Some(top) => format!(
                "The highest-priority item is {} ({}), as it most directly addresses the critical user and business pain points. Lower-scored features are sequenced later to reduce delivery risk.",
                top.feature,
                top.score_label()
            ),
        }
    }

    /// One line per phase with its size.
    pub fn explain_roadmap(roadmap: &Roadmap) -> String {
        roadmap
            .phases
            .iter()
            .map(|phase| {
                let noun = if phase.len() == 1 { "feature" } else { "features" };
                format!("{}: {} {}", phase.label, phase.len(), noun)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
