//! Human-readable terminal output.

use colored::Colorize;
use prioritizer::{Analysis, Decision, FrameworkProfile, FrameworkSelection, Narrator, Resolution};
use roadmap_core::{ranked, Framework, Roadmap, ScoredFeature};

use crate::PlannedRoadmap;

pub fn selection(selection: &FrameworkSelection) {
    println!();
    println!("Framework: {}", selection.framework.to_string().bold().green());
    println!("Problem type: {}", display_or_dash(&selection.problem_type));
    println!();
    println!("Signal scores:");
    for framework in Framework::ALL {
        let score = selection.score_of(framework);
        let marker = if framework == selection.framework { "●" } else { "○" };
        println!("  {} {:<7} {}", marker, framework.to_string(), score);
    }
    let decided = match &selection.decided_by {
        Decision::Default => "no signal, default framework".to_string(),
        Decision::Highest => "highest score".to_string(),
        Decision::TieBreak { candidates } => format!(
            "tie between {}, fixed priority order",
            candidates
                .iter()
                .map(Framework::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };
    println!();
    println!("Decided by: {}", decided.dimmed());
    println!();
}

pub fn resolution(resolution: &Resolution) {
    println!();
    if resolution.fell_back {
        println!(
            "{} unknown framework '{}', scored with {}",
            "warning:".yellow().bold(),
            resolution.requested,
            resolution.framework
        );
    }
    let method = if resolution.framework.is_categorical() {
        "category"
    } else {
        "formula"
    };
    println!(
        "Framework: {} ({})",
        resolution.framework.to_string().bold().green(),
        method.dimmed()
    );
    scored_features(&resolution.scored_features);
}

pub fn scored_features(scored: &[ScoredFeature]) {
    println!();
    if scored.is_empty() {
        println!("No features.");
        println!();
        return;
    }

    println!("Prioritized features ({}):", scored.len());
    for (index, item) in ranked(scored).iter().enumerate() {
        println!(
            "  {:>2}. {:<12} {}",
            index + 1,
            item.score_label().cyan(),
            item.feature
        );
    }
    println!();
}

pub fn planned_roadmap(planned: &PlannedRoadmap) {
    println!();
    if planned.fell_back {
        println!(
            "{} unknown framework '{}', planned with {}",
            "warning:".yellow().bold(),
            planned.requested,
            planned.framework
        );
    }
    println!("Framework: {}", planned.framework.to_string().bold().green());
    roadmap(&planned.roadmap);
}

pub fn roadmap(roadmap: &Roadmap) {
    println!();
    println!("{}", "Roadmap".bold());
    println!("════════════════════════════════════════");
    for phase in &roadmap.phases {
        println!();
        println!("{}", phase.label.bold());
        if phase.is_empty() {
            println!("  {}", "No items".dimmed());
        }
        for feature in &phase.features {
            println!("  • {}", feature);
        }
    }
    println!();
}

pub fn analysis(analysis: &Analysis) {
    println!();
    println!("{}", "Product Analysis".bold());
    println!("════════════════════════════════════════");
    println!("Problem type: {}", display_or_dash(&analysis.problem_type));
    println!("Summary:      {}", display_or_dash(&analysis.summary));
    println!();
    println!("Framework: {}", analysis.framework.to_string().bold().green());
    if analysis.fell_back {
        println!(
            "{} unknown framework override, scored with {}",
            "warning:".yellow().bold(),
            analysis.framework
        );
    }
    println!("{}", analysis.explanation);
    scored_features(&analysis.scored_features);
    println!("{}", Narrator::explain_prioritization(&analysis.scored_features));
    roadmap(&analysis.roadmap);
}

const FRAMEWORK_WIDTH: usize = 10;
const BEST_FOR_WIDTH: usize = 24;
const STRENGTH_WIDTH: usize = 22;

pub fn comparison(profiles: &[FrameworkProfile]) {
    println!();
    // Pad before styling; escape codes would count towards the width.
    println!(
        "{} {} {} {}",
        format!("{:<FRAMEWORK_WIDTH$}", "Framework").bold(),
        format!("{:<BEST_FOR_WIDTH$}", "Best For").bold(),
        format!("{:<STRENGTH_WIDTH$}", "Strength").bold(),
        "Weakness".bold()
    );
    for profile in profiles {
        println!(
            "{:<FRAMEWORK_WIDTH$} {:<BEST_FOR_WIDTH$} {:<STRENGTH_WIDTH$} {}",
            profile.framework.to_string(),
            profile.best_for,
            profile.strength,
            profile.weakness
        );
    }
    println!();
    for profile in profiles {
        println!("  {}", profile.lens.dimmed());
    }
    println!();
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
