//! Roadmap generation
//!
//! Sorts each feature into exactly one dependency [`Bucket`] and lays the buckets
//! out over the phases of the framework's template. Every input feature lands in
//! exactly one phase, so the phases always partition the input.

use roadmap_core::{Bucket, Feature, Framework, Roadmap, RoadmapPhase, ScoredFeature};
use serde_json::Value;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::tables::{BucketRule, RoadmapTables, RoadmapTemplate};

// ============================================
// Input normalization
// ============================================

/// Features to schedule, either already scored or raw.
#[derive(Debug, Clone, Copy)]
pub enum RoadmapInput<'a> {
    Scored(&'a [ScoredFeature]),
    Features(&'a [Feature]),
}

impl RoadmapInput<'_> {
    /// Feature names in input order.
    pub fn feature_names(&self) -> Vec<Feature> {
        match self {
            Self::Scored(scored) => scored.iter().map(|s| s.feature.clone()).collect(),
            Self::Features(features) => features.to_vec(),
        }
    }
}

impl<'a> From<&'a [ScoredFeature]> for RoadmapInput<'a> {
    fn from(scored: &'a [ScoredFeature]) -> Self {
        Self::Scored(scored)
    }
}

impl<'a> From<&'a Vec<ScoredFeature>> for RoadmapInput<'a> {
    fn from(scored: &'a Vec<ScoredFeature>) -> Self {
        Self::Scored(scored)
    }
}

impl<'a> From<&'a [Feature]> for RoadmapInput<'a> {
    fn from(features: &'a [Feature]) -> Self {
        Self::Features(features)
    }
}

impl<'a> From<&'a Vec<Feature>> for RoadmapInput<'a> {
    fn from(features: &'a Vec<Feature>) -> Self {
        Self::Features(features)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Names,
    Records,
}

impl Shape {
    fn describe(&self) -> &'static str {
        match self {
            Self::Names => "a feature string",
            Self::Records => "a record with a string `feature` key",
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn record_feature(value: &Value) -> Option<&str> {
    value.as_object()?.get("feature")?.as_str()
}

/// Extract feature names from a JSON array of strings or of `{feature, ...}`
/// records.
///
/// The first element fixes the shape and every later element must match it.
/// Any other input is [`EngineError::InvalidInputShape`].
pub fn normalize_value(value: &Value) -> Result<Vec<Feature>> {
    let items = value.as_array().ok_or_else(|| {
        EngineError::invalid_shape(0, format!("expected an array, got {}", kind(value)))
    })?;

    let Some(first) = items.first() else {
        return Ok(Vec::new());
    };

    let shape = if first.is_string() {
        Shape::Names
    } else if record_feature(first).is_some() {
        Shape::Records
    } else {
        return Err(EngineError::invalid_shape(
            0,
            format!(
                "expected a feature string or a record with a string `feature` key, got {}",
                kind(first)
            ),
        ));
    };

    items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let name = match shape {
                Shape::Names => item.as_str(),
                Shape::Records => record_feature(item),
            };
            name.map(Feature::from).ok_or_else(|| {
                EngineError::invalid_shape(
                    position,
                    format!("expected {}, got {}", shape.describe(), kind(item)),
                )
            })
        })
        .collect()
}

// ============================================
// Generator
// ============================================

#[derive(Debug, Clone)]
pub struct RoadmapGenerator {
    rules: Vec<BucketRule>,
    /// One template per framework, in `Framework::ALL` order.
    templates: Vec<RoadmapTemplate>,
}

impl RoadmapGenerator {
    pub fn new(tables: RoadmapTables) -> Result<Self> {
        tables.validate()?;

        let templates = Framework::ALL
            .into_iter()
            .map(|framework| {
                tables.template(framework).cloned().ok_or_else(|| {
                    EngineError::invalid_policy(format!("no roadmap template for {framework}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rules: tables.buckets,
            templates,
        })
    }

    pub fn template(&self, framework: Framework) -> &RoadmapTemplate {
        &self.templates[framework as usize]
    }

    /// Bucket for `feature` under `framework`.
    ///
    /// Only buckets the framework's template schedules are candidates; the first
    /// matching rule wins and anything unmatched is Expansion.
    pub fn classify(&self, feature: &Feature, framework: Framework) -> Bucket {
        let template = self.template(framework);
        let text = feature.folded();

        self.rules
            .iter()
            .filter(|rule| template.uses(rule.bucket))
            .find(|rule| rule.keywords.any_in(&text))
            .map(|rule| rule.bucket)
            .unwrap_or(Bucket::Expansion)
    }

    /// Build the phased roadmap for `input` under `framework`.
    pub fn generate<'a>(&self, input: impl Into<RoadmapInput<'a>>, framework: Framework) -> Roadmap {
        let features = input.into().feature_names();
        self.assemble(features, framework)
    }

    /// Like [`generate`](Self::generate), for untyped JSON input.
    pub fn generate_value(&self, value: &Value, framework: Framework) -> Result<Roadmap> {
        let features = normalize_value(value)?;
        Ok(self.assemble(features, framework))
    }

    fn assemble(&self, features: Vec<Feature>, framework: Framework) -> Roadmap {
        let mut buckets: [Vec<Feature>; 4] = Default::default();
        for feature in features {
            let bucket = self.classify(&feature, framework);
            buckets[bucket as usize].push(feature);
        }

        debug!(
            framework = %framework,
            foundation = buckets[Bucket::Foundation as usize].len(),
            enablement = buckets[Bucket::Enablement as usize].len(),
            experimentation = buckets[Bucket::Experimentation as usize].len(),
            expansion = buckets[Bucket::Expansion as usize].len(),
            "Bucketed features"
        );

        let phases = self
            .template(framework)
            .phases
            .iter()
            .map(|phase| {
                let mut scheduled = RoadmapPhase::new(phase.label.clone());
                for bucket in &phase.buckets {
                    // Each bucket appears in one phase only, so taking it is lossless.
                    scheduled
                        .features
                        .append(&mut buckets[*bucket as usize]);
                }
                scheduled
            })
            .collect();

        Roadmap::new(phases)
    }
}

impl Default for RoadmapGenerator {
    fn default() -> Self {
        Self::new(RoadmapTables::default()).expect("built-in roadmap tables are valid")
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn features(items: &[&str]) -> Vec<Feature> {
        items.iter().copied().map(Feature::from).collect()
    }

    fn phase_names(roadmap: &Roadmap, index: usize) -> Vec<&str> {
        roadmap.phases[index]
            .features
            .iter()
            .map(Feature::as_str)
            .collect()
    }

    #[test]
    fn test_moscow_example() {
        let generator = RoadmapGenerator::default();
        let input = features(&["Fix onboarding crash", "Add referral loop"]);

        let roadmap = generator.generate(&input, Framework::Moscow);

        assert_eq!(
            roadmap.labels().collect::<Vec<_>>(),
            vec![
                "Q1 (0–3 months) — Deliver Must-Haves",
                "Q2 (3–6 months) — Expand Scope"
            ]
        );
        assert_eq!(phase_names(&roadmap, 0), vec!["Fix onboarding crash"]);
        assert_eq!(phase_names(&roadmap, 1), vec!["Add referral loop"]);
    }

    #[test]
    fn test_classification_precedence() {
        let generator = RoadmapGenerator::default();
        let classify = |text: &str| generator.classify(&Feature::from(text), Framework::Ice);

        assert_eq!(classify("Onboarding tooltip"), Bucket::Foundation);
        assert_eq!(classify("Tooltip experiment"), Bucket::Enablement);
        assert_eq!(classify("Pricing pilot"), Bucket::Experimentation);
        assert_eq!(classify("Referral loop"), Bucket::Expansion);
        assert_eq!(classify("Usage ANALYTICS dashboard"), Bucket::Enablement);
    }

    #[test]
    fn test_unscheduled_bucket_falls_to_expansion() {
        let generator = RoadmapGenerator::default();
        let pilot = Feature::from("Pricing pilot");

        assert_eq!(generator.classify(&pilot, Framework::Ice), Bucket::Experimentation);
        assert_eq!(generator.classify(&pilot, Framework::Rice), Bucket::Expansion);
        assert_eq!(generator.classify(&pilot, Framework::Kano), Bucket::Expansion);
        assert_eq!(generator.classify(&pilot, Framework::Moscow), Bucket::Expansion);
    }

    #[test]
    fn test_ice_phase_order() {
        let generator = RoadmapGenerator::default();
        let input = features(&[
            "Startup performance",
            "Progress nudge",
            "MVP of shared boards",
            "Referral loop",
            "Crash-free sessions",
        ]);

        let roadmap = generator.generate(&input, Framework::Ice);

        assert_eq!(
            phase_names(&roadmap, 0),
            vec![
                "MVP of shared boards",
                "Progress nudge",
                "Startup performance",
                "Crash-free sessions"
            ]
        );
        assert_eq!(phase_names(&roadmap, 1), vec!["Referral loop"]);
    }

    #[test]
    fn test_rice_keeps_experiments() {
        let generator = RoadmapGenerator::default();
        let input = features(&["Onboarding checklist", "Checkout A/B test", "Team spaces"]);

        let roadmap = generator.generate(&input, Framework::Rice);

        assert_eq!(phase_names(&roadmap, 0), vec!["Onboarding checklist"]);
        assert_eq!(
            phase_names(&roadmap, 1),
            vec!["Checkout A/B test", "Team spaces"]
        );
        assert_eq!(roadmap.len(), input.len());
    }

    #[test]
    fn test_empty_input_has_empty_phases() {
        let generator = RoadmapGenerator::default();
        for framework in Framework::ALL {
            let roadmap = generator.generate(&Vec::<Feature>::new(), framework);
            assert_eq!(roadmap.phases.len(), 2);
            assert!(roadmap.is_empty());
        }
    }

    #[test]
    fn test_scored_input_matches_raw_input() {
        let generator = RoadmapGenerator::default();
        let input = features(&["Fix onboarding crash", "Add referral loop"]);
        let scored = crate::StrategyResolver::default().score(Framework::Kano, &input);

        assert_eq!(
            generator.generate(&scored, Framework::Kano),
            generator.generate(&input, Framework::Kano)
        );
    }

    #[test]
    fn test_normalize_strings_and_records() {
        let names = normalize_value(&json!(["A", "B"])).unwrap();
        assert_eq!(names, features(&["A", "B"]));

        let records = normalize_value(&json!([
            {"feature": "A", "score": 1.5},
            {"feature": "B", "category": "must"}
        ]))
        .unwrap();
        assert_eq!(records, features(&["A", "B"]));

        assert!(normalize_value(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_normalize_rejects_other_shapes() {
        let cases = [
            (json!({"feature": "A"}), 0),
            (json!("A"), 0),
            (json!([1, 2]), 0),
            (json!([{"name": "A"}]), 0),
            (json!(["A", {"feature": "B"}]), 1),
            (json!([{"feature": "A"}, "B"]), 1),
            (json!([{"feature": "A"}, {"feature": 7}]), 1),
        ];

        for (value, expected) in cases {
            match normalize_value(&value) {
                Err(EngineError::InvalidInputShape { position, .. }) => {
                    assert_eq!(position, expected, "input {value}")
                }
                other => panic!("expected InvalidInputShape for {value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_generate_value() {
        let generator = RoadmapGenerator::default();
        let roadmap = generator
            .generate_value(&json!(["Fix onboarding crash"]), Framework::Kano)
            .unwrap();
        assert_eq!(phase_names(&roadmap, 0), vec!["Fix onboarding crash"]);

        assert!(generator
            .generate_value(&json!(null), Framework::Kano)
            .is_err());
    }

    #[test]
    fn test_rejects_invalid_tables() {
        let mut tables = RoadmapTables::default();
        tables.templates.retain(|t| t.framework != Framework::Kano);
        assert!(matches!(
            RoadmapGenerator::new(tables),
            Err(EngineError::InvalidPolicy(_))
        ));
    }
}
