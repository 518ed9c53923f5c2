//! End-to-end analysis: select, score, schedule.

use roadmap_core::{ranked, Feature, Framework, Roadmap, ScoredFeature};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::explain::Narrator;
use crate::resolver::StrategyResolver;
use crate::roadmap::RoadmapGenerator;
use crate::selector::{FrameworkSelection, FrameworkSelector};
use crate::tables::KeywordTables;

/// One problem to analyse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub problem_type: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Skip selection and use this framework token instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_override: Option<String>,
}

impl AnalysisRequest {
    pub fn new(problem_type: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            problem_type: problem_type.into(),
            summary: summary.into(),
            ..Default::default()
        }
    }

    pub fn with_features<I, F>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Feature>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework_override = Some(framework.into());
        self
    }
}

/// Full result of one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub problem_type: String,
    pub summary: String,
    pub framework: Framework,
    /// Absent when the caller overrode the framework.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<FrameworkSelection>,
    /// True when an override token was not recognized and RICE was used.
    pub fell_back: bool,
    pub explanation: String,
    pub scored_features: Vec<ScoredFeature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_feature: Option<Feature>,
    pub roadmap: Roadmap,
}

/// Selector, resolver and generator built from one set of tables.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct Engine {
    selector: FrameworkSelector,
    resolver: StrategyResolver,
    generator: RoadmapGenerator,
}

impl Engine {
    pub fn new(tables: KeywordTables) -> Result<Self> {
        tables.validate()?;
        Ok(Self {
            selector: FrameworkSelector::new(tables.selector),
            resolver: StrategyResolver::new(&tables.scoring),
            generator: RoadmapGenerator::new(tables.roadmap)?,
        })
    }

    pub fn selector(&self) -> &FrameworkSelector {
        &self.selector
    }

    pub fn resolver(&self) -> &StrategyResolver {
        &self.resolver
    }

    pub fn generator(&self) -> &RoadmapGenerator {
        &self.generator
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> Analysis {
        let (selection, token) = match &request.framework_override {
            Some(token) => (None, token.clone()),
            None => {
                let selection = self
                    .selector
                    .evaluate(&request.problem_type, &request.summary);
                let token = selection.framework.as_str().to_string();
                (Some(selection), token)
            }
        };

        let resolution = self.resolver.resolve(&token, &request.features);
        let roadmap = self
            .generator
            .generate(&resolution.scored_features, resolution.framework);
        let explanation = Narrator::explain_framework(resolution.framework, selection.as_ref());
        let top_feature = ranked(&resolution.scored_features)
            .into_iter()
            .next()
            .map(|s| s.feature);

        info!(
            framework = %resolution.framework,
            features = request.features.len(),
            fell_back = resolution.fell_back,
            "Analysis complete"
        );

        Analysis {
            problem_type: request.problem_type.clone(),
            summary: request.summary.clone(),
            framework: resolution.framework,
            selection,
            fell_back: resolution.fell_back,
            explanation,
            scored_features: resolution.scored_features,
            top_feature,
            roadmap,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(KeywordTables::default()).expect("built-in keyword tables are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_analyze_selects_and_schedules() {
        let engine = Engine::default();
        let request = AnalysisRequest::new("performance", "latency issue")
            .with_features(["Optimize startup performance", "Add referral loop"]);

        let analysis = engine.analyze(&request);

        assert_eq!(analysis.framework, Framework::Ice);
        assert!(analysis.selection.is_some());
        assert!(!analysis.fell_back);
        assert_eq!(analysis.scored_features.len(), 2);
        assert_eq!(analysis.roadmap.len(), 2);
        assert_eq!(
            analysis.top_feature,
            Some(Feature::from("Optimize startup performance"))
        );
    }

    #[test]
    fn test_override_skips_selection() {
        let engine = Engine::default();
        let request = AnalysisRequest::new("performance", "latency issue")
            .with_features(["Fix onboarding crash"])
            .with_framework("moscow");

        let analysis = engine.analyze(&request);

        assert_eq!(analysis.framework, Framework::Moscow);
        assert!(analysis.selection.is_none());
        assert!(analysis.explanation.contains("chosen explicitly"));
    }

    #[test]
    fn test_bogus_override_is_observable() {
        let engine = Engine::default();
        let request = AnalysisRequest::new("", "")
            .with_features(["Team spaces"])
            .with_framework("WSJF");

        let analysis = engine.analyze(&request);

        assert!(analysis.fell_back);
        assert_eq!(analysis.framework, Framework::Rice);
    }

    #[test]
    fn test_empty_features() {
        let analysis = Engine::default().analyze(&AnalysisRequest::new("growth", ""));
        assert!(analysis.scored_features.is_empty());
        assert!(analysis.top_feature.is_none());
        assert_eq!(analysis.roadmap.phases.len(), 2);
        assert!(analysis.roadmap.is_empty());
    }

    #[test]
    fn test_invalid_tables_are_rejected() {
        let mut tables = KeywordTables::default();
        tables.selector.tie_break.clear();
        assert!(Engine::new(tables).is_err());
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"summary": "compare options", "features": ["A"]}"#).unwrap();
        assert_eq!(request.problem_type, "");
        assert_eq!(request.features, vec![Feature::from("A")]);
        assert!(request.framework_override.is_none());
    }
}
