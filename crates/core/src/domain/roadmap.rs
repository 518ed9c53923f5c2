use serde::ser::{Serialize, SerializeMap, Serializer};

use super::feature::Feature;

// ============================================
// Enums
// ============================================

/// Dependency bucket a feature is sequenced by.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Stability, activation and core value
    Foundation,
    /// Guidance, engagement and instrumentation
    Enablement,
    /// Experiments and pilots
    Experimentation,
    /// Everything else
    Expansion,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Enablement => "enablement",
            Self::Experimentation => "experimentation",
            Self::Expansion => "expansion",
        }
    }
}

// ============================================
// Structs
// ============================================

/// A named time window holding an ordered list of features.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct RoadmapPhase {
    pub label: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl RoadmapPhase {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            features: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Ordered phases of a roadmap.
///
/// Serializes as a JSON object mapping each phase label to its features, in
/// phase order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roadmap {
    pub phases: Vec<RoadmapPhase>,
}

impl Roadmap {
    pub fn new(phases: Vec<RoadmapPhase>) -> Self {
        Self { phases }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.phases.iter().map(|p| p.label.as_str())
    }

    /// All scheduled features, phase by phase.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.phases.iter().flat_map(|p| p.features.iter())
    }

    /// Total number of scheduled features.
    pub fn len(&self) -> usize {
        self.phases.iter().map(RoadmapPhase::len).sum()
    }

    /// True when no phase holds a feature. Phases themselves may still exist.
    pub fn is_empty(&self) -> bool {
        self.phases.iter().all(RoadmapPhase::is_empty)
    }
}

impl Serialize for Roadmap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.phases.len()))?;
        for phase in &self.phases {
            map.serialize_entry(&phase.label, &phase.features)?;
        }
        map.end()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Roadmap {
        Roadmap::new(vec![
            RoadmapPhase {
                label: "Q1".to_string(),
                features: vec![Feature::from("Fix crash"), Feature::from("Add tooltip")],
            },
            RoadmapPhase {
                label: "Q2".to_string(),
                features: vec![Feature::from("Referral loop")],
            },
        ])
    }

    #[test]
    fn test_bucket_tokens() {
        assert_eq!(Bucket::Experimentation.as_str(), "experimentation");
        let json = serde_json::to_string(&Bucket::Foundation).unwrap();
        assert_eq!(json, "\"foundation\"");
    }

    #[test]
    fn test_roadmap_accessors() {
        let roadmap = sample();
        assert_eq!(roadmap.len(), 3);
        assert!(!roadmap.is_empty());
        assert_eq!(roadmap.labels().collect::<Vec<_>>(), vec!["Q1", "Q2"]);
        assert_eq!(roadmap.phases[1].len(), 1);
    }

    #[test]
    fn test_empty_phases_are_empty_roadmap() {
        let roadmap = Roadmap::new(vec![RoadmapPhase::new("Q1"), RoadmapPhase::new("Q2")]);
        assert!(roadmap.is_empty());
        assert_eq!(roadmap.phases.len(), 2);
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"Q1":["Fix crash","Add tooltip"],"Q2":["Referral loop"]}"#
        );
    }
}
