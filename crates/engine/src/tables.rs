//! Keyword and policy tables
//!
//! Every heuristic constant the engine uses lives here as plain data: the
//! selector's aliases, bonuses and tie-break order, the strategies' keyword lists
//! and formula constants, and the roadmap's bucket rules and phase templates.
//! [`KeywordTables::default`] is the built-in policy. A partial TOML or JSON
//! document can override any subset of it, because every struct defaults the
//! fields it does not name.

use std::collections::{BTreeMap, HashSet};

use roadmap_core::{Bucket, Category, Framework};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{EngineError, Result};

/// Schema version of [`KeywordTables`].
pub const TABLES_VERSION: u32 = 1;

// ============================================
// Keywords
// ============================================

/// Lowercased keyword list matched as case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Keywords(Vec<String>);

impl Keywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// `text` must already be lowercased.
    pub fn any_in(&self, text: &str) -> bool {
        self.0.iter().any(|k| text.contains(k.as_str()))
    }

    /// `text` must already be lowercased. Empty lists never match.
    pub fn all_in(&self, text: &str) -> bool {
        !self.0.is_empty() && self.0.iter().all(|k| text.contains(k.as_str()))
    }

    /// Number of distinct keywords present in lowercased `text`.
    pub fn count_in(&self, text: &str) -> usize {
        self.0.iter().filter(|k| text.contains(k.as_str())).count()
    }

    /// Exact match against a whole lowercased token.
    pub fn contains_exact(&self, token: &str) -> bool {
        self.0.iter().any(|k| k == token)
    }
}

impl From<Vec<String>> for Keywords {
    fn from(keywords: Vec<String>) -> Self {
        Self::new(keywords)
    }
}

impl From<Keywords> for Vec<String> {
    fn from(keywords: Keywords) -> Self {
        keywords.0
    }
}

// ============================================
// Root
// ============================================

/// The complete, versioned policy the engine is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTables {
    pub version: u32,
    pub selector: SelectorPolicy,
    pub scoring: ScoringTables,
    pub roadmap: RoadmapTables,
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            version: TABLES_VERSION,
            selector: SelectorPolicy::default(),
            scoring: ScoringTables::default(),
            roadmap: RoadmapTables::default(),
        }
    }
}

impl KeywordTables {
    /// Reject tables that would break selection or the roadmap partition.
    pub fn validate(&self) -> Result<()> {
        if self.version != TABLES_VERSION {
            return Err(EngineError::invalid_policy(format!(
                "unsupported tables version {} (expected {})",
                self.version, TABLES_VERSION
            )));
        }
        self.selector.validate()?;
        self.scoring.validate()?;
        self.roadmap.validate()
    }
}

// ============================================
// Selector policy
// ============================================

/// Base bonus granted when the normalized problem type is listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBonus {
    pub framework: Framework,
    pub points: u32,
    pub problem_types: Keywords,
}

/// Keyword signal in the problem summary.
///
/// Fires when any `any_of` keyword is present, or when every `all_of` keyword is
/// present together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub framework: Framework,
    pub points: u32,
    #[serde(default)]
    pub any_of: Keywords,
    #[serde(default)]
    pub all_of: Keywords,
}

impl Indicator {
    pub fn fires(&self, text: &str) -> bool {
        self.any_of.any_in(text) || self.all_of.all_in(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorPolicy {
    /// Problem type synonyms, e.g. `churn -> retention`. Both sides are
    /// lowercased on load.
    #[serde(deserialize_with = "fold_aliases")]
    pub aliases: BTreeMap<String, String>,
    pub type_bonuses: Vec<TypeBonus>,
    pub indicators: Vec<Indicator>,
    /// Highest priority first. Must list every framework exactly once.
    pub tie_break: Vec<Framework>,
    /// Returned when no signal scores at all.
    pub default_framework: Framework,
}

impl SelectorPolicy {
    /// Lowercase, trim and resolve aliases.
    pub fn canonical_problem_type(&self, problem_type: &str) -> String {
        let normalized = problem_type.trim().to_lowercase();
        match self.aliases.get(&normalized) {
            Some(canonical) => canonical.trim().to_lowercase(),
            None => normalized,
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(silent) = self
            .indicators
            .iter()
            .find(|i| i.any_of.is_empty() && i.all_of.is_empty())
        {
            return Err(EngineError::invalid_policy(format!(
                "{} indicator has no keywords",
                silent.framework
            )));
        }

        let unique: HashSet<_> = self.tie_break.iter().collect();
        if self.tie_break.len() != Framework::ALL.len() || unique.len() != Framework::ALL.len() {
            return Err(EngineError::invalid_policy(
                "tie_break must list every framework exactly once",
            ));
        }
        Ok(())
    }
}

fn fold_aliases<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(from, to)| (from.trim().to_lowercase(), to.trim().to_lowercase()))
        .collect())
}

impl Default for SelectorPolicy {
    fn default() -> Self {
        let aliases = [
            ("activation", "onboarding"),
            ("activation / onboarding", "onboarding"),
            ("churn", "retention"),
            ("retention / churn", "retention"),
            ("latency", "performance"),
            ("reliability", "performance"),
            ("performance / reliability", "performance"),
            ("monetization", "growth"),
            ("monetization / growth", "growth"),
            ("value clarity", "satisfaction"),
            ("scope", "delivery"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        Self {
            aliases,
            type_bonuses: vec![
                TypeBonus {
                    framework: Framework::Ice,
                    points: 3,
                    problem_types: Keywords::new(["performance", "speed", "optimization"]),
                },
                TypeBonus {
                    framework: Framework::Kano,
                    points: 3,
                    problem_types: Keywords::new(["onboarding", "retention", "satisfaction"]),
                },
                TypeBonus {
                    framework: Framework::Moscow,
                    points: 3,
                    problem_types: Keywords::new(["delivery", "timeline", "deadline"]),
                },
                TypeBonus {
                    framework: Framework::Rice,
                    points: 2,
                    problem_types: Keywords::new(["growth", "acquisition", "revenue"]),
                },
            ],
            indicators: vec![
                Indicator {
                    framework: Framework::Ice,
                    points: 2,
                    any_of: Keywords::new([
                        "experiment",
                        "test",
                        "mvp",
                        "hypothesis",
                        "validation",
                        "assumption",
                        "uncertain",
                    ]),
                    all_of: Keywords::default(),
                },
                Indicator {
                    framework: Framework::Kano,
                    points: 2,
                    any_of: Keywords::new([
                        "delight",
                        "frustration",
                        "user satisfaction",
                        "expectation",
                        "pain point",
                        "complaint",
                    ]),
                    all_of: Keywords::default(),
                },
                Indicator {
                    framework: Framework::Moscow,
                    points: 2,
                    any_of: Keywords::new([
                        "must have",
                        "should have",
                        "could have",
                        "deadline",
                        "sprint",
                        "release",
                        "timebox",
                    ]),
                    all_of: Keywords::default(),
                },
                // RICE only wins on an explicit comparison.
                Indicator {
                    framework: Framework::Rice,
                    points: 3,
                    any_of: Keywords::new([
                        "compare",
                        "trade-off",
                        "decide between",
                        "rank",
                        "prioritize between",
                    ]),
                    all_of: Keywords::new(["impact", "effort"]),
                },
                Indicator {
                    framework: Framework::Rice,
                    points: 1,
                    any_of: Keywords::new(["prioritiz"]),
                    all_of: Keywords::default(),
                },
                Indicator {
                    framework: Framework::Ice,
                    points: 1,
                    any_of: Keywords::new(["prioritiz"]),
                    all_of: Keywords::default(),
                },
            ],
            tie_break: vec![
                Framework::Ice,
                Framework::Kano,
                Framework::Rice,
                Framework::Moscow,
            ],
            default_framework: Framework::Rice,
        }
    }
}

// ============================================
// Scoring tables
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiceTable {
    pub impact_keywords: Keywords,
    pub confidence: f64,
    /// Characters per unit of effort.
    pub chars_per_effort: u32,
}

impl Default for RiceTable {
    fn default() -> Self {
        Self {
            impact_keywords: Keywords::new(["improve", "optimize", "fix", "reduce", "enhance"]),
            confidence: 0.7,
            chars_per_effort: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IceTable {
    pub impact_keywords: Keywords,
    pub confidence: f64,
    /// Ease of the shortest features.
    pub ease_ceiling: u32,
    /// Characters per step of lost ease.
    pub chars_per_ease_step: u32,
}

impl Default for IceTable {
    fn default() -> Self {
        Self {
            impact_keywords: Keywords::new([
                "improve", "optimize", "fix", "reduce", "increase", "add",
            ]),
            confidence: 0.6,
            ease_ceiling: 5,
            chars_per_ease_step: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub score: f64,
    #[serde(default)]
    pub keywords: Keywords,
}

/// First-match category rules with a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub rules: Vec<CategoryRule>,
    pub fallback: CategoryRule,
}

impl CategoryTable {
    /// `text` must already be lowercased.
    pub fn classify(&self, text: &str) -> &CategoryRule {
        self.rules
            .iter()
            .find(|rule| rule.keywords.any_in(text))
            .unwrap_or(&self.fallback)
    }

    fn validate(&self, framework: Framework) -> Result<()> {
        let foreign = self
            .rules
            .iter()
            .chain(std::iter::once(&self.fallback))
            .find(|rule| rule.category.framework() != framework);
        match foreign {
            Some(rule) => Err(EngineError::invalid_policy(format!(
                "category {} does not belong to {}",
                rule.category.as_str(),
                framework
            ))),
            None => Ok(()),
        }
    }

    /// Built-in MoSCoW rules.
    pub fn moscow() -> Self {
        Self {
            rules: vec![
                CategoryRule {
                    category: Category::Must,
                    score: 100.0,
                    keywords: Keywords::new(["fix", "critical", "blocker", "reliabil"]),
                },
                CategoryRule {
                    category: Category::Should,
                    score: 75.0,
                    keywords: Keywords::new(["improve", "enhance", "optimize"]),
                },
            ],
            fallback: CategoryRule {
                category: Category::Could,
                score: 50.0,
                keywords: Keywords::default(),
            },
        }
    }

    /// Built-in Kano rules.
    pub fn kano() -> Self {
        Self {
            rules: vec![
                CategoryRule {
                    category: Category::Basic,
                    score: 80.0,
                    keywords: Keywords::new(["fix", "error", "crash", "reliabil"]),
                },
                CategoryRule {
                    category: Category::Performance,
                    score: 60.0,
                    keywords: Keywords::new(["optimize", "performance", "speed", "latency"]),
                },
            ],
            fallback: CategoryRule {
                category: Category::Delighter,
                score: 40.0,
                keywords: Keywords::default(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTables {
    pub rice: RiceTable,
    pub ice: IceTable,
    pub moscow: CategoryTable,
    pub kano: CategoryTable,
}

impl Default for ScoringTables {
    fn default() -> Self {
        Self {
            rice: RiceTable::default(),
            ice: IceTable::default(),
            moscow: CategoryTable::moscow(),
            kano: CategoryTable::kano(),
        }
    }
}

impl ScoringTables {
    fn validate(&self) -> Result<()> {
        for (name, confidence) in [("rice", self.rice.confidence), ("ice", self.ice.confidence)] {
            if !(confidence > 0.0 && confidence <= 1.0) {
                return Err(EngineError::invalid_policy(format!(
                    "{name} confidence must be in (0, 1], got {confidence}"
                )));
            }
        }
        if self.rice.chars_per_effort == 0 || self.ice.chars_per_ease_step == 0 {
            return Err(EngineError::invalid_policy(
                "character divisors must be positive",
            ));
        }
        if self.ice.ease_ceiling == 0 {
            return Err(EngineError::invalid_policy("ease_ceiling must be at least 1"));
        }
        self.moscow.validate(Framework::Moscow)?;
        self.kano.validate(Framework::Kano)
    }
}

// ============================================
// Roadmap tables
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRule {
    pub bucket: Bucket,
    pub keywords: Keywords,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTemplate {
    pub label: String,
    /// Contributing buckets, concatenated in this order.
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapTemplate {
    pub framework: Framework,
    pub phases: Vec<PhaseTemplate>,
}

impl RoadmapTemplate {
    fn new(framework: Framework, phases: [(&str, Vec<Bucket>); 2]) -> Self {
        Self {
            framework,
            phases: phases
                .into_iter()
                .map(|(label, buckets)| PhaseTemplate {
                    label: label.to_string(),
                    buckets,
                })
                .collect(),
        }
    }

    /// Buckets some phase of this template draws from.
    pub fn uses(&self, bucket: Bucket) -> bool {
        self.phases.iter().any(|p| p.buckets.contains(&bucket))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadmapTables {
    /// First match wins. Expansion is the implicit default.
    pub buckets: Vec<BucketRule>,
    pub templates: Vec<RoadmapTemplate>,
}

impl RoadmapTables {
    pub fn template(&self, framework: Framework) -> Option<&RoadmapTemplate> {
        self.templates.iter().find(|t| t.framework == framework)
    }

    /// Every framework needs a template of two distinctly labelled phases that
    /// uses each bucket at most once and includes the Expansion sink.
    pub fn validate(&self) -> Result<()> {
        for framework in Framework::ALL {
            let template = self.template(framework).ok_or_else(|| {
                EngineError::invalid_policy(format!("no roadmap template for {framework}"))
            })?;

            if template.phases.len() != 2 {
                return Err(EngineError::invalid_policy(format!(
                    "{framework} template needs exactly two phases, got {}",
                    template.phases.len()
                )));
            }
            // Labels key the serialized roadmap, so a repeat would drop a phase.
            let mut labels = HashSet::new();
            for phase in &template.phases {
                if !labels.insert(phase.label.trim()) {
                    return Err(EngineError::invalid_policy(format!(
                        "{framework} template repeats phase label '{}'",
                        phase.label
                    )));
                }
            }

            let mut seen = HashSet::new();
            for bucket in template.phases.iter().flat_map(|p| p.buckets.iter()) {
                if !seen.insert(*bucket) {
                    return Err(EngineError::invalid_policy(format!(
                        "{framework} template uses bucket {} twice",
                        bucket.as_str()
                    )));
                }
            }
            if !template.uses(Bucket::Expansion) {
                return Err(EngineError::invalid_policy(format!(
                    "{framework} template has no expansion phase"
                )));
            }
        }
        Ok(())
    }
}

impl Default for RoadmapTables {
    fn default() -> Self {
        use Bucket::*;

        Self {
            buckets: vec![
                BucketRule {
                    bucket: Foundation,
                    keywords: Keywords::new([
                        "onboarding",
                        "activation",
                        "crash",
                        "performance",
                        "startup",
                        "stability",
                        "reliability",
                        "value",
                        "bug",
                    ]),
                },
                BucketRule {
                    bucket: Enablement,
                    keywords: Keywords::new([
                        "guidance",
                        "nudge",
                        "progress",
                        "engagement",
                        "clarify",
                        "education",
                        "tooltip",
                        "feedback",
                        "analytics",
                        "telemetry",
                        "tracking",
                        "monitoring",
                        "metrics",
                    ]),
                },
                BucketRule {
                    bucket: Experimentation,
                    keywords: Keywords::new([
                        "experiment",
                        "test",
                        "pilot",
                        "mvp",
                        "hypothesis",
                        "trial",
                        "validate",
                    ]),
                },
            ],
            templates: vec![
                RoadmapTemplate::new(
                    Framework::Rice,
                    [
                        ("Q1 (0–3 months) — Highest Impact First", vec![Foundation, Enablement]),
                        ("Q2 (3–6 months) — Compound Impact", vec![Expansion]),
                    ],
                ),
                RoadmapTemplate::new(
                    Framework::Ice,
                    [
                        (
                            "Q1 (0–3 months) — Learn & Validate",
                            vec![Experimentation, Enablement, Foundation],
                        ),
                        ("Q2 (3–6 months) — Scale What Works", vec![Expansion]),
                    ],
                ),
                RoadmapTemplate::new(
                    Framework::Kano,
                    [
                        ("Q1 (0–3 months) — Fix Basics", vec![Foundation, Enablement]),
                        ("Q2 (3–6 months) — Delight & Differentiate", vec![Expansion]),
                    ],
                ),
                RoadmapTemplate::new(
                    Framework::Moscow,
                    [
                        ("Q1 (0–3 months) — Deliver Must-Haves", vec![Foundation]),
                        ("Q2 (3–6 months) — Expand Scope", vec![Enablement, Expansion]),
                    ],
                ),
            ],
        }
    }
}

// ============================================
// Tests
// ============================================
