//! Prioritization and roadmap synthesis engine.
//!
//! Turns a problem (type + summary) and a list of candidate features into a
//! scored, phased roadmap:
//!
//! 1. [`FrameworkSelector`] picks RICE, ICE, MoSCoW or Kano from keyword signals.
//! 2. [`StrategyResolver`] scores each feature with that framework's strategy.
//! 3. [`RoadmapGenerator`] buckets the features and lays them over two phases.
//!
//! [`Engine`] wires the three together. Every heuristic is data in
//! [`KeywordTables`], so policies can be retuned without code changes. All
//! operations are synchronous, deterministic and free of shared mutable state.

pub mod error;
pub mod explain;
pub mod pipeline;
pub mod resolver;
pub mod roadmap;
pub mod selector;
pub mod strategies;
pub mod tables;

pub use error::{EngineError, Result};
pub use explain::{comparison, profile, FrameworkProfile, Narrator};
pub use pipeline::{Analysis, AnalysisRequest, Engine};
pub use resolver::{Resolution, StrategyResolver};
pub use roadmap::{normalize_value, RoadmapGenerator, RoadmapInput};
pub use selector::{Decision, FrameworkSelection, FrameworkSelector};
pub use strategies::{
    IceStrategy, KanoStrategy, MoscowStrategy, PrioritizationStrategy, RiceStrategy, Strategy,
};
pub use tables::{KeywordTables, TABLES_VERSION};
