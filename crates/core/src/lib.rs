//! Domain types for the prioritization and roadmap engine.
//!
//! Everything here is plain data: features, frameworks, scored results and
//! phased roadmaps. Scoring and bucketing live in the `prioritizer` crate.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::{CoreError, Result};
