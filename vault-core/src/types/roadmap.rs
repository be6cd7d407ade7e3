//! Roadmap domain types

use serde::{Deserialize, Serialize};

/// Minimum estimated hours for a single roadmap step
pub const MIN_STEP_HOURS: f64 = 0.5;
/// Maximum estimated hours for a single roadmap step
pub const MAX_STEP_HOURS: f64 = 100.0;

/// What a roadmap prepares the reader for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadmapKind {
    Midsem,
    Endsem,
    Practical,
    General,
}

/// Self-assessed difficulty of a roadmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}
