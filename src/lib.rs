//! Aptitude: adaptive personality and interest questionnaire engine
//!
//! Answer → weight update → confidence → convergence → next question

pub mod config;
pub mod core;
pub mod error;
pub mod types;

// =============================================================================
// CONVERGENCE [C]
// =============================================================================

/// Confidence a dimension must reach before it counts as decided
pub const CONVERGENCE_THRESHOLD: f64 = 0.6;

/// Minimum accumulated weight before any dimension may converge.
/// MBTI: sum of the pair. Holland: sum of all six letters.
pub const MIN_OBSERVED_WEIGHT: f64 = 5.0;

// =============================================================================
// STAGES [C]
// =============================================================================

/// Last question number that still counts as behavior stage
pub const BEHAVIOR_STAGE_LAST: u32 = 3;

/// Upper bound on questions asked by the built-in bank
pub const DEFAULT_MAX_QUESTIONS: u32 = 20;

/// Number of dimensions tracked (4 MBTI axes + 6 Holland letters)
pub const TOTAL_DIMENSIONS: usize = 10;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
