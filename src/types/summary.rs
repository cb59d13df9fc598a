//! Result types shown when the questionnaire is done

use serde::{Deserialize, Serialize};

use crate::types::{HollandCode, MbtiAxis, MbtiLetter};

/// Which side of an axis won, and by how much
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisBreakdown {
    pub axis: MbtiAxis,
    pub winner: MbtiLetter,
    /// Winner's share of the pair total, 0-100. 50 when nothing observed.
    pub percent: f64,
}

/// A recommended department with a match score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    /// 0-100
    pub match_percent: u8,
}

/// Final human-readable profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    /// Four-letter MBTI code, e.g. "INTJ"
    pub mbti: String,
    /// Top-three Holland code, e.g. "IAR"
    pub holland: String,
    /// Dominant Holland type
    pub dominant_interest: HollandCode,
    pub axes: Vec<AxisBreakdown>,
    pub recommendations: Vec<Recommendation>,
}

impl ProfileSummary {
    pub fn headline(&self) -> String {
        format!(
            "{} | {} ({})",
            self.mbti,
            self.holland,
            self.dominant_interest.name()
        )
    }
}

/// Dashboard progress card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: u32,
    pub converged: usize,
    pub total_dimensions: usize,
    pub complete: bool,
}

impl Progress {
    /// Converged share of all dimensions, 0-100
    pub fn percent(&self) -> f64 {
        if self.total_dimensions == 0 {
            return 0.0;
        }
        self.converged as f64 / self.total_dimensions as f64 * 100.0
    }
}
