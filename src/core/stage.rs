//! Stage/progress policy
//!
//! Threshold ladder over the answered-question count:
//! - 0      → ICEBREAKER
//! - 1..=3  → BEHAVIOR
//! - 4+     → SITUATION

use crate::types::{Progress, QuestionnaireState, Stage};
use crate::{BEHAVIOR_STAGE_LAST, TOTAL_DIMENSIONS};

pub fn stage_for(question_number: u32) -> Stage {
    match question_number {
        0 => Stage::Icebreaker,
        n if n <= BEHAVIOR_STAGE_LAST => Stage::Behavior,
        _ => Stage::Situation,
    }
}

pub fn progress(state: &QuestionnaireState) -> Progress {
    Progress {
        answered: state.question_number,
        converged: state.converged_dimensions.len(),
        total_dimensions: TOTAL_DIMENSIONS,
        complete: state.is_complete(),
    }
}
