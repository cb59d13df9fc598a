//! Core types for Aptitude

mod dimension;
mod output;
mod question;
mod state;
mod summary;
mod weights;

pub use dimension::{Dimension, Domain, MbtiAxis};
pub use output::StepOutput;
pub use question::{AnswerOption, AnswerRecord, NextQuestion, Question};
pub use state::{ConvergedDimensions, QuestionnaireState, Stage};
pub use summary::{AxisBreakdown, ProfileSummary, Progress, Recommendation};
pub use weights::{HollandCode, HollandWeights, MbtiLetter, MbtiWeights, PartialWeights, PersonalityWeights};

pub(crate) use weights::sanitize;
