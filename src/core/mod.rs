//! Core modules for Aptitude

pub mod updater;
pub mod confidence;
pub mod convergence;
pub mod stage;
pub mod summary;
pub mod store;
pub mod generator;
pub mod engine;
pub mod api;

pub use updater::update;
pub use confidence::{confidence, axis_confidence, holland_confidence, dimension_confidence, all_confidences};
pub use convergence::ConvergenceChecker;
pub use stage::{stage_for, progress};
pub use summary::{summarize, mbti_code, holland_code, holland_ranking, recommend_departments};
pub use store::{StateStore, JsonFileStore, MemoryStore};
pub use generator::{QuestionGenerator, QuestionBank};
pub use engine::QuestionnaireEngine;
pub use api::{create_router, run_server};
