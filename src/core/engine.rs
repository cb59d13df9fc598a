//! Questionnaire engine: owns one session's state
//!
//! answer → weight update → confidence → convergence → persist → next question
//!
//! The in-memory state is authoritative. Store failures are logged and the
//! session carries on; generator failures are returned and can be retried
//! with `advance()` without touching recorded answers.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::{progress, summarize, ConvergenceChecker, QuestionGenerator, StateStore};
use crate::error::{GeneratorError, QuestionnaireError};
use crate::types::{NextQuestion, ProfileSummary, Progress, Question, QuestionnaireState, StepOutput};

pub struct QuestionnaireEngine {
    state: QuestionnaireState,
    /// Question currently shown to the user
    pending: Option<Question>,
    checker: ConvergenceChecker,
    generator: Arc<dyn QuestionGenerator>,
    store: Box<dyn StateStore>,
}

impl QuestionnaireEngine {
    /// Engine with a fresh state. Call `start()` to restore and fetch a question.
    pub fn new(
        generator: Arc<dyn QuestionGenerator>,
        store: Box<dyn StateStore>,
        checker: ConvergenceChecker,
    ) -> Self {
        Self {
            state: QuestionnaireState::new(),
            pending: None,
            checker,
            generator,
            store,
        }
    }

    /// Restore saved state if there is any. Returns true when restored.
    pub fn restore(&mut self) -> bool {
        match self.store.load() {
            Ok(Some(state)) if !state.is_consistent() => {
                warn!(
                    answers = state.answers.len(),
                    question_number = state.question_number,
                    "saved questionnaire is inconsistent, starting fresh"
                );
                false
            }
            Ok(Some(state)) => {
                info!(
                    answered = state.question_number,
                    converged = state.converged_dimensions.len(),
                    "restored questionnaire"
                );
                self.state = state;
                self.pending = None;
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("failed to load saved questionnaire, starting fresh: {}", e);
                false
            }
        }
    }

    /// Restore, then fetch the first (or next) question
    pub fn start(&mut self) -> Result<NextQuestion, QuestionnaireError> {
        self.restore();
        self.advance()
    }

    /// Ask the generator for the next question.
    ///
    /// Safe to call again after a generator error.
    pub fn advance(&mut self) -> Result<NextQuestion, QuestionnaireError> {
        if self.state.is_complete() {
            self.pending = None;
            return Ok(NextQuestion::Complete);
        }

        let next = self
            .generator
            .next_question(&self.state, self.state.answers.last())
            .inspect_err(|e| warn!("question generator failed: {}", e))?;

        match &next {
            NextQuestion::Ask(question) => {
                if question.options.is_empty() {
                    return Err(GeneratorError::InvalidQuestion(format!(
                        "question {} has no options",
                        question.id
                    ))
                    .into());
                }
                debug!(id = %question.id, stage = %self.state.stage, "next question");
                self.pending = Some(question.clone());
            }
            NextQuestion::Complete => {
                self.pending = None;
                self.state.mark_complete();
                self.persist();
                info!(answered = self.state.question_number, "questionnaire complete");
            }
        }

        Ok(next)
    }

    /// Answer the pending question with the option at `option_index`
    pub fn answer(&mut self, option_index: usize) -> Result<StepOutput, QuestionnaireError> {
        if self.state.is_complete() {
            return Err(QuestionnaireError::AlreadyComplete);
        }
        let question = self
            .pending
            .as_ref()
            .ok_or(QuestionnaireError::NoPendingQuestion)?;
        let option = question
            .options
            .get(option_index)
            .ok_or(QuestionnaireError::OptionOutOfRange {
                index: option_index,
                len: question.options.len(),
            })?;

        let newly = self.state.record_answer(
            &question.prompt,
            option_index,
            &option.weights,
            &self.checker,
        );
        self.pending = None;
        debug!(
            question = self.state.question_number,
            newly_converged = newly.len(),
            "answer recorded"
        );
        self.persist();

        let mut output = StepOutput::new(
            self.state.question_number,
            self.state.stage,
            self.state.confidence_scores.clone(),
            &newly,
            self.state.converged_dimensions.len(),
        );

        match self.advance()? {
            NextQuestion::Ask(question) => output.next_question = Some(question),
            NextQuestion::Complete => output.complete = true,
        }

        Ok(output)
    }

    /// Explicit restart: drop all answers and the saved copy
    pub fn reset(&mut self) {
        self.state.reset();
        self.pending = None;
        if let Err(e) = self.store.clear() {
            warn!("failed to clear saved questionnaire: {}", e);
        }
        info!("questionnaire reset");
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.state) {
            warn!("failed to persist questionnaire: {}", e);
        }
    }

    pub fn state(&self) -> &QuestionnaireState {
        &self.state
    }

    pub fn pending(&self) -> Option<&Question> {
        self.pending.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn summary(&self) -> ProfileSummary {
        summarize(&self.state.current_weights)
    }

    pub fn progress(&self) -> Progress {
        progress(&self.state)
    }
}

// =============================================================================
// TESTS
// =============================================================================
