//! Questionnaire session state

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{all_confidences, stage_for, update, ConvergenceChecker};
use crate::types::{AnswerRecord, Dimension, HollandCode, MbtiAxis, PartialWeights, PersonalityWeights};
use crate::TOTAL_DIMENSIONS;

/// Coarse phase of the questionnaire, derived from the question count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// First question
    #[default]
    Icebreaker,
    /// Everyday behavior questions
    Behavior,
    /// Hypothetical situations
    Situation,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Icebreaker => "ICEBREAKER",
            Stage::Behavior => "BEHAVIOR",
            Stage::Situation => "SITUATION",
        };
        write!(f, "{}", name)
    }
}

/// Dimensions considered decided
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergedDimensions {
    pub mbti: BTreeSet<MbtiAxis>,
    pub holland: BTreeSet<HollandCode>,
}

impl ConvergedDimensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::Mbti(axis) => self.mbti.insert(axis),
            Dimension::Holland(code) => self.holland.insert(code),
        }
    }

    pub fn contains(&self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::Mbti(axis) => self.mbti.contains(&axis),
            Dimension::Holland(code) => self.holland.contains(&code),
        }
    }

    /// Set union; neither side shrinks
    pub fn union(&self, other: &ConvergedDimensions) -> ConvergedDimensions {
        ConvergedDimensions {
            mbti: self.mbti.union(&other.mbti).copied().collect(),
            holland: self.holland.union(&other.holland).copied().collect(),
        }
    }

    /// Dimensions in `self` but not in `before`
    pub fn newly_added(&self, before: &ConvergedDimensions) -> Vec<Dimension> {
        self.iter().filter(|d| !before.contains(*d)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.mbti
            .iter()
            .map(|a| Dimension::Mbti(*a))
            .chain(self.holland.iter().map(|c| Dimension::Holland(*c)))
    }

    pub fn len(&self) -> usize {
        self.mbti.len() + self.holland.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every tracked dimension has converged
    pub fn is_full(&self) -> bool {
        self.len() == TOTAL_DIMENSIONS
    }
}

/// The single in-memory questionnaire owned by one session.
///
/// Persisted as camelCase JSON after every answer and restored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireState {
    pub current_weights: PersonalityWeights,
    pub stage: Stage,
    pub question_number: u32,
    pub answers: Vec<AnswerRecord>,
    pub converged_dimensions: ConvergedDimensions,
    /// Dimension label → last computed confidence
    pub confidence_scores: BTreeMap<String, f64>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for QuestionnaireState {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionnaireState {
    /// Fresh state with all-zero weights
    pub fn new() -> Self {
        Self {
            current_weights: PersonalityWeights::zero(),
            stage: Stage::Icebreaker,
            question_number: 0,
            answers: Vec::new(),
            converged_dimensions: ConvergedDimensions::new(),
            confidence_scores: BTreeMap::new(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Record one answer and refresh every derived field.
    ///
    /// Returns the dimensions that converged on this answer.
    pub fn record_answer(
        &mut self,
        question: &str,
        option_index: usize,
        delta: &PartialWeights,
        checker: &ConvergenceChecker,
    ) -> Vec<Dimension> {
        self.current_weights = update(&self.current_weights, delta);
        self.answers.push(AnswerRecord::new(question, option_index));
        self.question_number = self.answers.len() as u32;
        self.stage = stage_for(self.question_number);

        self.confidence_scores = all_confidences(&self.current_weights);
        let before = self.converged_dimensions.clone();
        self.converged_dimensions =
            checker.check_sticky(&self.current_weights, &self.confidence_scores, &before);

        self.converged_dimensions.newly_added(&before)
    }

    pub fn mark_complete(&mut self) {
        if self.completed_at.is_none() {
            self.completed_at = Some(Utc::now());
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Explicit restart: drop every answer and all accumulated evidence
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// `answers.len() == questionNumber`
    pub fn is_consistent(&self) -> bool {
        self.answers.len() == self.question_number as usize
    }
}
