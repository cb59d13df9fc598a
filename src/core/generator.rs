//! Question generation
//!
//! The production generator is an external LLM service; anything that can
//! look at the state and propose the next question implements
//! `QuestionGenerator`. `QuestionBank` is the built-in static version.

use std::path::Path;

use tracing::debug;

use crate::error::GeneratorError;
use crate::types::{
    AnswerOption, AnswerRecord, HollandCode as H, MbtiLetter as M, NextQuestion, PartialWeights,
    Question, QuestionnaireState,
};
use crate::DEFAULT_MAX_QUESTIONS;

/// Proposes the next question from the current state
pub trait QuestionGenerator: Send + Sync {
    /// Must not mutate anything the state depends on; failures are retryable
    fn next_question(
        &self,
        state: &QuestionnaireState,
        previous: Option<&AnswerRecord>,
    ) -> Result<NextQuestion, GeneratorError>;
}

/// Fixed list of questions asked in order, skipping ones that only target
/// already-converged dimensions
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    max_questions: u32,
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::default_bank()
    }
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>, max_questions: u32) -> Self {
        Self {
            questions,
            max_questions,
        }
    }

    pub fn with_max_questions(mut self, max_questions: u32) -> Self {
        self.max_questions = max_questions;
        self
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Parse a JSON array of questions
    pub fn from_json(json: &str) -> Result<Self, GeneratorError> {
        let questions: Vec<Question> = serde_json::from_str(json)
            .map_err(|e| GeneratorError::InvalidQuestion(e.to_string()))?;
        if let Some(bad) = questions.iter().find(|q| q.options.is_empty()) {
            return Err(GeneratorError::InvalidQuestion(format!(
                "question {} has no options",
                bad.id
            )));
        }
        Ok(Self::new(questions, DEFAULT_MAX_QUESTIONS))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GeneratorError> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            GeneratorError::Unavailable(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Starter bank covering every MBTI axis and Holland letter
    pub fn default_bank() -> Self {
        let w = PartialWeights::new;
        let questions = vec![
            question(
                "interest-activity",
                "Interests",
                "Which kind of activity do you enjoy most?",
                vec![
                    ("Solving complex problems and puzzles", w().with_holland(H::I, 2.0).with_mbti(M::T, 1.0)),
                    ("Talking and connecting with people", w().with_holland(H::S, 2.0).with_mbti(M::E, 1.0)),
                    ("Creating artwork", w().with_holland(H::A, 2.0).with_mbti(M::N, 1.0)),
                    ("Outdoor sports and adventure", w().with_holland(H::R, 2.0).with_mbti(M::S, 1.0)),
                ],
            ),
            question(
                "ability-strength",
                "Abilities",
                "What do you consider your strongest skill?",
                vec![
                    ("Logical thinking and analysis", w().with_holland(H::I, 2.0).with_mbti(M::T, 2.0)),
                    ("Expressing ideas and public speaking", w().with_holland(H::E, 2.0).with_mbti(M::E, 2.0)),
                    ("Coming up with creative ideas", w().with_holland(H::A, 2.0).with_mbti(M::N, 2.0)),
                    ("Working in a team", w().with_holland(H::S, 2.0).with_mbti(M::F, 2.0)),
                ],
            ),
            question(
                "approach-new",
                "Aptitude",
                "When facing something new, you usually...",
                vec![
                    ("Research it carefully before trying", w().with_holland(H::I, 1.0).with_mbti(M::J, 2.0).with_mbti(M::I, 1.0)),
                    ("Discuss it with others right away", w().with_holland(H::S, 1.0).with_mbti(M::E, 2.0)),
                    ("Explore it in an unconventional way", w().with_holland(H::A, 1.0).with_mbti(M::N, 2.0).with_mbti(M::P, 1.0)),
                    ("Learn by doing", w().with_holland(H::R, 1.0).with_mbti(M::S, 2.0).with_mbti(M::P, 1.0)),
                ],
            ),
            question(
                "career-environment",
                "Career",
                "Your ideal working environment is...",
                vec![
                    ("A quiet research lab", w().with_holland(H::I, 2.0).with_mbti(M::I, 2.0)),
                    ("A lively office", w().with_holland(H::E, 2.0).with_mbti(M::E, 2.0)),
                    ("A free-form studio", w().with_holland(H::A, 2.0).with_mbti(M::P, 2.0)),
                    ("A changing outdoor setting", w().with_holland(H::R, 2.0).with_mbti(M::S, 1.0).with_mbti(M::P, 1.0)),
                ],
            ),
            question(
                "values-priority",
                "Values",
                "What matters most to you?",
                vec![
                    ("Pursuing knowledge and truth", w().with_holland(H::I, 2.0).with_mbti(M::T, 1.0)),
                    ("Helping others grow", w().with_holland(H::S, 2.0).with_mbti(M::F, 2.0)),
                    ("Showing personal creativity", w().with_holland(H::A, 2.0).with_mbti(M::N, 1.0)),
                    ("Achieving concrete results", w().with_holland(H::E, 1.0).with_holland(H::C, 1.0).with_mbti(M::J, 2.0)),
                ],
            ),
            question(
                "situation-deadline",
                "Situations",
                "A group project is due in a week. You...",
                vec![
                    ("Draft a schedule and assign tasks on day one", w().with_mbti(M::J, 3.0).with_holland(H::C, 2.0)),
                    ("Start when inspiration hits and sprint at the end", w().with_mbti(M::P, 3.0).with_holland(H::A, 1.0)),
                    ("Rally the team and keep morale up", w().with_mbti(M::E, 2.0).with_holland(H::E, 2.0)),
                    ("Quietly take the hardest part yourself", w().with_mbti(M::I, 2.0).with_holland(H::R, 1.0)),
                ],
            ),
            question(
                "situation-advice",
                "Situations",
                "A friend asks for advice after a bad grade. You...",
                vec![
                    ("Walk through what went wrong step by step", w().with_mbti(M::T, 3.0).with_holland(H::I, 1.0)),
                    ("Listen first and reassure them", w().with_mbti(M::F, 3.0).with_holland(H::S, 2.0)),
                    ("Suggest a study plan with fixed checkpoints", w().with_mbti(M::J, 2.0).with_holland(H::C, 2.0)),
                    ("Propose a completely different approach", w().with_mbti(M::N, 2.0).with_holland(H::A, 1.0)),
                ],
            ),
            question(
                "interest-subject",
                "Interests",
                "Which class do you look forward to?",
                vec![
                    ("Physics or chemistry labs", w().with_holland(H::R, 2.0).with_holland(H::I, 1.0).with_mbti(M::S, 1.0)),
                    ("Literature or art", w().with_holland(H::A, 2.0).with_mbti(M::N, 1.0).with_mbti(M::F, 1.0)),
                    ("Economics or debate", w().with_holland(H::E, 2.0).with_mbti(M::T, 1.0)),
                    ("Statistics or bookkeeping", w().with_holland(H::C, 3.0).with_mbti(M::S, 1.0)),
                ],
            ),
            question(
                "behavior-gathering",
                "Behavior",
                "At a weekend gathering you...",
                vec![
                    ("Meet as many new people as possible", w().with_mbti(M::E, 3.0)),
                    ("Stay with a few close friends", w().with_mbti(M::I, 3.0)),
                    ("Help the host organize things", w().with_holland(H::S, 1.0).with_mbti(M::J, 1.0).with_mbti(M::E, 1.0)),
                    ("Leave early to recharge", w().with_mbti(M::I, 2.0).with_mbti(M::P, 1.0)),
                ],
            ),
            question(
                "behavior-instructions",
                "Behavior",
                "When reading instructions you prefer...",
                vec![
                    ("Concrete step-by-step details", w().with_mbti(M::S, 3.0).with_holland(H::C, 1.0)),
                    ("The big picture and the reasoning behind it", w().with_mbti(M::N, 3.0).with_holland(H::I, 1.0)),
                    ("A worked example to copy", w().with_mbti(M::S, 2.0).with_holland(H::R, 1.0)),
                    ("Skipping them and experimenting", w().with_mbti(M::N, 1.0).with_mbti(M::P, 2.0).with_holland(H::R, 1.0)),
                ],
            ),
            question(
                "situation-club",
                "Situations",
                "Your club is choosing its next project. You argue for...",
                vec![
                    ("The one with the clearest plan and budget", w().with_holland(H::C, 2.0).with_mbti(M::J, 2.0)),
                    ("The most ambitious one, and offer to lead it", w().with_holland(H::E, 3.0).with_mbti(M::E, 1.0)),
                    ("The one that serves the community most", w().with_holland(H::S, 3.0).with_mbti(M::F, 1.0)),
                    ("Building something hands-on", w().with_holland(H::R, 3.0).with_mbti(M::S, 1.0)),
                ],
            ),
            question(
                "situation-disagreement",
                "Situations",
                "Two classmates disagree. You...",
                vec![
                    ("Judge whose argument holds up", w().with_mbti(M::T, 3.0)),
                    ("Find a solution that keeps both happy", w().with_mbti(M::F, 3.0).with_holland(H::S, 1.0)),
                    ("Stay out of it", w().with_mbti(M::I, 2.0)),
                    ("Turn it into a debate everyone joins", w().with_mbti(M::E, 2.0).with_holland(H::E, 1.0)),
                ],
            ),
            question(
                "behavior-desk",
                "Behavior",
                "Your desk at home is usually...",
                vec![
                    ("Tidy, everything has its place", w().with_mbti(M::J, 3.0).with_holland(H::C, 2.0)),
                    ("Organized chaos only you understand", w().with_mbti(M::P, 3.0)),
                    ("Covered in sketches and unfinished projects", w().with_holland(H::A, 2.0).with_mbti(M::P, 1.0)),
                    ("Full of tools and gadgets", w().with_holland(H::R, 2.0).with_holland(H::I, 1.0)),
                ],
            ),
            question(
                "situation-free-afternoon",
                "Situations",
                "You have a free afternoon on campus. You...",
                vec![
                    ("Dig through the library archives", w().with_holland(H::I, 2.0).with_mbti(M::I, 1.0)),
                    ("Join a volunteer event", w().with_holland(H::S, 2.0).with_mbti(M::E, 1.0)),
                    ("Go to a gallery opening", w().with_holland(H::A, 2.0).with_mbti(M::N, 1.0)),
                    ("Help the student council with its budget", w().with_holland(H::C, 2.0).with_mbti(M::J, 1.0)),
                ],
            ),
        ];
        Self::new(questions, DEFAULT_MAX_QUESTIONS)
    }
}

fn question(id: &str, category: &str, prompt: &str, options: Vec<(&str, PartialWeights)>) -> Question {
    Question {
        id: id.to_string(),
        prompt: prompt.to_string(),
        category: category.to_string(),
        options: options
            .into_iter()
            .map(|(text, weights)| AnswerOption::new(text, weights))
            .collect(),
    }
}

impl QuestionGenerator for QuestionBank {
    fn next_question(
        &self,
        state: &QuestionnaireState,
        _previous: Option<&AnswerRecord>,
    ) -> Result<NextQuestion, GeneratorError> {
        if state.converged_dimensions.is_full() || state.question_number >= self.max_questions {
            return Ok(NextQuestion::Complete);
        }

        let next = self.questions.iter().find(|q| {
            let asked = state.answers.iter().any(|a| a.question == q.prompt);
            !asked
                && q
                    .targets()
                    .iter()
                    .any(|d| !state.converged_dimensions.contains(*d))
        });

        match next {
            Some(q) => {
                debug!(id = %q.id, "bank picked next question");
                Ok(NextQuestion::Ask(q.clone()))
            }
            None => Ok(NextQuestion::Complete),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConvergenceChecker;
    use crate::types::{Dimension, MbtiAxis};

    #[test]
    fn test_default_bank_covers_every_dimension() {
        let bank = QuestionBank::default_bank();
        let mut covered = std::collections::BTreeSet::new();
        for q in &bank.questions {
            assert_eq!(q.options.len(), 4, "{} should have four options", q.id);
            covered.extend(q.targets());
        }
        assert_eq!(covered.len(), crate::TOTAL_DIMENSIONS);
    }

    #[test]
    fn test_first_question_is_first_in_bank() {
        let bank = QuestionBank::default_bank();
        let next = bank.next_question(&QuestionnaireState::new(), None).unwrap();
        match next {
            NextQuestion::Ask(q) => assert_eq!(q.id, "interest-activity"),
            NextQuestion::Complete => panic!("expected a question"),
        }
    }

    #[test]
    fn test_skips_asked_questions() {
        let bank = QuestionBank::default_bank();
        let mut state = QuestionnaireState::new();
        let first = &bank.questions[0];
        state.record_answer(
            &first.prompt,
            0,
            &first.options[0].weights,
            &ConvergenceChecker::default(),
        );
        match bank.next_question(&state, state.answers.last()).unwrap() {
            NextQuestion::Ask(q) => assert_eq!(q.id, "ability-strength"),
            NextQuestion::Complete => panic!("expected a question"),
        }
    }

    #[test]
    fn test_skips_questions_on_converged_dimensions() {
        let only_ei = question(
            "ei",
            "",
            "Party?",
            vec![("yes", PartialWeights::new().with_mbti(M::E, 1.0))],
        );
        let tf = question(
            "tf",
            "",
            "Head or heart?",
            vec![("head", PartialWeights::new().with_mbti(M::T, 1.0))],
        );
        let bank = QuestionBank::new(vec![only_ei, tf], 10);
        let mut state = QuestionnaireState::new();
        state.converged_dimensions.insert(Dimension::Mbti(MbtiAxis::EI));

        match bank.next_question(&state, None).unwrap() {
            NextQuestion::Ask(q) => assert_eq!(q.id, "tf"),
            NextQuestion::Complete => panic!("expected a question"),
        }
    }

    #[test]
    fn test_complete_when_max_reached_or_exhausted() {
        let bank = QuestionBank::default_bank().with_max_questions(0);
        assert!(bank
            .next_question(&QuestionnaireState::new(), None)
            .unwrap()
            .is_complete());

        let empty = QuestionBank::new(Vec::new(), 10);
        assert!(empty
            .next_question(&QuestionnaireState::new(), None)
            .unwrap()
            .is_complete());
    }

    #[test]
    fn test_complete_when_everything_converged() {
        let bank = QuestionBank::default_bank();
        let mut state = QuestionnaireState::new();
        for d in Dimension::all() {
            state.converged_dimensions.insert(d);
        }
        assert!(bank.next_question(&state, None).unwrap().is_complete());
    }

    #[test]
    fn test_from_json_rejects_empty_options() {
        let err = QuestionBank::from_json(r#"[{"id": "x", "prompt": "?", "options": []}]"#);
        assert!(matches!(err, Err(GeneratorError::InvalidQuestion(_))));

        let ok = QuestionBank::from_json(
            r#"[{"id": "x", "prompt": "?", "options": [{"text": "a", "weights": {"mbti": {"E": 1}}}]}]"#,
        )
        .unwrap();
        assert_eq!(ok.len(), 1);
    }

    #[test]
    fn test_from_json_tolerates_malformed_weights() {
        let bank = QuestionBank::from_json(
            r#"[{"id": "x", "prompt": "?", "options": [
                {"text": "a", "weights": {"mbti": {"E": 1, "X": 2}, "holland": {"R": "lots"}}},
                {"text": "b", "weights": {"holland": {"C": 3}}}
            ]}]"#,
        )
        .unwrap();
        let options = &bank.questions[0].options;
        assert_eq!(options[0].weights, PartialWeights::new().with_mbti(M::E, 1.0));
        assert_eq!(options[1].weights, PartialWeights::new().with_holland(H::C, 3.0));
    }
}
