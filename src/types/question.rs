//! Questions, answer options and answer records

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Dimension, MbtiAxis, PartialWeights};

/// One selectable answer and the weights it contributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    #[serde(default)]
    pub weights: PartialWeights,
}

impl AnswerOption {
    pub fn new(text: impl Into<String>, weights: PartialWeights) -> Self {
        Self {
            text: text.into(),
            weights,
        }
    }
}

/// A prompt plus its ordered options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    /// Display category ("Interests", "Values", ...)
    #[serde(default)]
    pub category: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Dimensions touched by at least one option
    pub fn targets(&self) -> BTreeSet<Dimension> {
        let mut targets = BTreeSet::new();
        for option in &self.options {
            for letter in option.weights.mbti.keys() {
                targets.insert(Dimension::Mbti(MbtiAxis::of(*letter)));
            }
            for code in option.weights.holland.keys() {
                targets.insert(Dimension::Holland(*code));
            }
        }
        targets
    }
}

/// One answered question, as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    /// Question text at the time of answering
    pub question: String,
    pub option_index: usize,
    pub timestamp: DateTime<Utc>,
}

impl AnswerRecord {
    pub fn new(question: impl Into<String>, option_index: usize) -> Self {
        Self {
            question: question.into(),
            option_index,
            timestamp: Utc::now(),
        }
    }
}

/// What a question generator hands back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "question", rename_all = "snake_case")]
pub enum NextQuestion {
    Ask(Question),
    /// No further question needed
    Complete,
}

impl NextQuestion {
    pub fn is_complete(&self) -> bool {
        matches!(self, NextQuestion::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HollandCode, MbtiLetter};

    #[test]
    fn test_targets_collects_axes_and_letters() {
        let question = Question {
            id: "q".to_string(),
            prompt: "Pick one".to_string(),
            category: String::new(),
            options: vec![
                AnswerOption::new("a", PartialWeights::new().with_mbti(MbtiLetter::I, 1.0)),
                AnswerOption::new(
                    "b",
                    PartialWeights::new()
                        .with_mbti(MbtiLetter::E, 1.0)
                        .with_holland(HollandCode::S, 2.0),
                ),
            ],
        };
        let targets = question.targets();
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&Dimension::Mbti(MbtiAxis::EI)));
        assert!(targets.contains(&Dimension::Holland(HollandCode::S)));
    }

    #[test]
    fn test_option_without_weights_deserializes() {
        let option: AnswerOption = serde_json::from_str(r#"{"text": "skip"}"#).unwrap();
        assert!(option.weights.is_empty());
    }

    #[test]
    fn test_complete_sentinel_json() {
        let json = serde_json::to_value(NextQuestion::Complete).unwrap();
        assert_eq!(json["kind"], "complete");
    }
}
