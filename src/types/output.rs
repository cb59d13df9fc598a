//! Output structures for each answered question

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::{Dimension, Question, Stage};

/// What changed after one answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutput {
    pub timestamp: DateTime<Utc>,
    pub question_number: u32,
    pub stage: Stage,
    pub confidence_scores: BTreeMap<String, f64>,
    /// Labels that converged on this answer
    pub newly_converged: Vec<String>,
    pub converged_count: usize,
    /// Next question, if one was fetched
    pub next_question: Option<Question>,
    pub complete: bool,
}

impl StepOutput {
    pub fn new(
        question_number: u32,
        stage: Stage,
        confidence_scores: BTreeMap<String, f64>,
        newly_converged: &[Dimension],
        converged_count: usize,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            question_number,
            stage,
            confidence_scores,
            newly_converged: newly_converged.iter().map(|d| d.label()).collect(),
            converged_count,
            next_question: None,
            complete: false,
        }
    }

    /// Highest-confidence dimension
    fn strongest(&self) -> Option<(&str, f64)> {
        self.confidence_scores
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(label, c)| (label.as_str(), *c))
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let stage = match self.stage {
            Stage::Icebreaker => self.stage.to_string().bright_black(),
            Stage::Behavior => self.stage.to_string().yellow(),
            Stage::Situation => self.stage.to_string().cyan(),
        };
        let mut line = format!(
            "#{} | stage={} | converged={}/{}",
            self.question_number,
            stage,
            self.converged_count,
            crate::TOTAL_DIMENSIONS
        );
        if let Some((label, c)) = self.strongest() {
            line.push_str(&format!(" | top={}@{:.2}", label, c));
        }
        if !self.newly_converged.is_empty() {
            let decided = format!(" | decided: {}", self.newly_converged.join(", "));
            line.push_str(&decided.green().to_string());
        }
        if self.complete {
            line.push_str(&" | COMPLETE".green().bold().to_string());
        }
        line
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "question={} | stage={} | converged={} | new={} | complete={}",
            self.question_number,
            self.stage,
            self.converged_count,
            self.newly_converged.join(","),
            self.complete
        )
    }
}
