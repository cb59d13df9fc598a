//! Runtime configuration, read from `APTITUDE_*` environment variables

use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

use crate::core::{ConvergenceChecker, QuestionBank};
use crate::error::{ConfigError, GeneratorError};
use crate::{CONVERGENCE_THRESHOLD, DEFAULT_MAX_QUESTIONS, MIN_OBSERVED_WEIGHT};

pub const ENV_THRESHOLD: &str = "APTITUDE_THRESHOLD";
pub const ENV_MIN_WEIGHT: &str = "APTITUDE_MIN_WEIGHT";
pub const ENV_MAX_QUESTIONS: &str = "APTITUDE_MAX_QUESTIONS";
pub const ENV_STATE_PATH: &str = "APTITUDE_STATE_PATH";
pub const ENV_STATE_DIR: &str = "APTITUDE_STATE_DIR";
pub const ENV_ADDR: &str = "APTITUDE_ADDR";
pub const ENV_QUESTION_BANK: &str = "APTITUDE_QUESTION_BANK";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub convergence_threshold: f64,
    pub min_observed_weight: f64,
    pub max_questions: u32,
    /// Saved state for the CLI session
    pub state_path: PathBuf,
    /// One file per API session
    pub state_dir: PathBuf,
    pub addr: String,
    /// Optional JSON question bank replacing the built-in one
    pub question_bank: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            convergence_threshold: CONVERGENCE_THRESHOLD,
            min_observed_weight: MIN_OBSERVED_WEIGHT,
            max_questions: DEFAULT_MAX_QUESTIONS,
            state_path: PathBuf::from("./questionnaire_state.json"),
            state_dir: PathBuf::from("./sessions"),
            addr: "127.0.0.1:3000".to_string(),
            question_bank: None,
        }
    }
}

impl Config {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            convergence_threshold: try_load(&lookup, ENV_THRESHOLD, defaults.convergence_threshold)?,
            min_observed_weight: try_load(&lookup, ENV_MIN_WEIGHT, defaults.min_observed_weight)?,
            max_questions: try_load(&lookup, ENV_MAX_QUESTIONS, defaults.max_questions)?,
            state_path: lookup(ENV_STATE_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.state_path),
            state_dir: lookup(ENV_STATE_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.state_dir),
            addr: lookup(ENV_ADDR).unwrap_or(defaults.addr),
            question_bank: lookup(ENV_QUESTION_BANK).map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.convergence_threshold > 0.0 && self.convergence_threshold <= 1.0) {
            return Err(ConfigError::InvalidValue {
                key: ENV_THRESHOLD.to_string(),
                message: format!("{} not in (0, 1]", self.convergence_threshold),
            });
        }
        if !(self.min_observed_weight >= 0.0 && self.min_observed_weight.is_finite()) {
            return Err(ConfigError::InvalidValue {
                key: ENV_MIN_WEIGHT.to_string(),
                message: format!("{} must be a non-negative number", self.min_observed_weight),
            });
        }
        Ok(())
    }

    pub fn checker(&self) -> ConvergenceChecker {
        ConvergenceChecker::new(self.convergence_threshold, self.min_observed_weight)
    }

    /// Built-in bank unless a bank file is configured
    pub fn question_bank(&self) -> Result<QuestionBank, GeneratorError> {
        let bank = match &self.question_bank {
            Some(path) => QuestionBank::from_json_file(path)?,
            None => QuestionBank::default_bank(),
        };
        Ok(bank.with_max_questions(self.max_questions))
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
        }),
    }
}
