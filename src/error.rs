//! Error types for Aptitude.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

/// Persistence errors from a [`crate::core::StateStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize questionnaire state: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors from a question generator. All of them are retryable.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Question generator unavailable: {0}")]
    Unavailable(String),

    #[error("Generator returned an invalid question: {0}")]
    InvalidQuestion(String),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors surfaced while driving a questionnaire session.
#[derive(Debug, thiserror::Error)]
pub enum QuestionnaireError {
    #[error("No question is pending")]
    NoPendingQuestion,

    #[error("Option {index} out of range (question has {len} options)")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("Questionnaire already complete")]
    AlreadyComplete,

    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

impl QuestionnaireError {
    /// Whether retrying `advance()` can recover from this error
    pub fn is_retryable(&self) -> bool {
        matches!(self, QuestionnaireError::Generator(_))
    }
}

/// Errors returned by the HTTP API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Session not found")]
    SessionNotFound,

    #[error(transparent)]
    Questionnaire(#[from] QuestionnaireError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::SessionNotFound => StatusCode::NOT_FOUND,
            ApiError::Questionnaire(QuestionnaireError::OptionOutOfRange { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Questionnaire(QuestionnaireError::NoPendingQuestion)
            | ApiError::Questionnaire(QuestionnaireError::AlreadyComplete) => StatusCode::CONFLICT,
            ApiError::Questionnaire(QuestionnaireError::Generator(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        let retryable = matches!(&self, ApiError::Questionnaire(e) if e.is_retryable());

        (
            status,
            Json(serde_json::json!({
                "error": self.to_string(),
                "retryable": retryable,
            })),
        )
            .into_response()
    }
}
