use crate::core::RiskLevel;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt blocked: {reason}")]
    PromptBlocked { reason: String, risk: RiskLevel },

    #[error("{provider} error: {message}")]
    Provider { provider: String, message: String },

    #[error("All AI providers failed")]
    ProvidersExhausted,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}
