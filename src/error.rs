use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(calassist::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calassist::config))]
    Config(String),

    #[error("Extraction error: {0}")]
    #[diagnostic(code(calassist::extraction))]
    Extraction(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(calassist::google_calendar))]
    GoogleCalendar(String),

    #[error("Interaction error: {0}")]
    #[diagnostic(code(calassist::interaction))]
    Interaction(String),

    #[error(transparent)]
    #[diagnostic(code(calassist::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(calassist::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(calassist::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AssistantResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create extraction errors
pub fn extraction_error(message: &str) -> Error {
    Error::Extraction(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create interaction errors
pub fn interaction_error(message: &str) -> Error {
    Error::Interaction(message.to_string())
}
