use std::io;
use thiserror::Error;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Errors that can occur while researching and verifying apps
#[derive(Debug, Error)]
pub enum ScoutError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive errors from the config exporter
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Generative model provider errors (transport, auth, malformed reply)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// General message errors
    #[error("{0}")]
    Message(String),
}

impl ScoutError {
    /// Creates a new error with the specified message
    pub fn new(message: &str) -> Self {
        Self::Message(message.to_string())
    }

    /// Checks if this error is transient and retryable
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::IO(_) | Self::Llm(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = ScoutError::new("test error");
        assert!(matches!(error, ScoutError::Message(_)));

        if let ScoutError::Message(msg) = error {
            assert_eq!(msg, "test error");
        }
    }

    #[test]
    fn test_is_transient() {
        let transient = ScoutError::Llm("connection timeout".into());
        let fatal = ScoutError::Validation("invalid input".into());

        assert!(transient.is_transient());
        assert!(!fatal.is_transient());
    }
}
