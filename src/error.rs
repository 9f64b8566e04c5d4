//! Error types and result aliases for projkilmat.
//!
//! This module defines the core error type [`ProjkilmatError`] and the [`Result`] type alias
//! used throughout the crate. Every fallible library call returns `Result<T>`; the binary
//! layers `anyhow` context on top.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjkilmatError {
    #[error("LLM gateway error: {0}")]
    GatewayError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[source] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Prompt error: {0}")]
    PromptError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("{message}")]
    TechnicalError {
        message: String,
        #[source]
        source: Box<ProjkilmatError>,
    },
}

impl ProjkilmatError {
    /// Wrap a lower-level failure into an application-level error.
    pub fn technical(message: impl Into<String>, source: ProjkilmatError) -> Self {
        Self::TechnicalError {
            message: message.into(),
            source: Box::new(source),
        }
    }
}

impl From<reqwest::Error> for ProjkilmatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProjkilmatError::TimeoutError(err.to_string())
        } else {
            ProjkilmatError::HttpError(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, ProjkilmatError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_gateway_error_display() {
        let err = ProjkilmatError::GatewayError("connection failed".to_string());
        assert_eq!(err.to_string(), "LLM gateway error: connection failed");
    }

    #[test]
    fn test_config_error_display() {
        let err = ProjkilmatError::ConfigError("model name must not be blank".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: model name must not be blank");
    }

    #[test]
    fn test_prompt_error_display() {
        let err = ProjkilmatError::PromptError("missing value for 'topic'".to_string());
        assert_eq!(err.to_string(), "Prompt error: missing value for 'topic'");
    }

    #[test]
    fn test_timeout_error_display() {
        let err = ProjkilmatError::TimeoutError("request took too long".to_string());
        assert_eq!(err.to_string(), "Timeout error: request took too long");
    }

    #[test]
    fn test_technical_error_keeps_source() {
        let err = ProjkilmatError::technical(
            "Une erreur est survenue lors de l'interaction avec l'agent.",
            ProjkilmatError::GatewayError("Ollama API error: 500".to_string()),
        );

        assert_eq!(err.to_string(), "Une erreur est survenue lors de l'interaction avec l'agent.");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "LLM gateway error: Ollama API error: 500");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ProjkilmatError = json_err.into();

        match err {
            ProjkilmatError::SerializationError(_) => {}
            _ => panic!("Expected SerializationError"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err: ProjkilmatError = io_err.into();

        match err {
            ProjkilmatError::IoError(_) => {}
            _ => panic!("Expected IoError"),
        }
    }

    #[test]
    fn test_error_debug() {
        let err = ProjkilmatError::PromptError("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("PromptError"));
    }
}
