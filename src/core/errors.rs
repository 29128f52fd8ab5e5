//! Custom error types for translation operations

use thiserror::Error;

use crate::core::models::Direction;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Request text is empty or whitespace only
    #[error("Text cannot be empty")]
    EmptyText,

    /// Source language is neither `en` nor `ru`
    #[error("Unsupported language: {lang}")]
    UnsupportedLanguage {
        /// Code as received
        lang: String,
    },

    /// Provider failed while tokenizing, generating or decoding
    #[error("{message}")]
    TranslationFailure {
        /// Provider error message
        message: String,
    },

    /// Provider could not be loaded at startup
    #[error("Failed to load {direction} model: {message}")]
    ModelLoad {
        /// Direction that failed to load
        direction: Direction,
        /// Loader error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What is wrong
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl TranslationError {
    /// Whether the error was caused by the client's request body.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TranslationError::EmptyText)
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(TranslationError::EmptyText.to_string(), "Text cannot be empty");
        assert_eq!(
            TranslationError::UnsupportedLanguage { lang: "fr".into() }.to_string(),
            "Unsupported language: fr"
        );
        assert_eq!(
            TranslationError::TranslationFailure { message: "CUDA out of memory".into() }.to_string(),
            "CUDA out of memory"
        );
    }

    #[test]
    fn test_only_empty_text_is_client_error() {
        assert!(TranslationError::EmptyText.is_client_error());
        assert!(!TranslationError::UnsupportedLanguage { lang: "de".into() }.is_client_error());
    }
}
