//! Error types for the Spark assistant core.
//!
//! Only configuration loading can fail loudly. Context assembly, prompt
//! composition and normalization degrade instead of returning errors.

use std::path::PathBuf;

/// A specialized `Result` type for Spark assistant operations.
pub type Result<T> = std::result::Result<T, SparkError>;

/// Errors that can occur while setting up the assistant.
#[derive(Debug, thiserror::Error)]
pub enum SparkError {
    /// Invalid JSON syntax or values in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your spark.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },
}

impl SparkError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_display() {
        let err = SparkError::config_parse("/etc/spark.json", "expected value at line 1");
        let msg = err.to_string();
        assert!(msg.contains("/etc/spark.json"));
        assert!(msg.contains("expected value"));
        assert!(msg.contains("Suggestion"));
    }

    #[test]
    fn test_config_validation_display() {
        let err = SparkError::config_validation(
            "maxTokens must be greater than 0",
            "Set llmParams.maxTokens to at least 1",
        );
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid configuration: maxTokens"));
        assert!(msg.contains("Suggestion: Set llmParams.maxTokens"));
    }
}
