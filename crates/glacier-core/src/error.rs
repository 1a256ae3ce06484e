//! Error types for the architect library.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Message published on the session when any synthesis attempt fails.
///
/// The underlying cause is logged but never surfaced to the caller.
pub const SYNTHESIS_FAILED_MESSAGE: &str = "Architectural synthesis failed. Please retry.";

/// Comprehensive error type for all architect operations.
#[derive(Error, Debug)]
pub enum ArchitectError {
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// The generation service answered, but not with something usable
    #[error("Generation error: {message}")]
    Generation { message: String },
    /// The generation call did not settle in time
    #[error("Generation timed out after {}ms", .elapsed.as_millis())]
    Timeout { elapsed: Duration },
    /// Transport-level failures talking to the generation service
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: reqwest::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// A background task panicked or was cancelled unexpectedly
    #[error("Task error: {message}")]
    Task { message: String },
}

/// Builder for creating HTTP errors with optional context.
pub struct HttpErrorBuilder {
    message: String,
}

impl HttpErrorBuilder {
    /// Create a new HTTP error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: reqwest::Error) -> ArchitectError {
        ArchitectError::Http {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> ArchitectError {
        ArchitectError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl ArchitectError {
    /// Creates a builder for HTTP errors.
    pub fn http(message: impl Into<String>) -> HttpErrorBuilder {
        HttpErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a generation error from any displayable message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates a configuration error from any displayable message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add context to any error type, converting to ArchitectError.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

/// Specialized extension trait for HTTP-related Results.
pub trait HttpResultExt<T> {
    /// Map transport errors with a message.
    fn http_context(self, message: &str) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| ArchitectError::Configuration {
            message: format!("{}: {}", context, e),
        })
    }
}

impl<T> HttpResultExt<T> for std::result::Result<T, reqwest::Error> {
    fn http_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ArchitectError::http(message).with_source(e))
    }
}

/// Result type alias for architect operations
pub type Result<T> = std::result::Result<T, ArchitectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_builder() {
        let err = ArchitectError::invalid_input("name").with_reason("must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'name': must not be empty"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = ArchitectError::Timeout {
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "Generation timed out after 1500ms");
    }

    #[test]
    fn test_with_context_wraps_as_configuration() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = io.with_context("Failed to read config").unwrap_err();
        assert!(matches!(err, ArchitectError::Configuration { .. }));
        assert!(err.to_string().contains("Failed to read config: missing"));
    }
}
