//! Error types for xml2json
//!
//! This module defines all error types used throughout the library.
//! Each variant of [`Error`] corresponds to one stage of the conversion
//! pipeline, so callers can tell which stage failed.

use std::fmt;
use thiserror::Error;

/// Result type alias using xml2json Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xml2json operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input source could not be read
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// Input is not well-formed XML
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Output destination could not be written
    #[error("write error: {0}")]
    Write(#[from] WriteError),

    /// Element nesting deeper than the configured maximum
    #[error("depth exceeded: nesting depth {depth} exceeds maximum {max}")]
    DepthExceeded {
        /// Depth that was reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// Size or count limit exceeded
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Name of the pipeline stage that produced this error
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Access(_) => "read",
            Error::Parse(_) => "parse",
            Error::DepthExceeded { .. } | Error::LimitExceeded(_) => "convert",
            Error::Serialize(_) => "serialize",
            Error::Write(_) => "write",
        }
    }
}

/// Error raised when an input source cannot be read
#[derive(Debug)]
pub struct AccessError {
    /// Error message
    pub message: String,
    /// The source that could not be read
    pub location: Option<String>,
    /// Underlying I/O error
    pub cause: Option<std::io::Error>,
}

impl AccessError {
    /// Create a new access error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            cause: None,
        }
    }

    /// Set the location that failed
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Attach the underlying I/O error
    pub fn with_cause(mut self, cause: std::io::Error) -> Self {
        self.cause = Some(cause);
        self
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, " '{}'", loc)?;
        }

        if let Some(ref cause) = self.cause {
            write!(f, ": {}", cause)?;
        }

        Ok(())
    }
}

impl std::error::Error for AccessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|e| e as _)
    }
}

/// XML parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location in the document (line and column)
    pub location: Option<String>,
    /// Excerpt of the offending source line
    pub source: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            source: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, " at {}", loc)?;
        }

        if let Some(ref src) = self.source {
            write!(f, "\n\nSource:\n{}", src)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Error raised when JSON output cannot be written
#[derive(Debug)]
pub struct WriteError {
    /// Error message
    pub message: String,
    /// Destination that could not be written
    pub destination: Option<String>,
    /// Underlying I/O error
    pub cause: Option<std::io::Error>,
}

impl WriteError {
    /// Create a new write error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            destination: None,
            cause: None,
        }
    }

    /// Set the destination
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Attach the underlying I/O error
    pub fn with_cause(mut self, cause: std::io::Error) -> Self {
        self.cause = Some(cause);
        self
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref dest) = self.destination {
            write!(f, " '{}'", dest)?;
        }

        if let Some(ref cause) = self.cause {
            write!(f, ": {}", cause)?;
        }

        Ok(())
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|e| e as _)
    }
}
