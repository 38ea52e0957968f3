//! Error handling for lookup operations.
//!
//! Provides error types with context for resource fetching, index and
//! detail parsing, and configuration failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("IO error reading {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed for {location}: {source}")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Resource {location} answered with status {status}")]
    UnsuccessfulStatus { location: String, status: u16 },

    #[error("Resource not found: {location}")]
    NotFound { location: String },

    #[error("Invalid JSON in {location}: {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid record identifier '{id}': {reason}")]
    InvalidIdentifier { id: String, reason: String },

    #[error("Invalid source root '{root}': {reason}")]
    InvalidSource { root: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to render page template: {source}")]
    Template {
        #[source]
        source: minijinja::Error,
    },
}

impl LookupError {
    pub fn io(location: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            location: location.into(),
            source,
        }
    }

    pub fn http(location: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            location: location.into(),
            source,
        }
    }

    pub fn json(location: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            location: location.into(),
            source,
        }
    }

    pub fn invalid_identifier(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn template(source: minijinja::Error) -> Self {
        Self::Template { source }
    }

    /// Whether another attempt at the same resource could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            LookupError::Http { .. } => true,
            LookupError::UnsuccessfulStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<figment::Error> for LookupError {
    fn from(error: figment::Error) -> Self {
        Self::Configuration {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
