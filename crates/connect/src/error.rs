//! Error types for the connect adapter.

use thiserror::Error;

/// An argument mapping that is neither a path, a list of paths, nor an extractor function.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Configuration error: argument mapping must be one of extractor function, list of paths, or path (got {found})"
)]
pub struct ConfigurationError {
    found: String,
}

impl ConfigurationError {
    pub(crate) fn new(found: impl Into<String>) -> Self {
        Self {
            found: found.into(),
        }
    }

    /// Short description of the rejected input shape.
    #[must_use]
    pub fn found(&self) -> &str {
        &self.found
    }
}

/// Failures the adapter forwards to the `next` continuation instead of answering itself.
#[derive(Error, Debug)]
pub enum ConnectError {
    /// The route was connected with an invalid argument mapping.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The request body could not be read (I/O error or size limit exceeded).
    #[error("Request error: failed to read body: {0}")]
    UnreadableBody(String),

    /// The request declared a JSON body that does not parse.
    #[error("Request error: malformed JSON body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl ConnectError {
    /// `true` when the failure is the route's fault rather than the client's.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, ConnectError>;
