//! Error type raised by solution explorers.

use thiserror::Error;

/// Failure raised by a solution explorer operation.
///
/// Explorers are domain plugins, so the payload is a message plus an
/// optional underlying cause supplied by the implementation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExplorerError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ExplorerError {
    /// Creates an error from a message alone.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
