//! Error types for the annealing engine.

use std::fmt;

use kiln_core::ExplorerError;
use thiserror::Error;

/// A single builder validation failure.
///
/// Setters collect these instead of failing fast, so one build attempt
/// reports every problem at once.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("temperature must be strictly positive, got {0}")]
    Temperature(f64),

    #[error("cooling factor must be in (0, 1], got {0}")]
    CoolingFactor(f64),

    #[error("no solution explorer was supplied")]
    MissingExplorer,

    #[error("no log sink was supplied")]
    MissingLogSink,
}

/// Every validation failure collected across one build attempt.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns true when the collection contains the given failure.
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "; {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Failures raised by the engine at configuration or run time.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An explorer failure during `anneal`, wrapped once at the annealer
    /// boundary with run context. Never retried internally.
    #[error("annealer '{id}' failed at iteration {iteration}")]
    Run {
        id: String,
        iteration: u64,
        #[source]
        source: ExplorerError,
    },

    /// Operation not valid in the annealer's current lifecycle state.
    #[error("annealer '{id}': {reason}")]
    InvalidState { id: String, reason: String },

    /// No explorer registered under the requested type name.
    #[error("no solution explorer registered under '{name}'")]
    UnknownExplorer { name: String },

    /// A value in an explorer's parameter map was missing or malformed.
    #[error("invalid explorer parameter '{name}': {reason}")]
    Parameter { name: String, reason: String },
}
