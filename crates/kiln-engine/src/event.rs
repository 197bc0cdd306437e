//! Lifecycle events raised during an annealing run.

use std::fmt;

/// Kind of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The annealing loop is about to start iterating.
    StartedAnnealing,
    /// An iteration was entered; the counter has already been incremented.
    StartedIteration,
    /// An iteration completed, before the temperature is multiplied down.
    FinishedIteration,
    /// The loop ran to completion.
    FinishedAnnealing,
    /// Free-text note outside the lifecycle sequence.
    Note,
}

impl EventKind {
    /// Iteration-level kinds are the only ones filters may suppress.
    pub fn is_iteration(self) -> bool {
        matches!(self, Self::StartedIteration | Self::FinishedIteration)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartedAnnealing => "started_annealing",
            Self::StartedIteration => "started_iteration",
            Self::FinishedIteration => "finished_iteration",
            Self::FinishedAnnealing => "finished_annealing",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value snapshot of the annealer's state at emission time.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealerSnapshot {
    pub id: String,
    pub temperature: f64,
    pub cooling_factor: f64,
    pub max_iterations: u64,
    pub iteration: u64,
}

/// One lifecycle event: a kind, the annealer snapshot it was emitted
/// under, and an optional free-text note.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealEvent {
    pub kind: EventKind,
    pub annealer: AnnealerSnapshot,
    pub note: Option<String>,
}

impl AnnealEvent {
    pub fn new(kind: EventKind, annealer: AnnealerSnapshot) -> Self {
        Self {
            kind,
            annealer,
            note: None,
        }
    }

    /// Creates a [`EventKind::Note`] event carrying the given text.
    pub fn note(annealer: AnnealerSnapshot, text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Note,
            annealer,
            note: Some(text.into()),
        }
    }
}
