//! The solution-explorer contract.
//!
//! An explorer encapsulates one candidate solution and the logic for a
//! single optimization step. The annealer drives the contract in a fixed
//! order: `bind_sink`, `initialise`, repeated `try_random_change` calls,
//! `tear_down` - with teardown guaranteed on every exit path, including
//! failures.

use std::sync::Arc;

use crate::error::ExplorerError;
use crate::sink::LogSink;

/// A candidate solution plus the logic to perturb, evaluate, accept, or
/// revert it.
///
/// Implementations own all problem state and an independent random source.
/// Elapsed-time tracking, thread affinity, and similar concerns belong in
/// wrapper types composed around an explorer, not in the contract itself.
pub trait SolutionExplorer: Send {
    /// Prepares problem data and seeds the random source.
    fn initialise(&mut self) -> Result<(), ExplorerError>;

    /// Proposes one perturbation, computes the resulting change in
    /// objective value, and applies the Metropolis decision
    /// ([`crate::metropolis::decide`]), committing the proposal via
    /// [`SolutionExplorer::accept_last_change`] or undoing it via
    /// [`SolutionExplorer::revert_last_change`].
    fn try_random_change(&mut self, temperature: f64) -> Result<(), ExplorerError>;

    /// Commits the last proposed change.
    fn accept_last_change(&mut self);

    /// Undoes the last proposed change. Must be the exact inverse of the
    /// proposal: the objective value returns to its pre-change value.
    fn revert_last_change(&mut self);

    /// Current objective value of the candidate solution.
    fn objective_value(&self) -> f64;

    /// Deep-copies all mutable state, producing a fully independent
    /// explorer with a fresh, de-correlated random source. The clone must
    /// not alias any of the origin's buffers or its random stream.
    fn clone_explorer(&self) -> Box<dyn SolutionExplorer>;

    /// Releases resources. The annealer invokes this on every exit path.
    fn tear_down(&mut self) -> Result<(), ExplorerError>;

    /// Binds the logging sink this explorer may report through during a
    /// run. The default implementation ignores it.
    fn bind_sink(&mut self, _sink: Arc<dyn LogSink>) {}
}

/// Per-step bookkeeping carried by an explorer: the current objective
/// value, the pending change from an open proposal, and the outcome of the
/// last Metropolis decision.
///
/// `commit` and `roll_back` keep accept/revert symmetric: only a commit
/// touches the objective value, so a revert restores it exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepRecord {
    /// Objective value of the committed solution.
    pub objective_value: f64,
    /// Change in objective value of the open proposal, zero when none.
    pub pending_change: f64,
    /// Acceptance probability of the last Metropolis decision.
    pub last_probability: f64,
    /// Outcome of the last decision, `None` before the first step.
    pub last_outcome: Option<StepOutcome>,
}

/// How the last proposal was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Accepted,
    Reverted,
}

impl StepRecord {
    /// Creates a record for a freshly initialised solution.
    pub fn start_from(objective_value: f64) -> Self {
        Self {
            objective_value,
            ..Self::default()
        }
    }

    /// Opens a proposal with the given change in objective value.
    pub fn propose(&mut self, change: f64) {
        self.pending_change = change;
    }

    /// Records the acceptance probability of the decision on the open
    /// proposal.
    pub fn record_probability(&mut self, probability: f64) {
        self.last_probability = probability;
    }

    /// Commits the open proposal into the objective value.
    pub fn commit(&mut self) {
        self.objective_value += self.pending_change;
        self.pending_change = 0.0;
        self.last_outcome = Some(StepOutcome::Accepted);
    }

    /// Discards the open proposal, leaving the objective value untouched.
    pub fn roll_back(&mut self) {
        self.pending_change = 0.0;
        self.last_outcome = Some(StepOutcome::Reverted);
    }
}
