//! The annealer: temperature state, cooling, and the core loop.

use std::fmt;
use std::sync::Arc;

use kiln_core::error::ExplorerError;
use kiln_core::explorer::SolutionExplorer;
use kiln_core::sink::{LogSink, NullSink};

use crate::error::{EngineError, ValidationError};
use crate::event::{AnnealEvent, AnnealerSnapshot, EventKind};
use crate::notify::EventNotifier;
use crate::observe::Observer;

/// Lifecycle of one annealer instance.
///
/// `anneal` requires `Initialised` and leaves the annealer `Finished`;
/// a further run requires `initialise` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialised,
    Initialised,
    Running,
    Finished,
}

/// Drives a solution explorer through the annealing loop under a
/// multiplicative cooling schedule, raising lifecycle events as it goes.
///
/// Constructed through [`crate::builder::AnnealerBuilder`]. Cloning
/// produces a fully independent instance for concurrent multi-run
/// scenarios: scalar state by value, the explorer deep-cloned with a
/// fresh random source, and fresh notifier lanes over the same observers.
/// The log sink is the one deliberately shared handle.
pub struct Annealer {
    id: String,
    starting_temperature: f64,
    temperature: f64,
    cooling_factor: f64,
    max_iterations: u64,
    iteration: u64,
    state: LifecycleState,
    explorer: Option<Box<dyn SolutionExplorer>>,
    sink: Option<Arc<dyn LogSink>>,
    notifier: EventNotifier,
}

impl Annealer {
    /// Fallback temperature when a builder was given an invalid one.
    pub const DEFAULT_TEMPERATURE: f64 = 1.0;
    /// Fallback cooling factor when a builder was given an invalid one.
    pub const DEFAULT_COOLING_FACTOR: f64 = 1.0;

    pub(crate) fn assemble(
        id: String,
        temperature: f64,
        cooling_factor: f64,
        max_iterations: u64,
        explorer: Option<Box<dyn SolutionExplorer>>,
        sink: Option<Arc<dyn LogSink>>,
        notifier: EventNotifier,
    ) -> Self {
        Self {
            id,
            starting_temperature: temperature,
            temperature,
            cooling_factor,
            max_iterations,
            iteration: 0,
            state: LifecycleState::Uninitialised,
            explorer,
            sink,
            notifier,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn cooling_factor(&self) -> f64 {
        self.cooling_factor
    }

    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    /// Iterations completed so far in the current run.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The bound explorer, if any.
    pub fn explorer(&self) -> Option<&dyn SolutionExplorer> {
        self.explorer.as_deref()
    }

    /// The bound log sink, if any.
    pub fn sink(&self) -> Option<Arc<dyn LogSink>> {
        self.sink.clone()
    }

    /// Sets the temperature the next run starts from.
    ///
    /// Fails when `temperature` is not strictly positive or not finite;
    /// the current value is left unchanged.
    pub fn set_temperature(&mut self, temperature: f64) -> Result<(), ValidationError> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(ValidationError::Temperature(temperature));
        }
        self.starting_temperature = temperature;
        self.temperature = temperature;
        Ok(())
    }

    /// Sets the multiplicative cooling factor.
    ///
    /// Fails when `factor` is outside (0, 1] or not finite; the current
    /// value is left unchanged.
    pub fn set_cooling_factor(&mut self, factor: f64) -> Result<(), ValidationError> {
        if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
            return Err(ValidationError::CoolingFactor(factor));
        }
        self.cooling_factor = factor;
        Ok(())
    }

    /// Sets the iteration limit. Zero makes the loop a no-op.
    pub fn set_max_iterations(&mut self, iterations: u64) {
        self.max_iterations = iterations;
    }

    /// Registers an observer on this annealer's notifier.
    pub fn add_observer(&mut self, observer: Arc<dyn Observer>) {
        self.notifier.add_observer(observer);
    }

    /// Arms the annealer for one run: restores the starting temperature,
    /// resets the iteration counter, and moves to `Initialised`.
    pub fn initialise(&mut self) {
        self.temperature = self.starting_temperature;
        self.iteration = 0;
        self.state = LifecycleState::Initialised;
    }

    /// Emits a free-text `Note` event outside the lifecycle sequence.
    pub fn note(&self, text: impl Into<String>) {
        self.notifier.notify(&AnnealEvent::note(self.snapshot(), text));
    }

    fn snapshot(&self) -> AnnealerSnapshot {
        AnnealerSnapshot {
            id: self.id.clone(),
            temperature: self.temperature,
            cooling_factor: self.cooling_factor,
            max_iterations: self.max_iterations,
            iteration: self.iteration,
        }
    }

    fn emit(&self, kind: EventKind) {
        self.notifier.notify(&AnnealEvent::new(kind, self.snapshot()));
    }

    /// Runs the annealing loop to completion.
    ///
    /// Binds the sink to the explorer, initialises it, iterates up to the
    /// iteration limit (Metropolis step, then multiplicative cooldown),
    /// and tears the explorer down on every exit path - normal or
    /// failing. An explorer failure is wrapped once with run context and
    /// returned; it is never retried here.
    pub fn anneal(&mut self) -> Result<(), EngineError> {
        if self.state != LifecycleState::Initialised {
            return Err(EngineError::InvalidState {
                id: self.id.clone(),
                reason: format!(
                    "anneal requires an initialised annealer, state is {:?}",
                    self.state
                ),
            });
        }
        let mut explorer = self.explorer.take().ok_or_else(|| EngineError::InvalidState {
            id: self.id.clone(),
            reason: "no solution explorer is bound".to_string(),
        })?;
        self.state = LifecycleState::Running;

        let sink: Arc<dyn LogSink> = match &self.sink {
            Some(sink) => Arc::clone(sink),
            None => Arc::new(NullSink),
        };
        explorer.bind_sink(sink);

        let outcome = self.drive(explorer.as_mut());
        let teardown = explorer.tear_down();
        self.explorer = Some(explorer);
        self.state = LifecycleState::Finished;

        match (outcome, teardown) {
            (Err(source), _) => Err(self.wrap(source)),
            (Ok(()), Err(source)) => Err(self.wrap(source)),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    fn drive(&mut self, explorer: &mut dyn SolutionExplorer) -> Result<(), ExplorerError> {
        explorer.initialise()?;
        tracing::debug!(
            annealer = %self.id,
            temperature = self.temperature,
            cooling_factor = self.cooling_factor,
            max_iterations = self.max_iterations,
            "started annealing"
        );
        self.emit(EventKind::StartedAnnealing);

        while self.iteration < self.max_iterations {
            self.iteration += 1;
            self.emit(EventKind::StartedIteration);
            explorer.try_random_change(self.temperature)?;
            self.emit(EventKind::FinishedIteration);
            self.temperature *= self.cooling_factor;
        }

        self.emit(EventKind::FinishedAnnealing);
        tracing::debug!(
            annealer = %self.id,
            iterations = self.iteration,
            temperature = self.temperature,
            objective = explorer.objective_value(),
            "finished annealing"
        );
        Ok(())
    }

    fn wrap(&self, source: ExplorerError) -> EngineError {
        EngineError::Run {
            id: self.id.clone(),
            iteration: self.iteration,
            source,
        }
    }
}

impl Clone for Annealer {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            starting_temperature: self.starting_temperature,
            temperature: self.temperature,
            cooling_factor: self.cooling_factor,
            max_iterations: self.max_iterations,
            iteration: self.iteration,
            state: self.state,
            explorer: self.explorer.as_ref().map(|e| e.clone_explorer()),
            sink: self.sink.clone(),
            notifier: self.notifier.duplicate(),
        }
    }
}

impl fmt::Debug for Annealer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annealer")
            .field("id", &self.id)
            .field("temperature", &self.temperature)
            .field("cooling_factor", &self.cooling_factor)
            .field("max_iterations", &self.max_iterations)
            .field("iteration", &self.iteration)
            .field("state", &self.state)
            .field("explorer", &self.explorer.is_some())
            .field("sink", &self.sink.is_some())
            .field("notifier", &self.notifier)
            .finish()
    }
}

#[cfg(test)]
#[path = "annealer_tests.rs"]
mod tests;
