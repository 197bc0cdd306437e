//! Fluent construction of annealers with aggregated validation.

use std::fmt;
use std::sync::Arc;

use kiln_config::AnnealerConfig;
use kiln_config::NotifierMode;
use kiln_core::explorer::SolutionExplorer;
use kiln_core::sink::LogSink;

use crate::annealer::Annealer;
use crate::error::{EngineError, ValidationError, ValidationErrors};
use crate::notify::EventNotifier;
use crate::observe::Observer;
use crate::registry::ExplorerRegistry;

/// Assembles an [`Annealer`] from explicit values or a configuration
/// record.
///
/// Setters do not fail fast: an invalid value is recorded and the
/// documented fallback kept, so [`AnnealerBuilder::build`] reports every
/// problem from one attempt.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use kiln_core::sink::NullSink;
/// use kiln_engine::builder::AnnealerBuilder;
///
/// let failure = AnnealerBuilder::new()
///     .temperature(-1.0)
///     .cooling_factor(1.5)
///     .log_sink(Arc::new(NullSink))
///     .build()
///     .unwrap_err();
///
/// // Invalid temperature, invalid cooling factor, missing explorer.
/// assert_eq!(failure.errors().len(), 3);
/// assert_eq!(failure.fallback().temperature(), 1.0);
/// ```
pub struct AnnealerBuilder {
    id: String,
    temperature: f64,
    cooling_factor: f64,
    max_iterations: u64,
    notifier_mode: NotifierMode,
    observers: Vec<Arc<dyn Observer>>,
    explorer: Option<Box<dyn SolutionExplorer>>,
    sink: Option<Arc<dyn LogSink>>,
    errors: Vec<ValidationError>,
}

impl AnnealerBuilder {
    pub fn new() -> Self {
        Self {
            id: "annealer".to_string(),
            temperature: Annealer::DEFAULT_TEMPERATURE,
            cooling_factor: Annealer::DEFAULT_COOLING_FACTOR,
            max_iterations: 0,
            notifier_mode: NotifierMode::default(),
            observers: Vec::new(),
            explorer: None,
            sink: None,
            errors: Vec::new(),
        }
    }

    /// Creates a builder from a configuration record, resolving the named
    /// explorer reference through the registry.
    ///
    /// # Errors
    ///
    /// Returns an error when the referenced explorer is not registered or
    /// its factory rejects the parameter map. Numeric values from the
    /// config are validated like any other setter input: collected, not
    /// fatal.
    pub fn from_config(
        config: &AnnealerConfig,
        registry: &ExplorerRegistry,
    ) -> Result<Self, EngineError> {
        let mut builder = Self::new()
            .temperature(config.starting_temperature)
            .cooling_factor(config.cooling_factor)
            .max_iterations(config.max_iterations)
            .notifier_mode(config.notifier_mode);
        if let Some(reference) = &config.explorer {
            builder = builder.explorer(registry.create(&reference.name, &reference.params)?);
        }
        Ok(builder)
    }

    /// Sets the annealer identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the starting temperature. An invalid value (non-positive or
    /// non-finite) is recorded as a validation error and the fallback
    /// kept.
    pub fn temperature(mut self, temperature: f64) -> Self {
        if !temperature.is_finite() || temperature <= 0.0 {
            self.errors.push(ValidationError::Temperature(temperature));
        } else {
            self.temperature = temperature;
        }
        self
    }

    /// Sets the cooling factor. A value outside (0, 1] is recorded as a
    /// validation error and the fallback kept.
    pub fn cooling_factor(mut self, factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
            self.errors.push(ValidationError::CoolingFactor(factor));
        } else {
            self.cooling_factor = factor;
        }
        self
    }

    /// Sets the iteration limit. Zero makes the loop a no-op.
    pub fn max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Selects how lifecycle events are delivered to observers.
    pub fn notifier_mode(mut self, mode: NotifierMode) -> Self {
        self.notifier_mode = mode;
        self
    }

    /// Registers an observer.
    pub fn observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Supplies the solution explorer.
    pub fn explorer(mut self, explorer: Box<dyn SolutionExplorer>) -> Self {
        self.explorer = Some(explorer);
        self
    }

    /// Supplies the logging sink bound to the explorer during a run.
    pub fn log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Consumes the builder.
    ///
    /// `Err` aggregates every validation failure from this attempt -
    /// including a missing explorer or log sink - and still carries the
    /// best-effort fallback annealer assembled from the documented
    /// defaults, for inspection or deliberate reuse.
    pub fn build(mut self) -> Result<Annealer, BuildFailure> {
        if self.explorer.is_none() {
            self.errors.push(ValidationError::MissingExplorer);
        }
        if self.sink.is_none() {
            self.errors.push(ValidationError::MissingLogSink);
        }

        let mut notifier = EventNotifier::new(self.notifier_mode);
        for observer in self.observers {
            notifier.add_observer(observer);
        }

        let annealer = Annealer::assemble(
            self.id,
            self.temperature,
            self.cooling_factor,
            self.max_iterations,
            self.explorer,
            self.sink,
            notifier,
        );

        if self.errors.is_empty() {
            Ok(annealer)
        } else {
            Err(BuildFailure {
                errors: ValidationErrors::new(self.errors),
                fallback: annealer,
            })
        }
    }
}

impl Default for AnnealerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnnealerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnealerBuilder")
            .field("id", &self.id)
            .field("temperature", &self.temperature)
            .field("cooling_factor", &self.cooling_factor)
            .field("max_iterations", &self.max_iterations)
            .field("notifier_mode", &self.notifier_mode)
            .field("observers", &self.observers.len())
            .field("explorer", &self.explorer.is_some())
            .field("sink", &self.sink.is_some())
            .field("errors", &self.errors)
            .finish()
    }
}

/// Aggregated validation failures from one build attempt, together with
/// the best-effort fallback annealer.
#[derive(Debug)]
pub struct BuildFailure {
    errors: ValidationErrors,
    fallback: Annealer,
}

impl BuildFailure {
    /// Every validation failure collected by the build.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The fallback annealer, assembled from the documented defaults in
    /// place of each rejected value.
    pub fn fallback(&self) -> &Annealer {
        &self.fallback
    }

    /// Takes ownership of the fallback annealer.
    pub fn into_fallback(self) -> Annealer {
        self.fallback
    }
}

impl fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.errors.fmt(f)
    }
}

impl std::error::Error for BuildFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.errors)
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
