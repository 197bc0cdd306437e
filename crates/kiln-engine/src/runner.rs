//! Multi-run scenario orchestration.

use std::time::{Duration, Instant};

use kiln_config::ScenarioConfig;
use kiln_core::sink::LogLevel;

use crate::annealer::Annealer;
use crate::error::EngineError;

/// How the runs of a scenario are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Runs execute one after another on the calling thread.
    #[default]
    Sequential,
    /// Every run anneals on its own thread; `run` joins them all.
    Concurrent,
}

/// Timing summary for a completed scenario batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub scenario: String,
    pub runs: usize,
    pub elapsed: Duration,
}

/// Executes N independent runs of one configured annealer.
///
/// Each run gets a clone of the template - its own explorer, random
/// source, and notifier lanes - initialised and identified as
/// `"name (i/N)"` (just `"name"` for a single run). The template itself
/// is never annealed.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use kiln_core::sink::TracingSink;
/// use kiln_engine::builder::AnnealerBuilder;
/// use kiln_engine::runner::{ExecutionMode, ScenarioRunner};
/// # fn explorer() -> Box<dyn kiln_core::SolutionExplorer> { unimplemented!() }
///
/// let template = AnnealerBuilder::new()
///     .temperature(1000.0)
///     .cooling_factor(0.95)
///     .max_iterations(10_000)
///     .explorer(explorer())
///     .log_sink(Arc::new(TracingSink))
///     .build()
///     .unwrap();
///
/// let report = ScenarioRunner::new(template)
///     .named("allocation sweep")
///     .runs(8)
///     .mode(ExecutionMode::Concurrent)
///     .run()
///     .unwrap();
/// assert_eq!(report.runs, 8);
/// ```
pub struct ScenarioRunner {
    template: Annealer,
    name: String,
    runs: usize,
    mode: ExecutionMode,
}

impl ScenarioRunner {
    pub fn new(template: Annealer) -> Self {
        Self {
            template,
            name: "scenario".to_string(),
            runs: 1,
            mode: ExecutionMode::Sequential,
        }
    }

    /// Creates a runner from a scenario config section.
    pub fn from_config(template: Annealer, config: &ScenarioConfig) -> Self {
        Self {
            template,
            name: config.name.clone(),
            runs: config.runs,
            mode: if config.concurrent {
                ExecutionMode::Concurrent
            } else {
                ExecutionMode::Sequential
            },
        }
    }

    /// Sets the scenario name used to derive per-run identifiers.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the number of independent runs.
    pub fn runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Sets the scheduling mode.
    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    fn run_id(&self, index: usize) -> String {
        if self.runs > 1 {
            format!("{} ({}/{})", self.name, index, self.runs)
        } else {
            self.name.clone()
        }
    }

    fn prepare_run(&self, index: usize) -> Annealer {
        let mut run = self.template.clone();
        run.set_id(self.run_id(index));
        run.initialise();
        run
    }

    /// Executes the batch and reports its total wall-clock time.
    ///
    /// Sequential mode starts run i+1 only once run i has returned, and a
    /// failure stops the batch immediately. Concurrent mode spawns every
    /// run, blocks until all threads have finished, then reports the
    /// first failure, if any. Failures are the runs' own
    /// [`EngineError::Run`] values, propagated - not caught - here.
    pub fn run(&self) -> Result<ScenarioReport, EngineError> {
        let started = Instant::now();
        tracing::debug!(scenario = %self.name, runs = self.runs, mode = ?self.mode, "scenario started");

        match self.mode {
            ExecutionMode::Sequential => {
                for index in 1..=self.runs {
                    self.prepare_run(index).anneal()?;
                }
            }
            ExecutionMode::Concurrent => {
                let mut outcomes = Vec::with_capacity(self.runs);
                std::thread::scope(|scope| {
                    let handles: Vec<_> = (1..=self.runs)
                        .map(|index| {
                            let mut run = self.prepare_run(index);
                            scope.spawn(move || run.anneal())
                        })
                        .collect();
                    for handle in handles {
                        match handle.join() {
                            Ok(outcome) => outcomes.push(outcome),
                            Err(panic) => std::panic::resume_unwind(panic),
                        }
                    }
                });
                for outcome in outcomes {
                    outcome?;
                }
            }
        }

        let elapsed = started.elapsed();
        self.report(elapsed);
        Ok(ScenarioReport {
            scenario: self.name.clone(),
            runs: self.runs,
            elapsed,
        })
    }

    fn report(&self, elapsed: Duration) {
        tracing::info!(
            scenario = %self.name,
            runs = self.runs,
            elapsed_ms = elapsed.as_millis() as u64,
            "scenario finished"
        );
        if let Some(sink) = self.template.sink() {
            if sink.enabled(LogLevel::Info) {
                sink.write(
                    LogLevel::Info,
                    &format!(
                        "scenario '{}' finished: {} run(s) in {:.3}s",
                        self.name,
                        self.runs,
                        elapsed.as_secs_f64()
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
