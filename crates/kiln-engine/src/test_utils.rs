//! Test fixtures shared across the crate's test modules.
//!
//! Provides a real explorer strategy (knapsack-style inclusion), a
//! scripted explorer for lifecycle and failure-path assertions, a
//! collecting observer, and an in-memory log sink.

use std::sync::{Arc, Mutex};

use kiln_core::error::ExplorerError;
use kiln_core::explorer::{SolutionExplorer, StepRecord};
use kiln_core::metropolis;
use kiln_core::random::{self, ExplorerRng};
use kiln_core::sink::{LogLevel, LogSink};
use rand::Rng;

use crate::event::{AnnealEvent, EventKind};
use crate::observe::Observer;

/// Penalty per unit of weight over capacity.
const OVERWEIGHT_PENALTY: f64 = 1_000.0;

/// A knapsack-style inclusion explorer: toggle one random item per step,
/// minimizing `penalty * overweight - total value`.
pub struct KnapsackExplorer {
    weights: Vec<f64>,
    values: Vec<f64>,
    capacity: f64,
    seed: Option<u64>,
    rng: ExplorerRng,
    selected: Vec<bool>,
    total_weight: f64,
    total_value: f64,
    pending: Option<usize>,
    record: StepRecord,
}

impl KnapsackExplorer {
    pub fn new(weights: Vec<f64>, values: Vec<f64>, capacity: f64, seed: u64) -> Self {
        assert_eq!(weights.len(), values.len());
        let item_count = weights.len();
        Self {
            weights,
            values,
            capacity,
            seed: Some(seed),
            rng: random::seeded(seed),
            selected: vec![false; item_count],
            total_weight: 0.0,
            total_value: 0.0,
            pending: None,
            record: StepRecord::default(),
        }
    }

    /// A fixed six-item instance, convenient for registry factories.
    pub fn small(capacity: f64, seed: u64) -> Self {
        Self::new(
            vec![2.0, 3.0, 5.0, 7.0, 9.0, 4.0],
            vec![3.0, 4.0, 8.0, 10.0, 11.0, 6.0],
            capacity,
            seed,
        )
    }

    pub fn record(&self) -> &StepRecord {
        &self.record
    }

    pub fn selected(&self) -> &[bool] {
        &self.selected
    }

    fn objective_of(&self, weight: f64, value: f64) -> f64 {
        OVERWEIGHT_PENALTY * (weight - self.capacity).max(0.0) - value
    }

    /// Applies the toggle of `item` to the working state and returns the
    /// change in objective value.
    fn apply_toggle(&mut self, item: usize) -> f64 {
        let before = self.objective_of(self.total_weight, self.total_value);
        let sign = if self.selected[item] { -1.0 } else { 1.0 };
        self.selected[item] = !self.selected[item];
        self.total_weight += sign * self.weights[item];
        self.total_value += sign * self.values[item];
        self.objective_of(self.total_weight, self.total_value) - before
    }
}

impl SolutionExplorer for KnapsackExplorer {
    fn initialise(&mut self) -> Result<(), ExplorerError> {
        self.selected = vec![false; self.weights.len()];
        self.total_weight = 0.0;
        self.total_value = 0.0;
        self.pending = None;
        self.record = StepRecord::start_from(0.0);
        if let Some(seed) = self.seed {
            self.rng = random::seeded(seed);
        }
        Ok(())
    }

    fn try_random_change(&mut self, temperature: f64) -> Result<(), ExplorerError> {
        if self.weights.is_empty() {
            return Err(ExplorerError::new("no items to perturb"));
        }
        let item = self.rng.random_range(0..self.weights.len());
        let change = self.apply_toggle(item);
        self.pending = Some(item);
        self.record.propose(change);

        let decision = metropolis::decide(change, temperature, &mut self.rng);
        self.record.record_probability(decision.probability);
        if decision.accepted {
            self.accept_last_change();
        } else {
            self.revert_last_change();
        }
        Ok(())
    }

    fn accept_last_change(&mut self) {
        self.pending = None;
        self.record.commit();
    }

    fn revert_last_change(&mut self) {
        if let Some(item) = self.pending.take() {
            self.apply_toggle(item);
        }
        self.record.roll_back();
    }

    fn objective_value(&self) -> f64 {
        self.record.objective_value
    }

    fn clone_explorer(&self) -> Box<dyn SolutionExplorer> {
        Box::new(Self {
            weights: self.weights.clone(),
            values: self.values.clone(),
            capacity: self.capacity,
            seed: None,
            rng: random::entropy(),
            selected: self.selected.clone(),
            total_weight: self.total_weight,
            total_value: self.total_value,
            pending: None,
            record: self.record,
        })
    }

    fn tear_down(&mut self) -> Result<(), ExplorerError> {
        Ok(())
    }
}

/// Call counters recorded by a [`ScriptedExplorer`], shared across clones
/// so multi-run tests can observe the whole batch.
#[derive(Debug, Default)]
pub struct CallLog {
    pub initialise_calls: usize,
    pub change_calls: usize,
    pub teardown_calls: usize,
    pub sink_bindings: usize,
    pub temperatures: Vec<f64>,
}

/// Explorer double that records its lifecycle and can fail on demand.
pub struct ScriptedExplorer {
    log: Arc<Mutex<CallLog>>,
    fail_initialise: bool,
    fail_at_change: Option<usize>,
}

impl ScriptedExplorer {
    pub fn well_behaved() -> Self {
        Self {
            log: Arc::new(Mutex::new(CallLog::default())),
            fail_initialise: false,
            fail_at_change: None,
        }
    }

    /// Fails during `initialise`.
    pub fn failing_initialise() -> Self {
        Self {
            fail_initialise: true,
            ..Self::well_behaved()
        }
    }

    /// Fails on the `n`-th `try_random_change` call (1-based, counted
    /// across all clones).
    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_at_change: Some(n),
            ..Self::well_behaved()
        }
    }

    pub fn log(&self) -> Arc<Mutex<CallLog>> {
        Arc::clone(&self.log)
    }
}

impl SolutionExplorer for ScriptedExplorer {
    fn initialise(&mut self) -> Result<(), ExplorerError> {
        self.log.lock().unwrap().initialise_calls += 1;
        if self.fail_initialise {
            return Err(ExplorerError::new("scripted initialise failure"));
        }
        Ok(())
    }

    fn try_random_change(&mut self, temperature: f64) -> Result<(), ExplorerError> {
        let calls = {
            let mut log = self.log.lock().unwrap();
            log.change_calls += 1;
            log.temperatures.push(temperature);
            log.change_calls
        };
        if self.fail_at_change == Some(calls) {
            return Err(ExplorerError::new("scripted perturbation failure"));
        }
        Ok(())
    }

    fn accept_last_change(&mut self) {}

    fn revert_last_change(&mut self) {}

    fn objective_value(&self) -> f64 {
        0.0
    }

    fn clone_explorer(&self) -> Box<dyn SolutionExplorer> {
        Box::new(Self {
            log: Arc::clone(&self.log),
            fail_initialise: self.fail_initialise,
            fail_at_change: self.fail_at_change,
        })
    }

    fn tear_down(&mut self) -> Result<(), ExplorerError> {
        self.log.lock().unwrap().teardown_calls += 1;
        Ok(())
    }

    fn bind_sink(&mut self, _sink: Arc<dyn LogSink>) {
        self.log.lock().unwrap().sink_bindings += 1;
    }
}

/// Observer that records every event it sees.
#[derive(Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<AnnealEvent>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnnealEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().unwrap().iter().map(|e| e.kind).collect()
    }

    /// Iteration numbers of the recorded `FinishedIteration` events.
    pub fn finished_iterations(&self) -> Vec<u64> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == EventKind::FinishedIteration)
            .map(|e| e.annealer.iteration)
            .collect()
    }
}

impl Observer for CollectingObserver {
    fn observe(&self, event: &AnnealEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// In-memory log sink recording `(level, message)` lines.
pub struct MemorySink {
    lines: Mutex<Vec<(LogLevel, String)>>,
    enabled: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            enabled: true,
        }
    }

    /// A sink that reports every level as discarded.
    pub fn disabled() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            enabled: false,
        }
    }

    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().unwrap().clone()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for MemorySink {
    fn write(&self, level: LogLevel, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }

    fn enabled(&self, _level: LogLevel) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::explorer::StepOutcome;

    #[test]
    fn knapsack_revert_restores_objective_exactly() {
        let mut explorer = KnapsackExplorer::small(12.0, 3);
        explorer.initialise().unwrap();

        let mut reverts = 0;
        for _ in 0..500 {
            let before = explorer.objective_value();
            // A cool temperature forces frequent reverts.
            explorer.try_random_change(0.25).unwrap();
            assert_eq!(explorer.record().pending_change, 0.0);
            if explorer.record().last_outcome == Some(StepOutcome::Reverted) {
                reverts += 1;
                assert_eq!(explorer.objective_value(), before);
            }
        }
        assert!(reverts > 0, "expected at least one reverted proposal");
    }

    #[test]
    fn knapsack_records_probability_one_for_improvements() {
        let mut explorer = KnapsackExplorer::small(1_000.0, 5);
        explorer.initialise().unwrap();

        // With unconstrained capacity every first-time toggle adds value,
        // so the opening proposal is an improvement.
        explorer.try_random_change(1.0).unwrap();
        assert_eq!(explorer.record().last_probability, 1.0);
        assert_eq!(explorer.record().last_outcome, Some(StepOutcome::Accepted));
        assert!(explorer.objective_value() < 0.0);
    }

    #[test]
    fn identically_seeded_explorers_take_identical_paths() {
        let mut a = KnapsackExplorer::small(12.0, 42);
        let mut b = KnapsackExplorer::small(12.0, 42);
        a.initialise().unwrap();
        b.initialise().unwrap();

        for _ in 0..200 {
            a.try_random_change(5.0).unwrap();
            b.try_random_change(5.0).unwrap();
            assert_eq!(a.record(), b.record());
            assert_eq!(a.selected(), b.selected());
        }
    }

    #[test]
    fn cloned_explorer_diverges_from_its_origin() {
        let mut original = KnapsackExplorer::small(12.0, 42);
        original.initialise().unwrap();
        let mut clone = original.clone_explorer();

        // Same starting state, independent random sources: over many
        // steps the selections drift apart.
        let mut diverged = false;
        for _ in 0..200 {
            original.try_random_change(5.0).unwrap();
            clone.try_random_change(5.0).unwrap();
            if original.objective_value() != clone.objective_value() {
                diverged = true;
                break;
            }
        }
        assert!(diverged, "clone tracked the origin's random stream");
    }

    #[test]
    fn initialise_restarts_a_seeded_run_reproducibly() {
        let mut explorer = KnapsackExplorer::small(12.0, 9);
        explorer.initialise().unwrap();
        for _ in 0..50 {
            explorer.try_random_change(2.0).unwrap();
        }
        let first_run = explorer.objective_value();

        explorer.initialise().unwrap();
        assert_eq!(explorer.objective_value(), 0.0);
        for _ in 0..50 {
            explorer.try_random_change(2.0).unwrap();
        }
        assert_eq!(explorer.objective_value(), first_run);
    }

    #[test]
    fn empty_knapsack_rejects_perturbation() {
        let mut explorer = KnapsackExplorer::new(vec![], vec![], 1.0, 0);
        explorer.initialise().unwrap();
        let error = explorer.try_random_change(1.0).unwrap_err();
        assert_eq!(error.to_string(), "no items to perturb");
    }
}
