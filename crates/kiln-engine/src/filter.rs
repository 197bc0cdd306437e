//! Throttling policies that bound observer output volume.
//!
//! A filter decides, per event, whether an observer lets it through. Every
//! filter passes non-iteration events unmodified; only `StartedIteration`
//! and `FinishedIteration` are ever suppressed.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::event::{AnnealEvent, EventKind};

/// Per-event suppression policy.
pub trait Filter: Send + Sync {
    /// Returns true when the event should be let through.
    fn allows(&self, event: &AnnealEvent) -> bool;
}

/// Lets every event through.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassAll;

impl Filter for PassAll {
    fn allows(&self, _event: &AnnealEvent) -> bool {
        true
    }
}

/// Passes `FinishedIteration` on every `modulo`-th iteration, plus the
/// first and last iterations; suppresses every `StartedIteration`.
#[derive(Debug, Clone)]
pub struct CountFilter {
    modulo: u64,
}

impl CountFilter {
    /// Creates a filter reporting every `modulo`-th iteration. A modulo of
    /// zero is treated as one.
    pub fn new(modulo: u64) -> Self {
        Self {
            modulo: modulo.max(1),
        }
    }
}

impl Filter for CountFilter {
    fn allows(&self, event: &AnnealEvent) -> bool {
        match event.kind {
            EventKind::StartedIteration => false,
            EventKind::FinishedIteration => {
                let iteration = event.annealer.iteration;
                iteration == 1
                    || iteration == event.annealer.max_iterations
                    || iteration % self.modulo == 0
            }
            _ => true,
        }
    }
}

/// Passes `FinishedIteration` when the wall-clock time since the last
/// event it allowed exceeds the configured wait, plus the first and last
/// iterations; suppresses every `StartedIteration`.
///
/// The marker advances in whole `wait` increments rather than to the
/// current instant, so the reporting cadence does not drift.
pub struct ElapsedTimeFilter {
    wait: Duration,
    last_allowed: Mutex<Option<Instant>>,
}

impl ElapsedTimeFilter {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            last_allowed: Mutex::new(None),
        }
    }
}

impl Filter for ElapsedTimeFilter {
    fn allows(&self, event: &AnnealEvent) -> bool {
        match event.kind {
            EventKind::StartedIteration => false,
            EventKind::FinishedIteration => {
                let iteration = event.annealer.iteration;
                let now = Instant::now();
                let mut marker = self.last_allowed.lock().unwrap();
                if iteration == 1 || iteration == event.annealer.max_iterations {
                    marker.get_or_insert(now);
                    return true;
                }
                match *marker {
                    None => {
                        *marker = Some(now);
                        true
                    }
                    Some(mark) => {
                        let elapsed = now.duration_since(mark);
                        if elapsed > self.wait {
                            let increments =
                                (elapsed.as_nanos() / self.wait.as_nanos().max(1)) as u32;
                            *marker = Some(mark + self.wait * increments);
                            true
                        } else {
                            false
                        }
                    }
                }
            }
            _ => true,
        }
    }
}

/// Passes `FinishedIteration` on boundaries derived from a percentage of
/// the run length: `modulo = floor(max_iterations * clamp(p, 0, 100) /
/// 100)`, with `p == 100` collapsing the modulo to 1 (report every
/// iteration). With `max_iterations == 0`, `p == 0`, or a derived modulo
/// of zero, no iteration event passes at all.
#[derive(Debug, Clone)]
pub struct PercentileFilter {
    percentile: f64,
}

impl PercentileFilter {
    pub fn new(percentile: f64) -> Self {
        Self {
            percentile: percentile.clamp(0.0, 100.0),
        }
    }

    fn modulo_for(&self, max_iterations: u64) -> u64 {
        if self.percentile == 100.0 {
            return 1;
        }
        (max_iterations as f64 * self.percentile / 100.0).floor() as u64
    }
}

impl Filter for PercentileFilter {
    fn allows(&self, event: &AnnealEvent) -> bool {
        match event.kind {
            EventKind::StartedIteration => false,
            EventKind::FinishedIteration => {
                let max_iterations = event.annealer.max_iterations;
                if max_iterations == 0 {
                    return false;
                }
                let modulo = self.modulo_for(max_iterations);
                if modulo == 0 {
                    return false;
                }
                event.annealer.iteration % modulo == 0
            }
            _ => true,
        }
    }
}
