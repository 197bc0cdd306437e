//! Event fan-out to registered observers.
//!
//! Two delivery modes, selected at configuration time:
//!
//! - **Sequential**: observers are invoked inline in registration order;
//!   the annealing loop blocks until every observer has handled the
//!   current event, giving strict global ordering across observers.
//! - **Concurrent**: each observer owns a bounded queue drained by a
//!   dedicated worker thread. The annealing loop is decoupled from
//!   observer processing time; ordering is guaranteed only within one
//!   observer's stream, and a full queue blocks the sender (backpressure,
//!   never dropping).

use std::fmt;
use std::sync::mpsc::{sync_channel, SyncSender};
use std::sync::Arc;
use std::thread::JoinHandle;

use kiln_config::NotifierMode;

use crate::event::AnnealEvent;
use crate::observe::Observer;

/// Queue bound for each concurrent observer lane.
const LANE_CAPACITY: usize = 64;

/// Fans lifecycle events out to registered observers.
///
/// The observer list is append-only for the lifetime of the notifier.
/// Dropping the notifier closes every lane and joins its worker, so all
/// queued events are delivered before the owning annealer is gone.
pub struct EventNotifier {
    mode: NotifierMode,
    observers: Vec<Arc<dyn Observer>>,
    lanes: Vec<ObserverLane>,
}

/// One observer's queue and the worker draining it in FIFO order.
struct ObserverLane {
    tx: SyncSender<AnnealEvent>,
    worker: JoinHandle<()>,
}

impl EventNotifier {
    pub fn new(mode: NotifierMode) -> Self {
        Self {
            mode,
            observers: Vec::new(),
            lanes: Vec::new(),
        }
    }

    pub fn sequential() -> Self {
        Self::new(NotifierMode::Sequential)
    }

    pub fn concurrent() -> Self {
        Self::new(NotifierMode::Concurrent)
    }

    pub fn mode(&self) -> NotifierMode {
        self.mode
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Registers an observer; in concurrent mode its worker starts
    /// immediately.
    pub fn add_observer(&mut self, observer: Arc<dyn Observer>) {
        if self.mode == NotifierMode::Concurrent {
            self.lanes.push(spawn_lane(Arc::clone(&observer)));
        }
        self.observers.push(observer);
    }

    /// Delivers one event to every observer.
    pub fn notify(&self, event: &AnnealEvent) {
        match self.mode {
            NotifierMode::Sequential => {
                for observer in &self.observers {
                    observer.observe(event);
                }
            }
            NotifierMode::Concurrent => {
                for lane in &self.lanes {
                    // A send fails only once the worker has exited.
                    let _ = lane.tx.send(event.clone());
                }
            }
        }
    }

    /// Creates a fresh notifier with the same mode and observers but its
    /// own lanes and workers. Used when cloning an annealer.
    pub fn duplicate(&self) -> Self {
        let mut copy = Self::new(self.mode);
        for observer in &self.observers {
            copy.add_observer(Arc::clone(observer));
        }
        copy
    }
}

fn spawn_lane(observer: Arc<dyn Observer>) -> ObserverLane {
    let (tx, rx) = sync_channel::<AnnealEvent>(LANE_CAPACITY);
    let worker = std::thread::spawn(move || {
        while let Ok(event) = rx.recv() {
            observer.observe(&event);
        }
    });
    ObserverLane { tx, worker }
}

impl Drop for EventNotifier {
    fn drop(&mut self) {
        for lane in self.lanes.drain(..) {
            drop(lane.tx);
            let _ = lane.worker.join();
        }
    }
}

impl fmt::Debug for EventNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventNotifier")
            .field("mode", &self.mode)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
