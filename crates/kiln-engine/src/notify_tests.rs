use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::event::{AnnealerSnapshot, EventKind};
use crate::test_utils::CollectingObserver;

fn event(kind: EventKind, iteration: u64) -> AnnealEvent {
    AnnealEvent::new(
        kind,
        AnnealerSnapshot {
            id: "notify-test".to_string(),
            temperature: 1.0,
            cooling_factor: 1.0,
            max_iterations: 100,
            iteration,
        },
    )
}

/// Observer that records which of the two observers saw each event first,
/// for the sequential global-ordering test.
struct OrderTracker {
    label: &'static str,
    order: Arc<Mutex<Vec<&'static str>>>,
}

impl Observer for OrderTracker {
    fn observe(&self, _event: &AnnealEvent) {
        self.order.lock().unwrap().push(self.label);
    }
}

/// Observer that stalls, to exercise queue backpressure and drain-on-drop.
struct SlowObserver {
    delay: Duration,
    seen: AtomicUsize,
}

impl Observer for SlowObserver {
    fn observe(&self, _event: &AnnealEvent) {
        std::thread::sleep(self.delay);
        self.seen.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn sequential_notifier_invokes_in_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut notifier = EventNotifier::sequential();
    notifier.add_observer(Arc::new(OrderTracker {
        label: "first",
        order: order.clone(),
    }));
    notifier.add_observer(Arc::new(OrderTracker {
        label: "second",
        order: order.clone(),
    }));

    notifier.notify(&event(EventKind::StartedAnnealing, 0));
    notifier.notify(&event(EventKind::FinishedAnnealing, 0));

    assert_eq!(
        *order.lock().unwrap(),
        vec!["first", "second", "first", "second"]
    );
}

#[test]
fn sequential_notifier_blocks_until_observers_finish() {
    let slow = Arc::new(SlowObserver {
        delay: Duration::from_millis(10),
        seen: AtomicUsize::new(0),
    });
    let mut notifier = EventNotifier::sequential();
    notifier.add_observer(slow.clone());

    notifier.notify(&event(EventKind::Note, 0));
    // Inline delivery: the call returned, so the observer has finished.
    assert_eq!(slow.seen.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_notifier_delivers_every_event_once_in_order() {
    let observers: Vec<Arc<CollectingObserver>> = (0..3)
        .map(|_| Arc::new(CollectingObserver::new()))
        .collect();

    let mut notifier = EventNotifier::concurrent();
    for observer in &observers {
        notifier.add_observer(observer.clone());
    }

    let emitted: Vec<AnnealEvent> = (1..=50)
        .map(|i| event(EventKind::FinishedIteration, i))
        .collect();
    for e in &emitted {
        notifier.notify(e);
    }

    // Dropping closes the lanes and joins the workers.
    drop(notifier);

    for observer in &observers {
        assert_eq!(observer.events(), emitted);
    }
}

#[test]
fn concurrent_notifier_with_slow_observer_loses_nothing() {
    let slow = Arc::new(SlowObserver {
        delay: Duration::from_millis(1),
        seen: AtomicUsize::new(0),
    });
    let fast = Arc::new(CollectingObserver::new());

    let mut notifier = EventNotifier::concurrent();
    notifier.add_observer(slow.clone());
    notifier.add_observer(fast.clone());

    // More events than one lane's capacity: the sender blocks on the full
    // queue rather than dropping.
    for i in 1..=(LANE_CAPACITY as u64 + 40) {
        notifier.notify(&event(EventKind::FinishedIteration, i));
    }
    drop(notifier);

    assert_eq!(slow.seen.load(Ordering::SeqCst), LANE_CAPACITY + 40);
    assert_eq!(fast.events().len(), LANE_CAPACITY + 40);
}

#[test]
fn duplicate_shares_observers_but_not_lanes() {
    let observer = Arc::new(CollectingObserver::new());
    let mut original = EventNotifier::concurrent();
    original.add_observer(observer.clone());

    let duplicate = original.duplicate();
    assert_eq!(duplicate.mode(), NotifierMode::Concurrent);
    assert_eq!(duplicate.observer_count(), 1);

    original.notify(&event(EventKind::Note, 1));
    duplicate.notify(&event(EventKind::Note, 2));
    drop(original);
    drop(duplicate);

    // Both notifiers delivered to the same shared observer.
    let iterations: Vec<u64> = observer
        .events()
        .iter()
        .map(|e| e.annealer.iteration)
        .collect();
    assert_eq!(iterations.len(), 2);
    assert!(iterations.contains(&1));
    assert!(iterations.contains(&2));
}

#[test]
fn observer_list_is_append_only_and_counted() {
    let mut notifier = EventNotifier::sequential();
    assert_eq!(notifier.observer_count(), 0);
    notifier.add_observer(Arc::new(CollectingObserver::new()));
    notifier.add_observer(Arc::new(CollectingObserver::new()));
    assert_eq!(notifier.observer_count(), 2);
}
