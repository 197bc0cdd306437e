//! Observers that format lifecycle events into a logging sink.

use std::fmt;
use std::sync::Arc;

use kiln_core::sink::{LogLevel, LogSink};

use crate::event::{AnnealEvent, EventKind};
use crate::filter::{Filter, PassAll};

/// A capability invoked for every lifecycle event an annealer emits.
///
/// Observers must tolerate being called from whichever thread delivers
/// the event: the annealing thread in sequential mode, a dedicated worker
/// in concurrent mode.
pub trait Observer: Send + Sync {
    fn observe(&self, event: &AnnealEvent);
}

/// Formats events as human-readable messages and forwards them to a
/// logging sink, gated by a filter.
///
/// Formatting is skipped entirely when the filter suppresses the event or
/// the sink discards the configured level.
pub struct MessageObserver {
    sink: Arc<dyn LogSink>,
    level: LogLevel,
    filter: Box<dyn Filter>,
}

impl MessageObserver {
    /// Creates an observer writing at `Info` with no throttling.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            level: LogLevel::Info,
            filter: Box::new(PassAll),
        }
    }

    /// Sets the level messages are written at.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the throttling filter.
    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }
}

impl Observer for MessageObserver {
    fn observe(&self, event: &AnnealEvent) {
        if !self.filter.allows(event) || !self.sink.enabled(self.level) {
            return;
        }
        self.sink.write(self.level, &format_message(event));
    }
}

impl fmt::Debug for MessageObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageObserver")
            .field("level", &self.level)
            .finish()
    }
}

/// Formats events as structured `name=value` pairs and forwards them to a
/// logging sink, gated by a filter.
pub struct AttributeObserver {
    sink: Arc<dyn LogSink>,
    level: LogLevel,
    filter: Box<dyn Filter>,
}

impl AttributeObserver {
    /// Creates an observer writing at `Info` with no throttling.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            level: LogLevel::Info,
            filter: Box::new(PassAll),
        }
    }

    /// Sets the level attribute lines are written at.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the throttling filter.
    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }
}

impl Observer for AttributeObserver {
    fn observe(&self, event: &AnnealEvent) {
        if !self.filter.allows(event) || !self.sink.enabled(self.level) {
            return;
        }
        self.sink.write(self.level, &format_attributes(event));
    }
}

impl fmt::Debug for AttributeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeObserver")
            .field("level", &self.level)
            .finish()
    }
}

fn format_message(event: &AnnealEvent) -> String {
    let annealer = &event.annealer;
    match event.kind {
        EventKind::StartedAnnealing => format!(
            "annealer '{}' started: temperature {:.6e}, cooling factor {}, {} iteration(s)",
            annealer.id, annealer.temperature, annealer.cooling_factor, annealer.max_iterations
        ),
        EventKind::StartedIteration => format!(
            "annealer '{}' iteration {}/{} started",
            annealer.id, annealer.iteration, annealer.max_iterations
        ),
        EventKind::FinishedIteration => format!(
            "annealer '{}' iteration {}/{} finished, temperature {:.6e}",
            annealer.id, annealer.iteration, annealer.max_iterations, annealer.temperature
        ),
        EventKind::FinishedAnnealing => format!(
            "annealer '{}' finished after {} iteration(s), final temperature {:.6e}",
            annealer.id, annealer.iteration, annealer.temperature
        ),
        EventKind::Note => format!(
            "annealer '{}': {}",
            annealer.id,
            event.note.as_deref().unwrap_or("")
        ),
    }
}

fn format_attributes(event: &AnnealEvent) -> String {
    let annealer = &event.annealer;
    let mut pairs = vec![
        format!("event={}", event.kind),
        format!("annealer={}", annealer.id),
        format!("iteration={}", annealer.iteration),
        format!("max_iterations={}", annealer.max_iterations),
        format!("temperature={}", annealer.temperature),
        format!("cooling_factor={}", annealer.cooling_factor),
    ];
    if let Some(note) = &event.note {
        pairs.push(format!("note={note:?}"));
    }
    pairs.join(" ")
}
