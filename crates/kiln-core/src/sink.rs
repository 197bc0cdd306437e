//! The logging-sink capability observers and explorers write through.

use std::fmt::Debug;

/// Severity levels understood by a [`LogSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Leveled write capability with a cheap discard query.
///
/// Callers check [`LogSink::enabled`] before formatting so suppressed
/// levels cost nothing. Implementations must tolerate concurrent writes:
/// the sink is the one resource deliberately shared between concurrent
/// scenario runs, and it serializes at its own write boundary.
pub trait LogSink: Send + Sync {
    /// Writes one message at the given level.
    fn write(&self, level: LogLevel, message: &str);

    /// Returns true when messages at this level are currently recorded.
    fn enabled(&self, level: LogLevel) -> bool;
}

/// Sink that forwards to the `tracing` ecosystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => tracing::error!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Trace => tracing::trace!("{message}"),
        }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Error => tracing::enabled!(tracing::Level::ERROR),
            LogLevel::Warn => tracing::enabled!(tracing::Level::WARN),
            LogLevel::Info => tracing::enabled!(tracing::Level::INFO),
            LogLevel::Debug => tracing::enabled!(tracing::Level::DEBUG),
            LogLevel::Trace => tracing::enabled!(tracing::Level::TRACE),
        }
    }
}

/// Sink that discards everything.
///
/// The documented fallback when no sink was supplied to a builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn write(&self, _level: LogLevel, _message: &str) {}

    fn enabled(&self, _level: LogLevel) -> bool {
        false
    }
}
