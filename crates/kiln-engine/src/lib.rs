//! Kiln Annealing Engine
//!
//! This crate provides the simulated-annealing engine implementation:
//! - Annealer state machine and core loop
//! - Fluent builder with aggregated validation
//! - Lifecycle events and the synchronous/concurrent notifier
//! - Observers and throttling filters
//! - Explorer registry (configuration wiring)
//! - Scenario runner for sequential or concurrent multi-run batches

pub mod annealer;
pub mod builder;
pub mod error;
pub mod event;
pub mod filter;
pub mod notify;
pub mod observe;
pub mod registry;
pub mod runner;

#[cfg(test)]
pub mod test_utils;

pub use annealer::{Annealer, LifecycleState};
pub use builder::{AnnealerBuilder, BuildFailure};
pub use error::{EngineError, ValidationError, ValidationErrors};
pub use event::{AnnealEvent, AnnealerSnapshot, EventKind};
pub use filter::{CountFilter, ElapsedTimeFilter, Filter, PassAll, PercentileFilter};
pub use notify::EventNotifier;
pub use observe::{AttributeObserver, MessageObserver, Observer};
pub use registry::{ExplorerFactory, ExplorerParams, ExplorerRegistry};
pub use runner::{ExecutionMode, ScenarioReport, ScenarioRunner};
