//! Kiln - A Simulated-Annealing Optimization Engine in Rust
//!
//! Implement [`SolutionExplorer`] for your problem, register it, and drive
//! it through a configured [`Annealer`] or a multi-run [`ScenarioRunner`].
//!
//! # Example
//!
//! ```
//! use kiln::prelude::*;
//!
//! let failure = AnnealerBuilder::new()
//!     .temperature(-1.0)
//!     .build()
//!     .unwrap_err();
//! // Every problem from one build attempt is reported together.
//! assert!(failure.errors().len() >= 2);
//! ```

pub mod logging;

// Explorer contract and probabilistic machinery
pub use kiln_core::explorer::{SolutionExplorer, StepOutcome, StepRecord};
pub use kiln_core::metropolis::{self, Decision};
pub use kiln_core::random::{self, ExplorerRng};
pub use kiln_core::sink::{LogLevel, LogSink, NullSink, TracingSink};
pub use kiln_core::ExplorerError;

// Configuration records
pub use kiln_config::{
    AnnealerConfig, ConfigError, ExplorerConfig, NotifierMode, ParamValue, ScenarioConfig,
};

// Engine surface
pub use kiln_engine::{
    AnnealEvent, Annealer, AnnealerBuilder, AnnealerSnapshot, AttributeObserver, BuildFailure,
    CountFilter, ElapsedTimeFilter, EngineError, EventKind, EventNotifier, ExecutionMode,
    ExplorerParams, ExplorerRegistry, Filter, LifecycleState, MessageObserver, Observer, PassAll,
    PercentileFilter, ScenarioReport, ScenarioRunner, ValidationError, ValidationErrors,
};

pub mod prelude {
    pub use super::{
        AnnealerBuilder, AnnealerConfig, EventKind, ExecutionMode, ExplorerRegistry, LogSink,
        MessageObserver, NotifierMode, Observer, ScenarioRunner, SolutionExplorer, TracingSink,
    };
}
