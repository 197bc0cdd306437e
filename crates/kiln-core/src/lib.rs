//! Kiln Core - Contracts and probabilistic machinery for simulated annealing
//!
//! This crate provides the fundamental abstractions for kiln:
//! - The solution-explorer contract implemented by every search strategy
//! - The Metropolis acceptance decision shared by all explorers
//! - Random-source construction and the closed-interval uniform draw
//! - The leveled logging-sink capability observers write through

pub mod error;
pub mod explorer;
pub mod metropolis;
pub mod random;
pub mod sink;

pub use error::ExplorerError;
pub use explorer::{SolutionExplorer, StepOutcome, StepRecord};
pub use metropolis::Decision;
pub use random::ExplorerRng;
pub use sink::{LogLevel, LogSink, NullSink, TracingSink};
