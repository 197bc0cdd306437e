//! Name-keyed registration of solution-explorer constructors.
//!
//! The extension point domain crates use to plug strategies into the
//! engine: register a `(type name, constructor)` pair, then reference the
//! name from an [`kiln_config::ExplorerConfig`].

use std::collections::HashMap;
use std::fmt;

use kiln_config::ParamValue;
use kiln_core::explorer::SolutionExplorer;

use crate::error::EngineError;

/// Parameter map handed to an explorer factory.
pub type ExplorerParams = HashMap<String, ParamValue>;

/// Constructor registered for one explorer type name.
pub type ExplorerFactory =
    Box<dyn Fn(&ExplorerParams) -> Result<Box<dyn SolutionExplorer>, EngineError> + Send + Sync>;

/// Registry mapping explorer type names to constructors.
#[derive(Default)]
pub struct ExplorerRegistry {
    factories: HashMap<String, ExplorerFactory>,
}

impl ExplorerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ExplorerParams) -> Result<Box<dyn SolutionExplorer>, EngineError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Constructs an explorer of the named type from the parameter map.
    ///
    /// # Errors
    ///
    /// `UnknownExplorer` when nothing is registered under `name`; whatever
    /// the factory returns when the parameters are rejected.
    pub fn create(
        &self,
        name: &str,
        params: &ExplorerParams,
    ) -> Result<Box<dyn SolutionExplorer>, EngineError> {
        match self.factories.get(name) {
            Some(factory) => factory(params),
            None => Err(EngineError::UnknownExplorer {
                name: name.to_string(),
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered type names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for ExplorerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplorerRegistry")
            .field("factories", &self.factories.len())
            .finish()
    }
}

/// Reads a required float parameter, widening integers.
pub fn param_f64(params: &ExplorerParams, name: &str) -> Result<f64, EngineError> {
    params
        .get(name)
        .and_then(ParamValue::as_f64)
        .ok_or_else(|| EngineError::Parameter {
            name: name.to_string(),
            reason: "expected a number".to_string(),
        })
}

/// Reads a required non-negative integer parameter.
pub fn param_u64(params: &ExplorerParams, name: &str) -> Result<u64, EngineError> {
    params
        .get(name)
        .and_then(ParamValue::as_u64)
        .ok_or_else(|| EngineError::Parameter {
            name: name.to_string(),
            reason: "expected a non-negative integer".to_string(),
        })
}
