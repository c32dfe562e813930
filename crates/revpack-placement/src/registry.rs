//! Strategy registry.
//!
//! Maps strategy names to implementations. The daemon builds one at
//! startup, picks a strategy by name, and hands it to the request loop.

use std::collections::HashMap;

use tracing::info;

use crate::error::{PlacementError, PlacementResult};
use crate::strategy::{PlacementStrategy, ReverseBinpack};

#[derive(Default)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Box<dyn PlacementStrategy>>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in strategy.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .strategies
            .insert(ReverseBinpack::NAME.to_string(), Box::new(ReverseBinpack::new()));
        registry
    }

    pub fn register(&mut self, strategy: Box<dyn PlacementStrategy>) -> PlacementResult<()> {
        let name = strategy.name();
        if self.strategies.contains_key(name) {
            return Err(PlacementError::DuplicateStrategy(name.to_string()));
        }
        self.strategies.insert(name.to_string(), strategy);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> PlacementResult<&dyn PlacementStrategy> {
        self.strategies
            .get(name)
            .map(|s| s.as_ref())
            .ok_or_else(|| PlacementError::UnknownStrategy(name.to_string()))
    }

    /// Remove a strategy from the registry, handing over ownership.
    pub fn take(&mut self, name: &str) -> PlacementResult<Box<dyn PlacementStrategy>> {
        self.strategies
            .remove(name)
            .ok_or_else(|| PlacementError::UnknownStrategy(name.to_string()))
    }

    /// Take a strategy and run its initialization hook.
    pub fn activate(&mut self, name: &str) -> PlacementResult<Box<dyn PlacementStrategy>> {
        let mut strategy = self.take(name)?;
        strategy
            .initialize()
            .map_err(|e| PlacementError::Initialization {
                strategy: name.to_string(),
                reason: e.to_string(),
            })?;
        info!(strategy = name, "placement strategy initialized");
        Ok(strategy)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
