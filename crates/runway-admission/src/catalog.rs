//! Action and runner type resolution.
//!
//! `resolve_definitions` is the catalog step of admission. `MemoryCatalog`
//! is an `ActionCatalog` for embedding and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use runway_core::error::{Result, RunwayError};
use runway_core::{ActionCatalog, ActionDefinition, ActionRef, RunnerTypeDefinition};

use crate::error::AdmissionError;

/// Resolve an action reference to its definition and runner type.
///
/// Rejects unknown and disabled actions, and actions whose runner type the
/// catalog does not know.
pub async fn resolve_definitions(
    catalog: &dyn ActionCatalog,
    reference: &ActionRef,
) -> std::result::Result<(ActionDefinition, RunnerTypeDefinition), AdmissionError> {
    let action = catalog
        .resolve_action(reference)
        .await?
        .ok_or_else(|| AdmissionError::ActionNotFound(reference.clone()))?;

    if !action.enabled {
        return Err(AdmissionError::ActionDisabled(reference.clone()));
    }

    let runner = catalog
        .resolve_runner_type(&action.runner_type)
        .await?
        .ok_or_else(|| AdmissionError::RunnerTypeNotFound {
            action: reference.clone(),
            runner_type: action.runner_type.clone(),
        })?;

    debug!(action = %reference, runner_type = %runner.name, "Action resolved");
    Ok((action, runner))
}

/// In-memory registry of action and runner type definitions.
pub struct MemoryCatalog {
    actions: RwLock<HashMap<ActionRef, ActionDefinition>>,
    runner_types: RwLock<HashMap<String, RunnerTypeDefinition>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            actions: RwLock::new(HashMap::new()),
            runner_types: RwLock::new(HashMap::new()),
        }
    }

    /// Register (or replace) an action definition.
    pub fn register_action(&self, action: ActionDefinition) -> Result<()> {
        let mut actions = self
            .actions
            .write()
            .map_err(|e| RunwayError::Catalog(format!("Lock poisoned: {}", e)))?;
        actions.insert(action.reference(), action);
        Ok(())
    }

    /// Register (or replace) a runner type definition.
    pub fn register_runner_type(&self, runner: RunnerTypeDefinition) -> Result<()> {
        let mut runner_types = self
            .runner_types
            .write()
            .map_err(|e| RunwayError::Catalog(format!("Lock poisoned: {}", e)))?;
        runner_types.insert(runner.name.clone(), runner);
        Ok(())
    }

    /// Remove an action, returning its definition if it was registered.
    pub fn remove_action(&self, reference: &ActionRef) -> Result<Option<ActionDefinition>> {
        let mut actions = self
            .actions
            .write()
            .map_err(|e| RunwayError::Catalog(format!("Lock poisoned: {}", e)))?;
        Ok(actions.remove(reference))
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionCatalog for MemoryCatalog {
    async fn resolve_action(&self, reference: &ActionRef) -> Result<Option<ActionDefinition>> {
        let actions = self
            .actions
            .read()
            .map_err(|e| RunwayError::Catalog(format!("Lock poisoned: {}", e)))?;
        Ok(actions.get(reference).cloned())
    }

    async fn resolve_runner_type(&self, name: &str) -> Result<Option<RunnerTypeDefinition>> {
        let runner_types = self
            .runner_types
            .read()
            .map_err(|e| RunwayError::Catalog(format!("Lock poisoned: {}", e)))?;
        Ok(runner_types.get(name).cloned())
    }
}
