//! Rejection of caller overrides for immutable parameters.
//!
//! An immutable parameter's value comes only from its declared default.
//! A request that supplies one is refused rather than silently trimmed.

use std::collections::BTreeSet;

use runway_core::{ActionDefinition, ParameterMap, RunnerTypeDefinition};

use crate::error::AdmissionError;

/// Names declared immutable by the action or its runner type.
///
/// An action redeclaring a runner parameter does not lift the runner's
/// immutability.
pub fn immutable_parameters(
    action: &ActionDefinition,
    runner: &RunnerTypeDefinition,
) -> BTreeSet<String> {
    action
        .parameters
        .iter()
        .chain(runner.runner_parameters.iter())
        .filter(|(_, decl)| decl.immutable)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Fail with every supplied parameter that is declared immutable.
pub fn check_overrides(
    action: &ActionDefinition,
    runner: &RunnerTypeDefinition,
    parameters: &ParameterMap,
) -> Result<(), AdmissionError> {
    let immutable = immutable_parameters(action, runner);
    let mut overridden: Vec<String> = parameters
        .keys()
        .filter(|name| immutable.contains(*name))
        .cloned()
        .collect();
    overridden.sort();

    if overridden.is_empty() {
        Ok(())
    } else {
        Err(AdmissionError::ImmutableOverride(overridden))
    }
}
