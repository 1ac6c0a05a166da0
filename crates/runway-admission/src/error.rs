//! Error types for the admission pipeline.

use std::fmt;

use runway_core::error::RunwayError;
use runway_core::{ActionRef, ExecutionId};
use serde::{Deserialize, Serialize};

/// One schema violation found in a request's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterViolation {
    /// JSON pointer into the parameter map; empty for the map itself.
    pub path: String,
    /// JSON pointer to the schema keyword that failed.
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for ParameterViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

fn join_violations(violations: &[ParameterViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Reasons an execution request is refused admission.
///
/// None of these are retried; the caller of `schedule` receives them as-is.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("Action \"{0}\" cannot be found")]
    ActionNotFound(ActionRef),
    #[error("Unable to execute. Action \"{0}\" is disabled")]
    ActionDisabled(ActionRef),
    #[error("Runner type \"{runner_type}\" for action \"{action}\" cannot be found")]
    RunnerTypeNotFound {
        action: ActionRef,
        runner_type: String,
    },
    #[error("Parent execution {0} cannot be found")]
    ParentNotFound(ExecutionId),
    #[error("Invalid parameters for action \"{action}\": {}", join_violations(.violations))]
    ParameterValidation {
        action: ActionRef,
        violations: Vec<ParameterViolation>,
    },
    #[error("Parameter schema for action \"{action}\" is invalid: {message}")]
    InvalidParameterSchema { action: ActionRef, message: String },
    #[error("Override of immutable parameter(s) {} is unsupported", .0.join(", "))]
    ImmutableOverride(Vec<String>),
    #[error("Backend error: {0}")]
    Backend(#[from] RunwayError),
}
