//! Shared types, contracts, configuration, and errors for Runway.
//!
//! Everything the admission pipeline and its storage backends agree on
//! lives here: action and runner definitions, execution requests and
//! records, and the `ActionCatalog` / `ExecutionStore` collaborator traits.

pub mod action;
pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod types;

pub use action::{ActionCatalog, ActionDefinition, ParameterDecl, RunnerTypeDefinition};
pub use config::RunwayConfig;
pub use error::{Result, RunwayError};
pub use execution::{ExecutionContext, ExecutionRecord, ExecutionRequest, ExecutionStore};
pub use types::*;
