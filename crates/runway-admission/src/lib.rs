//! Execution admission for Runway.
//!
//! Turns a caller's request to run an action into a persisted, scheduled
//! execution record, or rejects it with a typed reason.

pub mod admitter;
pub mod audit;
pub mod catalog;
pub mod context;
pub mod error;
pub mod immutability;
pub mod validator;

pub use admitter::ExecutionAdmitter;
pub use audit::{AuditEvent, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use catalog::{resolve_definitions, MemoryCatalog};
pub use context::ContextResolver;
pub use error::{AdmissionError, ParameterViolation};
pub use immutability::{check_overrides, immutable_parameters};
pub use validator::{parameter_schema, validate_parameters};
