//! Execution requests, admitted records, and the store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{ActionDefinition, RunnerTypeDefinition};
use crate::error::Result;
use crate::types::{ActionRef, ExecutionId, ExecutionStatus, ParameterMap};

/// Caller and lineage context attached to an execution.
///
/// `user` and `parent` are the keys Runway interprets. Anything else a
/// caller attaches is preserved in `extra` and flattened on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ExecutionId>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ExecutionContext {
    pub fn for_user(user: &str) -> Self {
        Self {
            user: Some(user.to_string()),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: ExecutionId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// A caller's request to run an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub action: ActionRef,
    #[serde(default)]
    pub parameters: ParameterMap,
    #[serde(default)]
    pub context: ExecutionContext,
}

impl ExecutionRequest {
    pub fn new(action: ActionRef) -> Self {
        Self {
            action,
            parameters: ParameterMap::new(),
            context: ExecutionContext::default(),
        }
    }

    pub fn with_parameter(mut self, name: &str, value: serde_json::Value) -> Self {
        self.parameters.insert(name.to_string(), value);
        self
    }

    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = context;
        self
    }
}

/// The persisted form of an admitted execution.
///
/// `id` is `None` and `revision` is 0 until a store has written the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: Option<ExecutionId>,
    pub revision: u64,
    pub action: ActionDefinition,
    pub runner_type: RunnerTypeDefinition,
    pub parameters: ParameterMap,
    pub context: ExecutionContext,
    pub status: ExecutionStatus,
    pub start_timestamp: DateTime<Utc>,
}

/// Durable record store for executions.
///
/// `create_or_update` must be atomic per record: a concurrent reader sees
/// either the previous revision or the new one, never a mix.
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    async fn get_by_id(&self, id: ExecutionId) -> Result<Option<ExecutionRecord>>;

    /// Persist a record, assigning an id when it has none and bumping the
    /// revision. Returns the stored form.
    async fn create_or_update(&self, record: ExecutionRecord) -> Result<ExecutionRecord>;

    /// Records in `status`, oldest `start_timestamp` first.
    async fn list_by_status(
        &self,
        status: ExecutionStatus,
        limit: usize,
    ) -> Result<Vec<ExecutionRecord>>;

    async fn count(&self) -> Result<u64>;
}
