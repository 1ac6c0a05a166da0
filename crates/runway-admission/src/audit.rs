//! Audit capability injected into the admitter.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use runway_core::{ActionRef, ExecutionId};

/// Events written to the audit trail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AuditEvent {
    /// An execution passed admission and was persisted.
    ExecutionScheduled {
        execution_id: ExecutionId,
        action: ActionRef,
        user: Option<String>,
        parent: Option<ExecutionId>,
        start_timestamp: DateTime<Utc>,
    },
}

/// Destination for audit events. Its lifecycle belongs to the host process.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent);
}

/// Writes audit events as `tracing` events on the `audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        match event {
            AuditEvent::ExecutionScheduled {
                execution_id,
                action,
                user,
                parent,
                start_timestamp,
            } => {
                tracing::info!(
                    target: "audit",
                    execution_id = %execution_id,
                    action = %action,
                    user = ?user,
                    parent = ?parent,
                    start_timestamp = %start_timestamp,
                    "Action execution scheduled"
                );
            }
        }
    }
}

/// Keeps audit events in memory, oldest first.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.lock().clone()
    }

    // Poisoning is recovered: recorded events are kept and new ones land.
    fn lock(&self) -> MutexGuard<'_, Vec<AuditEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Audit event lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) {
        self.lock().push(event.clone());
    }
}
