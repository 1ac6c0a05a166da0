//! Execution admission pipeline.
//!
//! Runs context inheritance, action resolution, parameter validation, and
//! the immutability check in that order, then persists the request as a
//! scheduled execution record.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use runway_core::config::AdmissionConfig;
use runway_core::error::RunwayError;
use runway_core::{
    ActionCatalog, ExecutionRecord, ExecutionRequest, ExecutionStatus, ExecutionStore,
};

use crate::audit::{AuditEvent, AuditSink};
use crate::catalog::resolve_definitions;
use crate::context::ContextResolver;
use crate::error::AdmissionError;
use crate::immutability::check_overrides;
use crate::validator::validate_parameters;

/// Admits execution requests into the store as `scheduled` records.
///
/// Holds no per-request state; one admitter serves concurrent callers.
pub struct ExecutionAdmitter {
    catalog: Arc<dyn ActionCatalog>,
    store: Arc<dyn ExecutionStore>,
    audit: Arc<dyn AuditSink>,
    context: ContextResolver,
    config: AdmissionConfig,
}

impl ExecutionAdmitter {
    /// Create a new admitter over the given collaborators and config.
    pub fn new(
        catalog: Arc<dyn ActionCatalog>,
        store: Arc<dyn ExecutionStore>,
        audit: Arc<dyn AuditSink>,
        config: AdmissionConfig,
    ) -> Self {
        Self {
            catalog,
            store,
            audit,
            context: ContextResolver::new(config.missing_parent),
            config,
        }
    }

    /// Validate `request` and persist it as a scheduled execution.
    ///
    /// Either the record is fully admitted and persisted, or nothing is
    /// written and the rejection is returned.
    pub async fn schedule(
        &self,
        request: ExecutionRequest,
    ) -> Result<ExecutionRecord, AdmissionError> {
        let reference = request.action.clone();
        match self.admit(request).await {
            Ok(record) => Ok(record),
            Err(e) => {
                info!(action = %reference, error = %e, "Execution request rejected");
                Err(e)
            }
        }
    }

    async fn admit(&self, mut request: ExecutionRequest) -> Result<ExecutionRecord, AdmissionError> {
        self.context
            .resolve(self.store.as_ref(), &mut request)
            .await?;

        let (action, runner_type) =
            resolve_definitions(self.catalog.as_ref(), &request.action).await?;

        validate_parameters(&action, &runner_type, &request.parameters)?;
        check_overrides(&action, &runner_type, &request.parameters)?;

        let record = ExecutionRecord {
            id: None,
            revision: 0,
            action,
            runner_type,
            parameters: request.parameters,
            context: request.context,
            status: ExecutionStatus::Scheduled,
            start_timestamp: Utc::now(),
        };
        debug!(action = %request.action, "Admission checks passed, persisting");

        let persisted = self.store.create_or_update(record).await?;
        let execution_id = persisted.id.ok_or_else(|| {
            RunwayError::Storage("Store returned execution record without an id".to_string())
        })?;

        if self.config.audit {
            self.audit.record(&AuditEvent::ExecutionScheduled {
                execution_id,
                action: persisted.action.reference(),
                user: persisted.context.user.clone(),
                parent: persisted.context.parent,
                start_timestamp: persisted.start_timestamp,
            });
        }
        info!(
            execution_id = %execution_id,
            action = %request.action,
            "Action execution scheduled"
        );

        Ok(persisted)
    }
}
