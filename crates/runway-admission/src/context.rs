//! Context inheritance for executions spawned by a parent execution.

use runway_core::config::MissingParentPolicy;
use runway_core::{ExecutionRequest, ExecutionStore};
use tracing::{debug, warn};

use crate::error::AdmissionError;

/// Copies the parent execution's user onto child requests.
///
/// Sub-work started by a workflow may be submitted by a system user; the
/// child runs as whoever started the parent.
#[derive(Debug, Clone, Copy)]
pub struct ContextResolver {
    missing_parent: MissingParentPolicy,
}

impl ContextResolver {
    pub fn new(missing_parent: MissingParentPolicy) -> Self {
        Self { missing_parent }
    }

    /// Overwrite `request.context.user` with the parent's user.
    ///
    /// No-op when the request has no parent. A parent without a user clears
    /// the caller's value.
    pub async fn resolve(
        &self,
        store: &dyn ExecutionStore,
        request: &mut ExecutionRequest,
    ) -> Result<(), AdmissionError> {
        let Some(parent_id) = request.context.parent else {
            return Ok(());
        };

        match store.get_by_id(parent_id).await? {
            Some(parent) => {
                debug!(
                    parent = %parent_id,
                    user = ?parent.context.user,
                    "Inheriting user from parent execution"
                );
                request.context.user = parent.context.user;
                Ok(())
            }
            None => match self.missing_parent {
                MissingParentPolicy::Reject => Err(AdmissionError::ParentNotFound(parent_id)),
                MissingParentPolicy::Ignore => {
                    warn!(parent = %parent_id, "Parent execution not found, context not inherited");
                    Ok(())
                }
            },
        }
    }
}

impl Default for ContextResolver {
    fn default() -> Self {
        Self::new(MissingParentPolicy::default())
    }
}
