//! In-memory `ExecutionStore`.

use std::sync::Mutex;

use async_trait::async_trait;

use runway_core::error::{Result, RunwayError};
use runway_core::{ExecutionId, ExecutionRecord, ExecutionStatus, ExecutionStore};

/// Execution store keeping records in a mutex-guarded vector.
pub struct MemoryExecutionStore {
    records: Mutex<Vec<ExecutionRecord>>,
}

impl MemoryExecutionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<ExecutionRecord>>> {
        self.records
            .lock()
            .map_err(|e| RunwayError::Storage(format!("Lock poisoned: {}", e)))
    }
}

impl Default for MemoryExecutionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionStore for MemoryExecutionStore {
    async fn get_by_id(&self, id: ExecutionId) -> Result<Option<ExecutionRecord>> {
        let records = self.lock()?;
        Ok(records.iter().find(|r| r.id == Some(id)).cloned())
    }

    async fn create_or_update(&self, record: ExecutionRecord) -> Result<ExecutionRecord> {
        let id = record.id.unwrap_or_default();
        let mut records = self.lock()?;

        match records.iter_mut().find(|r| r.id == Some(id)) {
            Some(existing) => {
                let stored = ExecutionRecord {
                    id: Some(id),
                    revision: existing.revision + 1,
                    ..record
                };
                *existing = stored.clone();
                Ok(stored)
            }
            None => {
                let stored = ExecutionRecord {
                    id: Some(id),
                    revision: 1,
                    ..record
                };
                records.push(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn list_by_status(
        &self,
        status: ExecutionStatus,
        limit: usize,
    ) -> Result<Vec<ExecutionRecord>> {
        let records = self.lock()?;
        let mut matching: Vec<ExecutionRecord> = records
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect();

        matching.sort_by(|a, b| a.start_timestamp.cmp(&b.start_timestamp));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.lock()?.len() as u64)
    }
}
