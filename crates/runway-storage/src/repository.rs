//! SQLite-backed `ExecutionStore`.
//!
//! Definitions, parameters, and context are stored as JSON text columns;
//! user, parent, and status are lifted into their own columns for querying.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::OptionalExtension;
use tracing::debug;

use runway_core::error::{Result, RunwayError};
use runway_core::{ExecutionId, ExecutionRecord, ExecutionStatus, ExecutionStore};

use crate::db::Database;

const SELECT_COLUMNS: &str = "SELECT id, revision, action, runner_type, parameters, context, status, start_timestamp
     FROM executions";

/// Execution store persisting records in the `executions` table.
pub struct SqliteExecutionStore {
    db: Arc<Database>,
}

impl SqliteExecutionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ExecutionStore for SqliteExecutionStore {
    async fn get_by_id(&self, id: ExecutionId) -> Result<Option<ExecutionRecord>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
                .map_err(|e| RunwayError::Storage(e.to_string()))?;

            let result = stmt
                .query_row(rusqlite::params![id.to_string()], |row| {
                    Ok(row_to_record(row))
                })
                .optional()
                .map_err(|e| RunwayError::Storage(e.to_string()))?;

            match result {
                Some(record) => Ok(Some(record?)),
                None => Ok(None),
            }
        })
    }

    async fn create_or_update(&self, record: ExecutionRecord) -> Result<ExecutionRecord> {
        let id = record.id.unwrap_or_default();
        let action_json = serde_json::to_string(&record.action)?;
        let runner_json = serde_json::to_string(&record.runner_type)?;
        let parameters_json = serde_json::to_string(&record.parameters)?;
        let context_json = serde_json::to_string(&record.context)?;
        let parent = record.context.parent.map(|p| p.to_string());
        let start = format_timestamp(&record.start_timestamp);

        let revision: i64 = self.db.with_conn(|conn| {
            conn.query_row(
                "INSERT INTO executions (id, revision, action_ref, action, runner_type, parameters,
                                         context, user, parent_id, status, start_timestamp)
                 VALUES (?1, 1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT (id) DO UPDATE SET
                     revision = executions.revision + 1,
                     action_ref = excluded.action_ref,
                     action = excluded.action,
                     runner_type = excluded.runner_type,
                     parameters = excluded.parameters,
                     context = excluded.context,
                     user = excluded.user,
                     parent_id = excluded.parent_id,
                     status = excluded.status,
                     start_timestamp = excluded.start_timestamp,
                     updated_at = strftime('%s', 'now')
                 RETURNING revision",
                rusqlite::params![
                    id.to_string(),
                    record.action.reference().to_string(),
                    action_json,
                    runner_json,
                    parameters_json,
                    context_json,
                    record.context.user,
                    parent,
                    record.status.to_string(),
                    start,
                ],
                |row| row.get(0),
            )
            .map_err(|e| RunwayError::Storage(format!("Failed to save execution: {}", e)))
        })?;

        debug!(execution_id = %id, revision, "Execution record written");

        Ok(ExecutionRecord {
            id: Some(id),
            revision: revision as u64,
            ..record
        })
    }

    async fn list_by_status(
        &self,
        status: ExecutionStatus,
        limit: usize,
    ) -> Result<Vec<ExecutionRecord>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "{} WHERE status = ?1 ORDER BY start_timestamp ASC LIMIT ?2",
                    SELECT_COLUMNS
                ))
                .map_err(|e| RunwayError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(
                    rusqlite::params![status.to_string(), limit as i64],
                    |row| Ok(row_to_record(row)),
                )
                .map_err(|e| RunwayError::Storage(e.to_string()))?;

            let mut records = Vec::new();
            for row in rows {
                let record = row.map_err(|e| RunwayError::Storage(e.to_string()))??;
                records.push(record);
            }
            Ok(records)
        })
    }

    async fn count(&self) -> Result<u64> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM executions", [], |row| row.get(0))
                .map_err(|e| RunwayError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

// ============================================================================
// Helper functions for row-to-entity conversion.
// ============================================================================

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn json_column<T: serde::de::DeserializeOwned>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    column: &str,
) -> Result<T> {
    let text: String = row
        .get(idx)
        .map_err(|e| RunwayError::Storage(e.to_string()))?;
    serde_json::from_str(&text)
        .map_err(|e| RunwayError::Storage(format!("Corrupt {} column: {}", column, e)))
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<ExecutionRecord> {
    let id_str: String = row
        .get(0)
        .map_err(|e| RunwayError::Storage(e.to_string()))?;
    let revision: i64 = row
        .get(1)
        .map_err(|e| RunwayError::Storage(e.to_string()))?;
    let status_str: String = row
        .get(6)
        .map_err(|e| RunwayError::Storage(e.to_string()))?;
    let start_str: String = row
        .get(7)
        .map_err(|e| RunwayError::Storage(e.to_string()))?;

    let id: ExecutionId = id_str
        .parse()
        .map_err(|e| RunwayError::Storage(format!("Invalid execution id: {}", e)))?;
    let status: ExecutionStatus = status_str.parse().map_err(RunwayError::Storage)?;
    let start_timestamp = DateTime::parse_from_rfc3339(&start_str)
        .map_err(|e| RunwayError::Storage(format!("Invalid start_timestamp: {}", e)))?
        .with_timezone(&Utc);

    Ok(ExecutionRecord {
        id: Some(id),
        revision: revision as u64,
        action: json_column(row, 2, "action")?,
        runner_type: json_column(row, 3, "runner_type")?,
        parameters: json_column(row, 4, "parameters")?,
        context: json_column(row, 5, "context")?,
        status,
        start_timestamp,
    })
}
