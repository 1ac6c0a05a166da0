//! Database schema migrations.

use rusqlite::Connection;
use tracing::info;

use runway_core::error::RunwayError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), RunwayError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| RunwayError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| RunwayError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: executions");
    }

    Ok(())
}

/// Version 1: execution records.
///
/// `start_timestamp` is RFC 3339 with fixed nanosecond width and a `Z`
/// suffix, so text order is chronological order.
fn apply_v1(conn: &Connection) -> Result<(), RunwayError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS executions (
            id              TEXT PRIMARY KEY NOT NULL,
            revision        INTEGER NOT NULL,
            action_ref      TEXT NOT NULL,
            action          TEXT NOT NULL,
            runner_type     TEXT NOT NULL,
            parameters      TEXT NOT NULL DEFAULT '{}',
            context         TEXT NOT NULL DEFAULT '{}',
            user            TEXT,
            parent_id       TEXT,
            status          TEXT NOT NULL
                            CHECK (status IN ('requested', 'scheduled', 'running',
                                              'succeeded', 'failed', 'canceled')),
            start_timestamp TEXT NOT NULL,
            created_at      INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            updated_at      INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_executions_status
            ON executions (status, start_timestamp ASC);

        CREATE INDEX IF NOT EXISTS idx_executions_action_ref
            ON executions (action_ref, start_timestamp DESC);

        CREATE INDEX IF NOT EXISTS idx_executions_parent
            ON executions (parent_id)
            WHERE parent_id IS NOT NULL;

        INSERT INTO schema_migrations (version, name) VALUES (1, 'executions');
        ",
    )
    .map_err(|e| RunwayError::Storage(format!("Migration v1 failed: {}", e)))?;

    Ok(())
}
