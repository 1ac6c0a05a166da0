//! Runway Storage crate - execution record persistence.
//!
//! Provides a WAL-mode SQLite database with migrations, an
//! `ExecutionStore` backed by it, and an in-memory store for embedding and
//! tests.

pub mod db;
pub mod memory;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use memory::MemoryExecutionStore;
pub use repository::SqliteExecutionStore;
