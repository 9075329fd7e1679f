//! Storage Layer
//!
//! Provides PostgreSQL persistence for station measurements with the
//! repository pattern. An in-memory backend with the same contract is
//! available for tests and database-less runs.

mod config;
mod record;
mod repository;

pub use config::DatabaseConfig;
pub use record::{MeasurementRecord, MeasurementRow};
pub use repository::Repository;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Lock error: {0}")]
    LockError(String),
    #[error("Store unavailable")]
    Unavailable,
}
