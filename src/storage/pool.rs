//! Database connection pool management.
//!
//! File databases are created on first use and run in WAL mode. The in-memory
//! pool is limited to a single connection so every caller sees the same
//! database and writes never contend for the shared-cache table lock.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use log::{error, info};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;

/// Opens (creating if needed) the SQLite database at `db_path` and applies migrations.
pub async fn init_db_pool_with_path(db_path: &Path) -> Result<SqlitePool, DatabaseError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(db_path)
    {
        Ok(_) => info!("Created database {db_path_str}"),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            log::debug!("Using existing database {db_path_str}")
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(DatabaseError::FileCreationError(e.to_string()));
        }
    }

    let pool = SqlitePool::connect(&format!("sqlite:{db_path_str}"))
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            DatabaseError::SqlError(e)
        })?;

    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            DatabaseError::SqlError(e)
        })?;

    super::run_migrations(&pool).await?;
    Ok(pool)
}

/// Opens a private in-memory database with migrations applied.
pub async fn init_memory_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    super::run_migrations(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_pool_creates_schema() {
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("metrics.db");

        let pool = init_db_pool_with_path(&db_path).await.expect("pool");
        assert!(db_path.exists());

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table'
             AND name IN ('domain_index_info', 'api_cache', 'cache_stats')",
        )
        .fetch_one(&pool)
        .await
        .expect("query");
        assert_eq!(tables, 3);
        pool.close().await;

        // Reopening an existing database is fine and keeps migrations idempotent
        let pool = init_db_pool_with_path(&db_path).await.expect("reopen");
        pool.close().await;
    }

    #[tokio::test]
    async fn test_file_pool_reports_unwritable_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("missing").join("metrics.db");
        let result = init_db_pool_with_path(&db_path).await;
        assert!(matches!(result, Err(DatabaseError::FileCreationError(_))));
    }
}
