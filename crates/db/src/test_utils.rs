//! Test utilities for database operations.
//!
//! Tests run against a private in-memory SQLite database with every
//! migration applied, so they need no external server.

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::migrations::Migrator;

/// Connect to a fresh in-memory SQLite database and run all migrations.
///
/// The pool is pinned to a single connection: every SQLite in-memory
/// connection opens its own empty database.
pub async fn setup_test_db() -> Result<Arc<DatabaseConnection>, DbErr> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let conn = Database::connect(opt).await?;
    Migrator::up(&conn, None).await?;

    tracing::debug!("Created in-memory test database");
    Ok(Arc::new(conn))
}
