//! Database connection bootstrap.
//!
//! Single entrypoint (`bootstrap_db`) that builds a connection for a profile
//! and brings the schema up to date. SQLite in-memory connections are pinned
//! to one pooled connection, otherwise every checkout would see a fresh empty
//! database.

use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbOwner, DbProfile};
use crate::error::AppError;

/// Connect to the database at `url` with pool settings appropriate for the
/// backend kind.
pub async fn connect_db(url: &str) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(url);
    opt.min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    if url.starts_with("sqlite") {
        opt.max_connections(1);
    } else {
        opt.max_connections(10);
    }

    Database::connect(opt)
        .await
        .map_err(|e| AppError::db(format!("failed to connect to database: {e}")))
}

/// Build a connection for the given profile and run pending migrations.
pub async fn bootstrap_db(
    profile: DbProfile,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile, owner)?;
    let conn = connect_db(&url).await?;

    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::db(format!("migration failed: {e}")))?;

    let db_name = migration::current_database_name(&conn)
        .await
        .unwrap_or_else(|_| "<unknown>".to_string());
    info!("database ready: {db_name}");

    Ok(conn)
}
