//! Diesel/PostgreSQL persistence adapter.
//!
//! Selected when a database URL is configured. Migrations under
//! `backend/migrations` are embedded and applied at start-up.

mod diesel_record_store;
mod models;
mod pool;
mod schema;

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub use diesel_record_store::DieselRecordStore;
pub use pool::{DbPool, PoolConfig, PoolError};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failure applying [`MIGRATIONS`].
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {0}")]
    Connect(#[from] diesel::ConnectionError),
    #[error("failed to run migrations: {message}")]
    Run { message: String },
}

/// Apply pending migrations over a blocking connection.
///
/// Blocks the calling thread; run it under `spawn_blocking` from async code.
///
/// # Errors
/// [`MigrationError`] when the database is unreachable or a migration fails.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Run {
            message: err.to_string(),
        })?;
    Ok(applied.len())
}
