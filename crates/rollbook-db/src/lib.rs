//! # Rollbook DB
//!
//! PostgreSQL plumbing shared by the API server and the CLI:
//!
//! - [`init_db_pool`]: connection pool with a per-connection `statement_timeout`
//! - [`MIGRATOR`] / [`run_migrations`]: the embedded `migrations/` directory
//! - [`seed`]: idempotent creation of the built-in roles, the permission catalog
//!   and the default grants, plus the bootstrap administrator
//!
//! # Example
//!
//! ```ignore
//! use rollbook_config::DatabaseConfig;
//!
//! let pool = rollbook_db::init_db_pool(&DatabaseConfig::from_env()?).await?;
//! rollbook_db::run_migrations(&pool).await?;
//! rollbook_db::seed::seed_defaults(&pool).await?;
//! ```

use std::str::FromStr;
use std::time::Duration;

use rollbook_config::DatabaseConfig;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod seed;

pub use sqlx::PgPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Connects a pool sized and timed per `config`.
///
/// Queries running longer than `statement_timeout_ms` are cancelled by the
/// server and surface as database errors.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let mut options = PgConnectOptions::from_str(&config.url)?;
    if config.statement_timeout_ms > 0 {
        options = options.options([("statement_timeout", config.statement_timeout_ms.to_string())]);
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        statement_timeout_ms = config.statement_timeout_ms,
        "Database pool ready"
    );

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
