//! Connection settings for PostgreSQL.
//!
//! - `DATABASE_URL`: connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default 10)
//! - `DATABASE_ACQUIRE_TIMEOUT_SECS`: wait for a free connection (default 5)
//! - `DATABASE_STATEMENT_TIMEOUT_MS`: server-side `statement_timeout` applied to
//!   every pooled connection (default 30000, `0` disables it)

use std::env;
use std::fmt;

use crate::env_or;

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub statement_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("DATABASE_URL must be set")]
pub struct MissingDatabaseUrl;

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, MissingDatabaseUrl> {
        let url = env::var("DATABASE_URL").map_err(|_| MissingDatabaseUrl)?;

        Ok(Self {
            url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            acquire_timeout_secs: env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 5),
            statement_timeout_ms: env_or("DATABASE_STATEMENT_TIMEOUT_MS", 30_000),
        })
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("statement_timeout_ms", &self.statement_timeout_ms)
            .finish()
    }
}
