//! # Rollbook Config
//!
//! Configuration structures loaded from environment variables. Each struct has a
//! `from_env()` constructor with development-friendly defaults.
//!
//! - [`jwt`]: token signing secret, lifetime and issuer
//! - [`cors`]: allowed browser origins
//! - [`database`]: connection pool sizing and the per-statement timeout
//! - [`server`]: listener address
//!
//! # Example
//!
//! ```ignore
//! use rollbook_config::{CorsConfig, DatabaseConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let db_config = DatabaseConfig::from_env()?;
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use database::{DatabaseConfig, MissingDatabaseUrl};
pub use jwt::JwtConfig;
pub use server::ServerConfig;

pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
