//! # Rollbook CLI
//!
//! Demo data generation used by the `rollbook-cli` binary.
//!
//! ```ignore
//! use rollbook_cli::seeder::{seed_demo, DemoConfig};
//!
//! seed_demo(&pool, DemoConfig::default()).await?;
//! ```

pub mod seeder;
