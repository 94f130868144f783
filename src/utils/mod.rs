//! Shared helpers for the feature services.
//!
//! - [`db`]: classification of database errors into client-facing failures

pub mod db;
