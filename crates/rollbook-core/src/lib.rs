//! # Rollbook Core
//!
//! Foundational types shared by every Rollbook crate:
//!
//! - [`errors`]: [`AppError`] and its rendering into the error envelope
//! - [`response`]: the success envelope [`ApiResponse`]
//! - [`pagination`]: page/page_size parameters and [`Paginated`] bodies
//! - [`password`]: bcrypt hashing and verification
//! - [`permissions`]: permission keys, the built-in catalog, and [`PermissionSet`]

pub mod errors;
pub mod pagination;
pub mod password;
pub mod permissions;
pub mod response;

pub use errors::AppError;
pub use pagination::{Paginated, PaginationParams};
pub use password::{hash_password, verify_dummy_password, verify_password};
pub use permissions::{BuiltinRole, PermissionSet};
pub use response::{ApiResponse, MessageResponse};
