//! # Rollbook Auth
//!
//! Signed, time-limited identity tokens.
//!
//! A token carries who the caller is (user id, username, role id) and nothing
//! about what they may do: permissions are resolved from the database on every
//! request, so role changes apply without re-login. Tokens are stateless and stay
//! valid until they expire, even after deactivation, password or role changes.
//!
//! # Example
//!
//! ```ignore
//! use rollbook_auth::TokenService;
//! use rollbook_config::JwtConfig;
//!
//! let tokens = TokenService::new(&JwtConfig::from_env());
//! let token = tokens.issue(user_id, "admin", role_id)?;
//! let claims = tokens.verify(&token)?;
//! assert_eq!(claims.user_id, user_id);
//! ```

pub mod claims;
pub mod token;

pub use claims::Claims;
pub use token::{TokenError, TokenService};
