//! Request pipeline middleware.
//!
//! Protected routes run two stages, in this order:
//!
//! 1. [`auth::authenticate`] (attached with `route_layer` on each nested router)
//!    verifies the `Authorization: Bearer <token>` header and resolves the
//!    caller's permission set into an [`auth::AuthContext`].
//! 2. [`permission::require_permission`] (attached per route with
//!    [`guarded!`](crate::guarded)) rejects callers whose set lacks the route's key.
//!
//! A missing or malformed header is `401` with `error` set to `missing` or
//! `malformed`; a missing permission is `403`.

pub mod auth;
pub mod permission;
