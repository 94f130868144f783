//! Authentication stage of the request pipeline.
//!
//! [`authenticate`] verifies the bearer token, then loads the permission keys of
//! the caller's role from the database. The result is stored in the request
//! extensions as an [`AuthContext`] and read by [`AuthUser`] and the permission
//! guard. Permissions are never cached across requests, so a role change is
//! visible on the caller's next call without a new token.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use rollbook_core::{AppError, PermissionSet, errors::reasons};
use rollbook_models::{RoleId, UserId};
use tracing::debug;

use crate::modules::roles::service::resolve_permission_set;
use crate::state::AppState;

/// Identity and permissions of the caller, resolved once per request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: UserId,
    pub username: String,
    pub role_id: RoleId,
    pub permissions: PermissionSet,
}

impl AuthContext {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

fn header_error(rejection: &TypedHeaderRejection) -> AppError {
    if rejection.is_missing() {
        AppError::unauthorized(reasons::MISSING, "Missing authorization header")
    } else {
        AppError::unauthorized(reasons::MALFORMED, "Invalid authorization header format")
    }
}

pub async fn authenticate(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|e| header_error(&e))?;

    let claims = state.tokens.verify(bearer.token()).map_err(|e| {
        debug!(reason = e.reason(), "Token rejected");
        AppError::unauthorized(e.reason(), e.to_string())
    })?;

    let role_id = RoleId::from_uuid(claims.role_id);
    let permissions = resolve_permission_set(&state.db, role_id).await?;

    req.extensions_mut().insert(AuthContext {
        user_id: UserId::from_uuid(claims.user_id),
        username: claims.username,
        role_id,
        permissions,
    });

    Ok(next.run(req).await)
}

/// Handler extractor for the authenticated caller.
///
/// Only valid on routes behind [`authenticate`]; elsewhere it rejects with `401`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized(reasons::MISSING, "Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn context(keys: &[&str]) -> AuthContext {
        AuthContext {
            user_id: UserId::new(),
            username: "nkem".to_string(),
            role_id: RoleId::new(),
            permissions: PermissionSet::from_keys(keys.iter().copied()),
        }
    }

    #[test]
    fn test_has_permission() {
        let ctx = context(&["student:read", "grade:read"]);
        assert!(ctx.has_permission("student:read"));
        assert!(!ctx.has_permission("student:delete"));
    }

    #[tokio::test]
    async fn test_auth_user_reads_extension() {
        let (mut parts, _) = HttpRequest::new(()).into_parts();
        parts.extensions.insert(context(&["course:read"]));

        let AuthUser(ctx) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.username, "nkem");
        assert!(ctx.has_permission("course:read"));
    }

    #[tokio::test]
    async fn test_auth_user_without_context_is_unauthorized() {
        let (mut parts, _) = HttpRequest::new(()).into_parts();

        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.reason, Some(reasons::MISSING));
    }
}
