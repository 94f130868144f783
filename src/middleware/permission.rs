//! Authorization stage: one guard per protected route, parameterized by the
//! permission key the route requires.
//!
//! Guards must sit behind [`authenticate`](super::auth::authenticate). Attach
//! them with the [`guarded!`](crate::guarded) macro:
//!
//! ```ignore
//! use rollbook_core::permissions::{STUDENT_DELETE, STUDENT_READ};
//!
//! Router::new().route(
//!     "/{id}",
//!     guarded!(get(get_student), STUDENT_READ).merge(guarded!(delete(delete_student), STUDENT_DELETE)),
//! )
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use rollbook_core::AppError;

use crate::metrics::track_authorization;
use crate::middleware::auth::AuthContext;

/// Decides whether `context` may use a route that requires `required`.
pub fn check_permission(context: Option<&AuthContext>, required: &str) -> Result<(), AppError> {
    match context {
        Some(ctx) if ctx.has_permission(required) => Ok(()),
        _ => Err(AppError::forbidden(format!(
            "Access denied. Missing required permission: {}",
            required
        ))),
    }
}

pub async fn require_permission(
    State(required): State<&'static str>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let context = req.extensions().get::<AuthContext>();
    let outcome = check_permission(context, required);
    track_authorization(required, outcome.is_ok());

    if outcome.is_err() {
        tracing::warn!(
            permission = required,
            user_id = ?context.map(|c| c.user_id),
            "Permission denied"
        );
    }
    outcome?;

    Ok(next.run(req).await)
}

/// Wraps a method router so it only runs for callers holding `$permission`.
#[macro_export]
macro_rules! guarded {
    ($method_router:expr, $permission:expr) => {
        $method_router.route_layer(axum::middleware::from_fn_with_state(
            $permission,
            $crate::middleware::permission::require_permission,
        ))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use rollbook_core::PermissionSet;
    use rollbook_core::permissions::{STUDENT_DELETE, STUDENT_READ};
    use rollbook_models::{RoleId, UserId};

    fn context(keys: &[&str]) -> AuthContext {
        AuthContext {
            user_id: UserId::new(),
            username: "ada".to_string(),
            role_id: RoleId::new(),
            permissions: PermissionSet::from_keys(keys.iter().copied()),
        }
    }

    #[test]
    fn test_allows_held_permission() {
        let ctx = context(&[STUDENT_READ]);
        assert!(check_permission(Some(&ctx), STUDENT_READ).is_ok());
    }

    #[test]
    fn test_denies_missing_permission() {
        let ctx = context(&[STUDENT_READ]);
        let err = check_permission(Some(&ctx), STUDENT_DELETE).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert!(err.message().contains("student:delete"));
    }

    #[test]
    fn test_denies_without_context() {
        let err = check_permission(None, STUDENT_READ).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_empty_set_denies_everything() {
        let ctx = context(&[]);
        assert!(check_permission(Some(&ctx), STUDENT_READ).is_err());
    }
}
