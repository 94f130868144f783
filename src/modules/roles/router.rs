use axum::{
    Router,
    routing::{delete, get, post, put},
};
use rollbook_core::permissions::{
    ADMIN_ROLE_CREATE, ADMIN_ROLE_DELETE, ADMIN_ROLE_READ, ADMIN_ROLE_UPDATE,
};

use crate::guarded;
use crate::state::AppState;

use super::controller::{
    create_role, delete_role, get_role_permissions, list_permissions, list_roles,
    replace_role_permissions, update_role,
};

/// Routes mounted under `/admin`.
pub fn init_roles_router() -> Router<AppState> {
    Router::new()
        .route("/permissions", guarded!(get(list_permissions), ADMIN_ROLE_READ))
        .route(
            "/roles",
            guarded!(get(list_roles), ADMIN_ROLE_READ)
                .merge(guarded!(post(create_role), ADMIN_ROLE_CREATE)),
        )
        .route(
            "/roles/{id}",
            guarded!(put(update_role), ADMIN_ROLE_UPDATE)
                .merge(guarded!(delete(delete_role), ADMIN_ROLE_DELETE)),
        )
        .route(
            "/roles/{id}/permissions",
            guarded!(get(get_role_permissions), ADMIN_ROLE_READ)
                .merge(guarded!(post(replace_role_permissions), ADMIN_ROLE_UPDATE)),
        )
}
