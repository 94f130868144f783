use axum::{
    Router,
    routing::{delete, get, post, put},
};
use rollbook_core::permissions::{
    ADMIN_USER_CREATE, ADMIN_USER_DELETE, ADMIN_USER_READ, ADMIN_USER_UPDATE,
};

use crate::guarded;
use crate::state::AppState;

use super::controller::{create_user, delete_user, list_users, update_user};

/// Routes mounted under `/admin`.
pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            guarded!(get(list_users), ADMIN_USER_READ)
                .merge(guarded!(post(create_user), ADMIN_USER_CREATE)),
        )
        .route(
            "/users/{id}",
            guarded!(put(update_user), ADMIN_USER_UPDATE)
                .merge(guarded!(delete(delete_user), ADMIN_USER_DELETE)),
        )
}
