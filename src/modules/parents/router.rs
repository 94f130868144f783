use axum::{
    Router,
    routing::{delete, get, post, put},
};
use rollbook_core::permissions::{PARENT_CREATE, PARENT_DELETE, PARENT_READ, PARENT_UPDATE};

use crate::guarded;
use crate::state::AppState;

use super::controller::{create_parent, delete_parent, list_parents, update_parent};

pub fn init_parents_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            guarded!(get(list_parents), PARENT_READ).merge(guarded!(post(create_parent), PARENT_CREATE)),
        )
        .route(
            "/{id}",
            guarded!(put(update_parent), PARENT_UPDATE)
                .merge(guarded!(delete(delete_parent), PARENT_DELETE)),
        )
}
