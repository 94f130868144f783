use axum::{
    Router,
    routing::{delete, get, post, put},
};
use rollbook_core::permissions::{CLASS_CREATE, CLASS_DELETE, CLASS_READ, CLASS_UPDATE};

use crate::guarded;
use crate::state::AppState;

use super::controller::{create_class, delete_class, get_class, list_classes, update_class};

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            guarded!(get(list_classes), CLASS_READ).merge(guarded!(post(create_class), CLASS_CREATE)),
        )
        .route(
            "/{id}",
            guarded!(get(get_class), CLASS_READ)
                .merge(guarded!(put(update_class), CLASS_UPDATE))
                .merge(guarded!(delete(delete_class), CLASS_DELETE)),
        )
}
