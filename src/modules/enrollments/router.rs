use axum::{
    Router,
    routing::{delete, get, post},
};
use rollbook_core::permissions::{ENROLLMENT_CREATE, ENROLLMENT_DELETE, ENROLLMENT_READ};

use crate::guarded;
use crate::state::AppState;

use super::controller::{enroll, list_enrollments, unenroll};

pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            guarded!(get(list_enrollments), ENROLLMENT_READ)
                .merge(guarded!(post(enroll), ENROLLMENT_CREATE)),
        )
        .route("/{id}", guarded!(delete(unenroll), ENROLLMENT_DELETE))
}
