use axum::{
    Router,
    routing::{delete, get, post, put},
};
use rollbook_core::permissions::{STUDENT_CREATE, STUDENT_DELETE, STUDENT_READ, STUDENT_UPDATE};

use crate::guarded;
use crate::state::AppState;

use super::controller::{create_student, delete_student, get_student, list_students, update_student};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            guarded!(get(list_students), STUDENT_READ)
                .merge(guarded!(post(create_student), STUDENT_CREATE)),
        )
        .route(
            "/{id}",
            guarded!(get(get_student), STUDENT_READ)
                .merge(guarded!(put(update_student), STUDENT_UPDATE))
                .merge(guarded!(delete(delete_student), STUDENT_DELETE)),
        )
}
