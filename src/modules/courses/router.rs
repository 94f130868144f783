use axum::{
    Router,
    routing::{delete, get, post, put},
};
use rollbook_core::permissions::{COURSE_CREATE, COURSE_DELETE, COURSE_READ, COURSE_UPDATE};

use crate::guarded;
use crate::state::AppState;

use super::controller::{create_course, delete_course, get_course, list_courses, update_course};

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            guarded!(get(list_courses), COURSE_READ)
                .merge(guarded!(post(create_course), COURSE_CREATE)),
        )
        .route(
            "/{id}",
            guarded!(get(get_course), COURSE_READ)
                .merge(guarded!(put(update_course), COURSE_UPDATE))
                .merge(guarded!(delete(delete_course), COURSE_DELETE)),
        )
}
