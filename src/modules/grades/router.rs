use axum::{
    Router,
    routing::{get, post, put},
};
use rollbook_core::permissions::{GRADE_CREATE, GRADE_READ, GRADE_UPDATE};

use crate::guarded;
use crate::state::AppState;

use super::controller::{
    grades_by_course, grades_by_student, list_audit_logs, list_grades, record_grade, update_grade,
};

pub fn init_grades_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            guarded!(get(list_grades), GRADE_READ)
                .merge(guarded!(post(record_grade), GRADE_CREATE)),
        )
        .route("/audit-logs", guarded!(get(list_audit_logs), GRADE_READ))
        .route("/student/{id}", guarded!(get(grades_by_student), GRADE_READ))
        .route("/course/{id}", guarded!(get(grades_by_course), GRADE_READ))
        .route("/{id}", guarded!(put(update_grade), GRADE_UPDATE))
}
