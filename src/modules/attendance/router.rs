use axum::{
    Router,
    routing::{delete, get, post},
};
use rollbook_core::permissions::{ATTENDANCE_CREATE, ATTENDANCE_DELETE, ATTENDANCE_READ};

use crate::guarded;
use crate::state::AppState;

use super::controller::{
    attendance_stats, delete_attendance, list_attendance, record_attendance, student_attendance,
};

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            guarded!(get(list_attendance), ATTENDANCE_READ)
                .merge(guarded!(post(record_attendance), ATTENDANCE_CREATE)),
        )
        .route("/stats", guarded!(get(attendance_stats), ATTENDANCE_READ))
        .route("/student/{id}", guarded!(get(student_attendance), ATTENDANCE_READ))
        .route("/{id}", guarded!(delete(delete_attendance), ATTENDANCE_DELETE))
}
