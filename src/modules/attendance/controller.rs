use axum::extract::{Path, Query, State};
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, MessageResponse, Paginated, PaginationParams};
use rollbook_models::attendance::{
    Attendance, AttendanceFilterParams, AttendanceTally, RecordAttendanceDto,
};
use rollbook_models::{AttendanceId, StudentId};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::AttendanceService;

#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(
        ("student_id" = Option<Uuid>, Query, description = "Filter by student"),
        ("status" = Option<String>, Query, description = "present, absent, leave or late"),
        ("date_from" = Option<String>, Query, description = "First day, inclusive (YYYY-MM-DD)"),
        ("date_to" = Option<String>, Query, description = "Last day, inclusive (YYYY-MM-DD)"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated attendance marks", body = ApiResponse<Paginated<Attendance>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn list_attendance(
    State(state): State<AppState>,
    Query(filter): Query<AttendanceFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<Attendance>>, AppError> {
    let marks = AttendanceService::list_attendance(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", marks))
}

#[utoipa::path(
    get,
    path = "/api/v1/attendance/student/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "All marks for the student, newest first", body = ApiResponse<Vec<Attendance>>),
        (status = 404, description = "Student not found", body = ErrorBody)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn student_attendance(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<ApiResponse<Vec<Attendance>>, AppError> {
    let marks = AttendanceService::student_attendance(&state.db, id).await?;
    Ok(ApiResponse::ok("success", marks))
}

#[utoipa::path(
    get,
    path = "/api/v1/attendance/stats",
    params(
        ("student_id" = Option<Uuid>, Query, description = "Only this student"),
        ("date_from" = Option<String>, Query, description = "First day, inclusive (YYYY-MM-DD)"),
        ("date_to" = Option<String>, Query, description = "Last day, inclusive (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Per-student status counts", body = ApiResponse<Vec<AttendanceTally>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn attendance_stats(
    State(state): State<AppState>,
    Query(filter): Query<AttendanceFilterParams>,
) -> Result<ApiResponse<Vec<AttendanceTally>>, AppError> {
    let tallies = AttendanceService::tally(&state.db, filter).await?;
    Ok(ApiResponse::ok("success", tallies))
}

#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = RecordAttendanceDto,
    responses(
        (status = 201, description = "Attendance recorded", body = ApiResponse<Attendance>),
        (status = 400, description = "Invalid request or unknown teacher", body = ErrorBody),
        (status = 404, description = "Student not found", body = ErrorBody)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn record_attendance(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RecordAttendanceDto>,
) -> Result<ApiResponse<Attendance>, AppError> {
    let mark = AttendanceService::record_attendance(&state.db, dto).await?;
    Ok(ApiResponse::created("Attendance recorded", mark))
}

#[utoipa::path(
    delete,
    path = "/api/v1/attendance/{id}",
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record deleted", body = MessageResponse),
        (status = 404, description = "Attendance record not found", body = ErrorBody)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn delete_attendance(
    State(state): State<AppState>,
    Path(id): Path<AttendanceId>,
) -> Result<MessageResponse, AppError> {
    AttendanceService::delete_attendance(&state.db, id).await?;
    Ok(MessageResponse::ok("Attendance record deleted"))
}
