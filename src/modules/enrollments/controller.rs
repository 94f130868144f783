use axum::extract::{Path, Query, State};
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, Paginated, PaginationParams};
use rollbook_models::EnrollmentId;
use rollbook_models::enrollments::{
    EnrollDto, EnrollmentDetail, EnrollmentFilterParams, Unenrollment,
};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::EnrollmentService;

#[utoipa::path(
    get,
    path = "/api/v1/enrollments",
    params(
        ("student_id" = Option<Uuid>, Query, description = "Filter by student"),
        ("course_id" = Option<Uuid>, Query, description = "Filter by course"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Enrollments with their grades", body = ApiResponse<Paginated<EnrollmentDetail>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
pub async fn list_enrollments(
    State(state): State<AppState>,
    Query(filter): Query<EnrollmentFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<EnrollmentDetail>>, AppError> {
    let enrollments = EnrollmentService::list_enrollments(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", enrollments))
}

#[utoipa::path(
    post,
    path = "/api/v1/enrollments",
    request_body = EnrollDto,
    responses(
        (status = 201, description = "Student enrolled", body = ApiResponse<EnrollmentDetail>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Student or course not found", body = ErrorBody),
        (status = 409, description = "Already enrolled or course full", body = ErrorBody)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
pub async fn enroll(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<EnrollDto>,
) -> Result<ApiResponse<EnrollmentDetail>, AppError> {
    let enrollment = EnrollmentService::enroll(&state.db, dto).await?;
    Ok(ApiResponse::created("Student enrolled", enrollment))
}

#[utoipa::path(
    delete,
    path = "/api/v1/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment and its grades removed", body = ApiResponse<Unenrollment>),
        (status = 404, description = "Enrollment not found", body = ErrorBody)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
pub async fn unenroll(
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
) -> Result<ApiResponse<Unenrollment>, AppError> {
    let removed = EnrollmentService::unenroll(&state.db, id).await?;
    Ok(ApiResponse::ok("Enrollment removed", removed))
}
