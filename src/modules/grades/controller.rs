use axum::extract::{Path, Query, State};
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, Paginated, PaginationParams};
use rollbook_models::grades::{
    AuditLogFilterParams, Grade, GradeAuditLog, GradeDetail, GradeFilterParams, RecordGradeDto,
    RecordedGrade, UpdateGradeDto,
};
use rollbook_models::{CourseId, GradeId, StudentId};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::GradeService;

#[utoipa::path(
    get,
    path = "/api/v1/grades",
    params(
        ("student_id" = Option<Uuid>, Query, description = "Filter by student"),
        ("course_id" = Option<Uuid>, Query, description = "Filter by course"),
        ("score_type" = Option<String>, Query, description = "Filter by score type"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated grades", body = ApiResponse<Paginated<GradeDetail>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
pub async fn list_grades(
    State(state): State<AppState>,
    Query(filter): Query<GradeFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<GradeDetail>>, AppError> {
    let grades = GradeService::list_grades(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", grades))
}

#[utoipa::path(
    post,
    path = "/api/v1/grades",
    request_body = RecordGradeDto,
    responses(
        (status = 201, description = "Grade recorded", body = ApiResponse<RecordedGrade>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Student or course not found", body = ErrorBody)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
pub async fn record_grade(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RecordGradeDto>,
) -> Result<ApiResponse<RecordedGrade>, AppError> {
    let recorded = GradeService::record_grade(&state.db, dto).await?;
    Ok(ApiResponse::created("Grade recorded", recorded))
}

#[utoipa::path(
    put,
    path = "/api/v1/grades/{id}",
    params(("id" = Uuid, Path, description = "Grade ID")),
    request_body = UpdateGradeDto,
    responses(
        (status = 200, description = "Grade updated", body = ApiResponse<Grade>),
        (status = 404, description = "Grade not found", body = ErrorBody)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
pub async fn update_grade(
    State(state): State<AppState>,
    Path(id): Path<GradeId>,
    ValidatedJson(dto): ValidatedJson<UpdateGradeDto>,
) -> Result<ApiResponse<Grade>, AppError> {
    let grade = GradeService::update_grade(&state.db, id, dto).await?;
    Ok(ApiResponse::ok("Grade updated", grade))
}

#[utoipa::path(
    get,
    path = "/api/v1/grades/student/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Grades of the student", body = ApiResponse<Paginated<GradeDetail>>),
        (status = 404, description = "Student not found", body = ErrorBody)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
pub async fn grades_by_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<GradeDetail>>, AppError> {
    let grades = GradeService::grades_by_student(&state.db, id, pagination).await?;
    Ok(ApiResponse::ok("success", grades))
}

#[utoipa::path(
    get,
    path = "/api/v1/grades/course/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Grades in the course", body = ApiResponse<Paginated<GradeDetail>>),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
pub async fn grades_by_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<GradeDetail>>, AppError> {
    let grades = GradeService::grades_by_course(&state.db, id, pagination).await?;
    Ok(ApiResponse::ok("success", grades))
}

#[utoipa::path(
    get,
    path = "/api/v1/grades/audit-logs",
    params(
        ("grade_id" = Option<Uuid>, Query, description = "Filter by grade"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Score change history", body = ApiResponse<Paginated<GradeAuditLog>>),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(filter): Query<AuditLogFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<GradeAuditLog>>, AppError> {
    let logs = GradeService::list_audit_logs(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", logs))
}
