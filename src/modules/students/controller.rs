use axum::extract::{Path, Query, State};
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, Paginated, PaginationParams};
use rollbook_models::StudentId;
use rollbook_models::students::{
    CreateStudentDto, Student, StudentDeletion, StudentFilterParams, UpdateStudentDto,
};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::StudentService;

#[utoipa::path(
    get,
    path = "/api/v1/students",
    params(
        ("name" = Option<String>, Query, description = "Filter by name (substring)"),
        ("student_code" = Option<String>, Query, description = "Filter by student code (substring)"),
        ("class_id" = Option<Uuid>, Query, description = "Filter by class"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated students", body = ApiResponse<Paginated<Student>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
pub async fn list_students(
    State(state): State<AppState>,
    Query(filter): Query<StudentFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<Student>>, AppError> {
    let students = StudentService::list_students(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", students))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student", body = ApiResponse<Student>),
        (status = 404, description = "Student not found", body = ErrorBody)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<ApiResponse<Student>, AppError> {
    let student = StudentService::get_student(&state.db, id).await?;
    Ok(ApiResponse::ok("success", student))
}

#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = ApiResponse<Student>),
        (status = 400, description = "Invalid request or unknown class", body = ErrorBody),
        (status = 409, description = "Student code already in use", body = ErrorBody)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<ApiResponse<Student>, AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok(ApiResponse::created("Student created", student))
}

#[utoipa::path(
    put,
    path = "/api/v1/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = ApiResponse<Student>),
        (status = 400, description = "Invalid request or unknown class", body = ErrorBody),
        (status = 404, description = "Student not found", body = ErrorBody)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<ApiResponse<Student>, AppError> {
    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(ApiResponse::ok("Student updated", student))
}

#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student and dependent records deleted", body = ApiResponse<StudentDeletion>),
        (status = 404, description = "Student not found", body = ErrorBody)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<ApiResponse<StudentDeletion>, AppError> {
    let deletion = StudentService::delete_student(&state.db, id).await?;
    Ok(ApiResponse::ok("Student deleted", deletion))
}
