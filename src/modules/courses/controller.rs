use axum::extract::{Path, Query, State};
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, Paginated, PaginationParams};
use rollbook_models::CourseId;
use rollbook_models::courses::{
    Course, CourseDeletion, CourseFilterParams, CreateCourseDto, UpdateCourseDto,
};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::CourseService;

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(
        ("name" = Option<String>, Query, description = "Filter by name (substring)"),
        ("teacher_id" = Option<Uuid>, Query, description = "Filter by teacher"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated courses", body = ApiResponse<Paginated<Course>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(filter): Query<CourseFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<Course>>, AppError> {
    let courses = CourseService::list_courses(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", courses))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = ApiResponse<Course>),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<ApiResponse<Course>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    Ok(ApiResponse::ok("success", course))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = ApiResponse<Course>),
        (status = 400, description = "Invalid request or unknown teacher", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn create_course(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<ApiResponse<Course>, AppError> {
    let course = CourseService::create_course(&state.db, dto).await?;
    Ok(ApiResponse::created("Course created", course))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = ApiResponse<Course>),
        (status = 400, description = "Invalid request or unknown teacher", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<ApiResponse<Course>, AppError> {
    let course = CourseService::update_course(&state.db, id, dto).await?;
    Ok(ApiResponse::ok("Course updated", course))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course and dependent records deleted", body = ApiResponse<CourseDeletion>),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<ApiResponse<CourseDeletion>, AppError> {
    let deletion = CourseService::delete_course(&state.db, id).await?;
    Ok(ApiResponse::ok("Course deleted", deletion))
}
