use axum::extract::{Path, Query, State};
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, Paginated, PaginationParams};
use rollbook_models::ClassId;
use rollbook_models::classes::{
    Class, ClassDeletion, ClassDetail, ClassFilterParams, CreateClassDto, UpdateClassDto,
};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::ClassService;

#[utoipa::path(
    get,
    path = "/api/v1/classes",
    params(
        ("name" = Option<String>, Query, description = "Filter by name (substring)"),
        ("teacher_id" = Option<Uuid>, Query, description = "Filter by homeroom teacher"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated classes", body = ApiResponse<Paginated<Class>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn list_classes(
    State(state): State<AppState>,
    Query(filter): Query<ClassFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<Class>>, AppError> {
    let classes = ClassService::list_classes(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", classes))
}

#[utoipa::path(
    get,
    path = "/api/v1/classes/{id}",
    params(("id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class with its students", body = ApiResponse<ClassDetail>),
        (status = 404, description = "Class not found", body = ErrorBody)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
) -> Result<ApiResponse<ClassDetail>, AppError> {
    let class = ClassService::get_class(&state.db, id).await?;
    Ok(ApiResponse::ok("success", class))
}

#[utoipa::path(
    post,
    path = "/api/v1/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = ApiResponse<Class>),
        (status = 400, description = "Invalid request or unknown teacher", body = ErrorBody)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn create_class(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<ApiResponse<Class>, AppError> {
    let class = ClassService::create_class(&state.db, dto).await?;
    Ok(ApiResponse::created("Class created", class))
}

#[utoipa::path(
    put,
    path = "/api/v1/classes/{id}",
    params(("id" = Uuid, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = ApiResponse<Class>),
        (status = 400, description = "Invalid request or unknown teacher", body = ErrorBody),
        (status = 404, description = "Class not found", body = ErrorBody)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<ApiResponse<Class>, AppError> {
    let class = ClassService::update_class(&state.db, id, dto).await?;
    Ok(ApiResponse::ok("Class updated", class))
}

#[utoipa::path(
    delete,
    path = "/api/v1/classes/{id}",
    params(("id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted, students unassigned", body = ApiResponse<ClassDeletion>),
        (status = 404, description = "Class not found", body = ErrorBody)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
) -> Result<ApiResponse<ClassDeletion>, AppError> {
    let deletion = ClassService::delete_class(&state.db, id).await?;
    Ok(ApiResponse::ok("Class deleted", deletion))
}
