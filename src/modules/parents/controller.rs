use axum::extract::{Path, Query, State};
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, MessageResponse, Paginated, PaginationParams};
use rollbook_models::ParentId;
use rollbook_models::parents::{CreateParentDto, Parent, ParentFilterParams, UpdateParentDto};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::ParentService;

#[utoipa::path(
    get,
    path = "/api/v1/parents",
    params(
        ("student_code" = Option<String>, Query, description = "Filter by student code (substring)"),
        ("student_id" = Option<Uuid>, Query, description = "Filter by student"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated parent contacts", body = ApiResponse<Paginated<Parent>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Parents",
    security(("bearer_auth" = []))
)]
pub async fn list_parents(
    State(state): State<AppState>,
    Query(filter): Query<ParentFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<Parent>>, AppError> {
    let parents = ParentService::list_parents(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", parents))
}

#[utoipa::path(
    post,
    path = "/api/v1/parents",
    request_body = CreateParentDto,
    responses(
        (status = 201, description = "Parent created", body = ApiResponse<Parent>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Student not found", body = ErrorBody)
    ),
    tag = "Parents",
    security(("bearer_auth" = []))
)]
pub async fn create_parent(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateParentDto>,
) -> Result<ApiResponse<Parent>, AppError> {
    let parent = ParentService::create_parent(&state.db, dto).await?;
    Ok(ApiResponse::created("Parent created", parent))
}

#[utoipa::path(
    put,
    path = "/api/v1/parents/{id}",
    params(("id" = Uuid, Path, description = "Parent ID")),
    request_body = UpdateParentDto,
    responses(
        (status = 200, description = "Parent updated", body = ApiResponse<Parent>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Parent not found", body = ErrorBody)
    ),
    tag = "Parents",
    security(("bearer_auth" = []))
)]
pub async fn update_parent(
    State(state): State<AppState>,
    Path(id): Path<ParentId>,
    ValidatedJson(dto): ValidatedJson<UpdateParentDto>,
) -> Result<ApiResponse<Parent>, AppError> {
    let parent = ParentService::update_parent(&state.db, id, dto).await?;
    Ok(ApiResponse::ok("Parent updated", parent))
}

#[utoipa::path(
    delete,
    path = "/api/v1/parents/{id}",
    params(("id" = Uuid, Path, description = "Parent ID")),
    responses(
        (status = 200, description = "Parent deleted", body = MessageResponse),
        (status = 404, description = "Parent not found", body = ErrorBody)
    ),
    tag = "Parents",
    security(("bearer_auth" = []))
)]
pub async fn delete_parent(
    State(state): State<AppState>,
    Path(id): Path<ParentId>,
) -> Result<MessageResponse, AppError> {
    ParentService::delete_parent(&state.db, id).await?;
    Ok(MessageResponse::ok("Parent deleted"))
}
