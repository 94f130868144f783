use anyhow::anyhow;
use axum::extract::{Path, Query, State};
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, MessageResponse, Paginated, PaginationParams};
use rollbook_models::UserId;
use rollbook_models::users::{CreateUserDto, UpdateUserDto, User, UserFilterParams};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::UserService;

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(
        ("username" = Option<String>, Query, description = "Filter by username (substring)"),
        ("role_id" = Option<Uuid>, Query, description = "Filter by role"),
        ("is_active" = Option<bool>, Query, description = "Filter by active flag"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated users", body = ApiResponse<Paginated<User>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<User>>, AppError> {
    let users = UserService::list_users(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", users))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = ApiResponse<User>),
        (status = 400, description = "Invalid request, unknown role or profile", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 409, description = "Username already taken", body = ErrorBody)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<ApiResponse<User>, AppError> {
    let user = UserService::create_user(&state.db, dto).await?;
    Ok(ApiResponse::created("User created", user))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 400, description = "Invalid request, unknown role or profile", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<ApiResponse<User>, AppError> {
    let user = UserService::update_user(&state.db, id, dto).await?;
    Ok(ApiResponse::ok("User updated", user))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete own account", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<UserId>,
) -> Result<MessageResponse, AppError> {
    if caller.user_id == id {
        return Err(AppError::bad_request(anyhow!(
            "You cannot delete your own account"
        )));
    }

    UserService::delete_user(&state.db, id).await?;
    Ok(MessageResponse::ok("User deleted"))
}
