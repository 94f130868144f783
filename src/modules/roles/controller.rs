use axum::extract::{Path, Query, State};
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, MessageResponse, Paginated, PaginationParams};
use rollbook_models::RoleId;
use rollbook_models::roles::{
    CreateRoleDto, PermissionCatalog, ReplaceRolePermissionsDto, Role, RoleFilterParams,
    RolePermissions, RoleSummary, UpdateRoleDto,
};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service;

// ============ Permission catalog ============

#[utoipa::path(
    get,
    path = "/api/v1/admin/permissions",
    responses(
        (status = 200, description = "Permission catalog, flat and grouped by tag", body = ApiResponse<PermissionCatalog>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn list_permissions(
    State(state): State<AppState>,
) -> Result<ApiResponse<PermissionCatalog>, AppError> {
    let catalog = service::list_permissions(&state.db).await?;
    Ok(ApiResponse::ok("success", catalog))
}

// ============ Roles ============

#[utoipa::path(
    get,
    path = "/api/v1/admin/roles",
    params(
        ("name" = Option<String>, Query, description = "Filter by name (substring)"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Roles with permission and user counts", body = ApiResponse<Paginated<RoleSummary>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn list_roles(
    State(state): State<AppState>,
    Query(filter): Query<RoleFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<RoleSummary>>, AppError> {
    let roles = service::list_roles(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", roles))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/roles",
    request_body = CreateRoleDto,
    responses(
        (status = 201, description = "Role created", body = ApiResponse<Role>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 409, description = "Role name already taken", body = ErrorBody)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateRoleDto>,
) -> Result<ApiResponse<Role>, AppError> {
    let role = service::create_role(&state.db, dto).await?;
    Ok(ApiResponse::created("Role created", role))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/roles/{id}",
    params(("id" = Uuid, Path, description = "Role ID")),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role renamed", body = ApiResponse<Role>),
        (status = 404, description = "Role not found", body = ErrorBody),
        (status = 409, description = "Role name already taken", body = ErrorBody)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<RoleId>,
    ValidatedJson(dto): ValidatedJson<UpdateRoleDto>,
) -> Result<ApiResponse<Role>, AppError> {
    let role = service::update_role(&state.db, id, dto).await?;
    Ok(ApiResponse::ok("Role updated", role))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/roles/{id}",
    params(("id" = Uuid, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role deleted", body = MessageResponse),
        (status = 404, description = "Role not found", body = ErrorBody)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<RoleId>,
) -> Result<MessageResponse, AppError> {
    service::delete_role(&state.db, id).await?;
    Ok(MessageResponse::ok("Role deleted"))
}

// ============ Role permissions ============

#[utoipa::path(
    get,
    path = "/api/v1/admin/roles/{id}/permissions",
    params(("id" = Uuid, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Permission keys granted to the role", body = ApiResponse<RolePermissions>),
        (status = 404, description = "Role not found", body = ErrorBody)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_role_permissions(
    State(state): State<AppState>,
    Path(id): Path<RoleId>,
) -> Result<ApiResponse<RolePermissions>, AppError> {
    let permissions = service::get_role_permissions(&state.db, id).await?;
    Ok(ApiResponse::ok("success", permissions))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/roles/{id}/permissions",
    params(("id" = Uuid, Path, description = "Role ID")),
    request_body = ReplaceRolePermissionsDto,
    responses(
        (status = 200, description = "Role permission set replaced", body = ApiResponse<RolePermissions>),
        (status = 400, description = "Unknown permission keys", body = ErrorBody),
        (status = 404, description = "Role not found", body = ErrorBody)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn replace_role_permissions(
    State(state): State<AppState>,
    Path(id): Path<RoleId>,
    ValidatedJson(dto): ValidatedJson<ReplaceRolePermissionsDto>,
) -> Result<ApiResponse<RolePermissions>, AppError> {
    let permissions = service::replace_role_permissions(&state.db, id, dto.permissions).await?;
    Ok(ApiResponse::ok("Role permissions updated", permissions))
}
