use axum::extract::{Query, State};
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, Paginated, PaginationParams};
use rollbook_models::notifications::{
    Notification, NotificationDispatch, NotificationFilterParams, SendNotificationDto,
};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::NotificationService;

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(
        ("target" = Option<String>, Query, description = "Filter by target (substring)"),
        ("keyword" = Option<String>, Query, description = "Search title and content"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated notifications, newest first", body = ApiResponse<Paginated<Notification>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(filter): Query<NotificationFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<Notification>>, AppError> {
    let notifications =
        NotificationService::list_notifications(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", notifications))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    request_body = SendNotificationDto,
    responses(
        (status = 201, description = "Notification stored and delivered", body = ApiResponse<NotificationDispatch>),
        (status = 400, description = "Invalid request or malformed target", body = ErrorBody),
        (status = 404, description = "Targeted record not found", body = ErrorBody)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
pub async fn send_notification(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(dto): ValidatedJson<SendNotificationDto>,
) -> Result<ApiResponse<NotificationDispatch>, AppError> {
    let dispatch = NotificationService::send(&state.db, caller.user_id, dto).await?;
    Ok(ApiResponse::created("Notification sent", dispatch))
}
