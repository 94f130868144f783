use axum::extract::State;
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, MessageResponse};
use rollbook_models::auth::{ChangePasswordRequest, LoginRequest, LoginResponse, MeResponse};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::AuthService;

/// Exchange username and password for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Bad request - validation error", body = ErrorBody),
        (status = 401, description = "Invalid username or password", body = ErrorBody),
        (status = 403, description = "Account is disabled", body = ErrorBody)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let response = AuthService::login(&state.db, &state.tokens, dto).await?;
    Ok(ApiResponse::ok("Login successful", response))
}

/// Tokens are stateless; the client discards its copy.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Logged out", body = MessageResponse)),
    tag = "Authentication"
)]
pub async fn logout() -> MessageResponse {
    MessageResponse::ok("Logged out")
}

/// Current user, linked profile, and resolved permission keys
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<MeResponse>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Account no longer exists", body = ErrorBody)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<ApiResponse<MeResponse>, AppError> {
    let me = AuthService::me(&state.db, caller.user_id).await?;
    Ok(ApiResponse::ok("success", me))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordRequest>,
) -> Result<MessageResponse, AppError> {
    AuthService::change_password(&state.db, caller.user_id, dto).await?;
    Ok(MessageResponse::ok("Password changed"))
}
