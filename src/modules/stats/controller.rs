use axum::extract::State;
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError};
use rollbook_models::stats::{DashboardStats, OverviewStats};

use crate::state::AppState;

use super::service;

#[utoipa::path(
    get,
    path = "/api/v1/admin/stats/overview",
    responses(
        (status = 200, description = "Row counts across the system", body = ApiResponse<OverviewStats>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Stats",
    security(("bearer_auth" = []))
)]
pub async fn overview(State(state): State<AppState>) -> Result<ApiResponse<OverviewStats>, AppError> {
    let stats = service::overview(&state.db).await?;
    Ok(ApiResponse::ok("success", stats))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/stats/dashboard",
    responses(
        (status = 200, description = "Dashboard aggregates", body = ApiResponse<DashboardStats>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Stats",
    security(("bearer_auth" = []))
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<ApiResponse<DashboardStats>, AppError> {
    let stats = service::dashboard(&state.db).await?;
    Ok(ApiResponse::ok("success", stats))
}
