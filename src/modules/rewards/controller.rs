use axum::extract::{Path, Query, State};
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, MessageResponse, Paginated, PaginationParams};
use rollbook_models::rewards::{CreateRewardDto, Reward, RewardFilterParams};
use rollbook_models::{RewardId, StudentId};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::RewardService;

#[utoipa::path(
    get,
    path = "/api/v1/rewards",
    params(
        ("student_id" = Option<Uuid>, Query, description = "Filter by student"),
        ("type" = Option<String>, Query, description = "reward or punishment"),
        ("date_from" = Option<String>, Query, description = "First day, inclusive (YYYY-MM-DD)"),
        ("date_to" = Option<String>, Query, description = "Last day, inclusive (YYYY-MM-DD)"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated rewards and punishments", body = ApiResponse<Paginated<Reward>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Rewards",
    security(("bearer_auth" = []))
)]
pub async fn list_rewards(
    State(state): State<AppState>,
    Query(filter): Query<RewardFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<Reward>>, AppError> {
    let rewards = RewardService::list_rewards(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", rewards))
}

#[utoipa::path(
    get,
    path = "/api/v1/rewards/student/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "All records for the student, newest first", body = ApiResponse<Vec<Reward>>),
        (status = 404, description = "Student not found", body = ErrorBody)
    ),
    tag = "Rewards",
    security(("bearer_auth" = []))
)]
pub async fn student_rewards(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<ApiResponse<Vec<Reward>>, AppError> {
    let rewards = RewardService::student_rewards(&state.db, id).await?;
    Ok(ApiResponse::ok("success", rewards))
}

#[utoipa::path(
    post,
    path = "/api/v1/rewards",
    request_body = CreateRewardDto,
    responses(
        (status = 201, description = "Record created", body = ApiResponse<Reward>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Student not found", body = ErrorBody)
    ),
    tag = "Rewards",
    security(("bearer_auth" = []))
)]
pub async fn create_reward(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateRewardDto>,
) -> Result<ApiResponse<Reward>, AppError> {
    let reward = RewardService::create_reward(&state.db, dto).await?;
    Ok(ApiResponse::created("Record created", reward))
}

#[utoipa::path(
    delete,
    path = "/api/v1/rewards/{id}",
    params(("id" = Uuid, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record deleted", body = MessageResponse),
        (status = 404, description = "Record not found", body = ErrorBody)
    ),
    tag = "Rewards",
    security(("bearer_auth" = []))
)]
pub async fn delete_reward(
    State(state): State<AppState>,
    Path(id): Path<RewardId>,
) -> Result<MessageResponse, AppError> {
    RewardService::delete_reward(&state.db, id).await?;
    Ok(MessageResponse::ok("Record deleted"))
}
