use axum::extract::{Path, Query, State};
use rollbook_core::errors::ErrorBody;
use rollbook_core::{ApiResponse, AppError, MessageResponse, Paginated, PaginationParams};
use rollbook_models::ScheduleId;
use rollbook_models::schedules::{
    CreateScheduleDto, Schedule, ScheduleFilterParams, UpdateScheduleDto,
};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::ScheduleService;

#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    params(
        ("class_id" = Option<Uuid>, Query, description = "Filter by class"),
        ("course_id" = Option<Uuid>, Query, description = "Filter by course"),
        ("teacher_id" = Option<Uuid>, Query, description = "Filter by teacher"),
        ("semester" = Option<String>, Query, description = "Filter by semester"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated timetable slots", body = ApiResponse<Paginated<Schedule>>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
pub async fn list_schedules(
    State(state): State<AppState>,
    Query(filter): Query<ScheduleFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Paginated<Schedule>>, AppError> {
    let schedules = ScheduleService::list_schedules(&state.db, filter, pagination).await?;
    Ok(ApiResponse::ok("success", schedules))
}

#[utoipa::path(
    get,
    path = "/api/v1/schedules/{id}",
    params(("id" = Uuid, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Timetable slot", body = ApiResponse<Schedule>),
        (status = 404, description = "Schedule not found", body = ErrorBody)
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<ScheduleId>,
) -> Result<ApiResponse<Schedule>, AppError> {
    let schedule = ScheduleService::get_schedule(&state.db, id).await?;
    Ok(ApiResponse::ok("success", schedule))
}

#[utoipa::path(
    post,
    path = "/api/v1/schedules",
    request_body = CreateScheduleDto,
    responses(
        (status = 201, description = "Schedule created", body = ApiResponse<Schedule>),
        (status = 400, description = "Invalid request or unknown course, class or teacher", body = ErrorBody)
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
pub async fn create_schedule(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateScheduleDto>,
) -> Result<ApiResponse<Schedule>, AppError> {
    let schedule = ScheduleService::create_schedule(&state.db, dto).await?;
    Ok(ApiResponse::created("Schedule created", schedule))
}

#[utoipa::path(
    put,
    path = "/api/v1/schedules/{id}",
    params(("id" = Uuid, Path, description = "Schedule ID")),
    request_body = UpdateScheduleDto,
    responses(
        (status = 200, description = "Schedule updated", body = ApiResponse<Schedule>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Schedule not found", body = ErrorBody)
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<ScheduleId>,
    ValidatedJson(dto): ValidatedJson<UpdateScheduleDto>,
) -> Result<ApiResponse<Schedule>, AppError> {
    let schedule = ScheduleService::update_schedule(&state.db, id, dto).await?;
    Ok(ApiResponse::ok("Schedule updated", schedule))
}

#[utoipa::path(
    delete,
    path = "/api/v1/schedules/{id}",
    params(("id" = Uuid, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule deleted", body = MessageResponse),
        (status = 404, description = "Schedule not found", body = ErrorBody)
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<ScheduleId>,
) -> Result<MessageResponse, AppError> {
    ScheduleService::delete_schedule(&state.db, id).await?;
    Ok(MessageResponse::ok("Schedule deleted"))
}
