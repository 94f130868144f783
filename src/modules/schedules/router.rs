use axum::{
    Router,
    routing::{delete, get, post, put},
};
use rollbook_core::permissions::{
    SCHEDULE_CREATE, SCHEDULE_DELETE, SCHEDULE_READ, SCHEDULE_UPDATE,
};

use crate::guarded;
use crate::state::AppState;

use super::controller::{
    create_schedule, delete_schedule, get_schedule, list_schedules, update_schedule,
};

pub fn init_schedules_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            guarded!(get(list_schedules), SCHEDULE_READ)
                .merge(guarded!(post(create_schedule), SCHEDULE_CREATE)),
        )
        .route(
            "/{id}",
            guarded!(get(get_schedule), SCHEDULE_READ)
                .merge(guarded!(put(update_schedule), SCHEDULE_UPDATE))
                .merge(guarded!(delete(delete_schedule), SCHEDULE_DELETE)),
        )
}
