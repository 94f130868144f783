use axum::{
    Router,
    routing::{get, post},
};
use rollbook_core::permissions::{NOTIFICATION_CREATE, NOTIFICATION_READ};

use crate::guarded;
use crate::state::AppState;

use super::controller::{list_notifications, send_notification};

pub fn init_notifications_router() -> Router<AppState> {
    Router::new().route(
        "/",
        guarded!(get(list_notifications), NOTIFICATION_READ)
            .merge(guarded!(post(send_notification), NOTIFICATION_CREATE)),
    )
}
