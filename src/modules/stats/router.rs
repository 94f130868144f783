use axum::{Router, routing::get};
use rollbook_core::permissions::ADMIN_STATS_READ;

use crate::guarded;
use crate::state::AppState;

use super::controller::{dashboard, overview};

/// Routes mounted under `/admin`.
pub fn init_stats_router() -> Router<AppState> {
    Router::new()
        .route("/stats/overview", guarded!(get(overview), ADMIN_STATS_READ))
        .route("/stats/dashboard", guarded!(get(dashboard), ADMIN_STATS_READ))
}
