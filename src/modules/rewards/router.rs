use axum::{
    Router,
    routing::{delete, get, post},
};
use rollbook_core::permissions::{REWARD_CREATE, REWARD_DELETE, REWARD_READ};

use crate::guarded;
use crate::state::AppState;

use super::controller::{create_reward, delete_reward, list_rewards, student_rewards};

pub fn init_rewards_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            guarded!(get(list_rewards), REWARD_READ).merge(guarded!(post(create_reward), REWARD_CREATE)),
        )
        .route("/student/{id}", guarded!(get(student_rewards), REWARD_READ))
        .route("/{id}", guarded!(delete(delete_reward), REWARD_DELETE))
}
