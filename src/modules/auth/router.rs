use axum::{
    Router,
    middleware,
    routing::{get, post, put},
};

use crate::middleware::auth::authenticate;
use crate::state::AppState;

use super::controller::{change_password, login, logout, me};

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/me", get(me))
        .route("/password", put(change_password))
        .route_layer(middleware::from_fn_with_state(state, authenticate));

    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(authenticated)
}
