use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::auth::authenticate;
use crate::modules::attendance::init_attendance_router;
use crate::modules::auth::init_auth_router;
use crate::modules::classes::init_classes_router;
use crate::modules::courses::init_courses_router;
use crate::modules::enrollments::init_enrollments_router;
use crate::modules::grades::init_grades_router;
use crate::modules::notifications::init_notifications_router;
use crate::modules::parents::init_parents_router;
use crate::modules::rewards::init_rewards_router;
use crate::modules::roles::init_roles_router;
use crate::modules::schedules::init_schedules_router;
use crate::modules::stats::init_stats_router;
use crate::modules::students::init_students_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

/// Builds the application router.
///
/// Every route under `/api/v1` except `/auth/login` and `/auth/logout` runs
/// [`authenticate`] first; permission guards are attached per route by the
/// feature routers.
pub fn init_router(state: AppState) -> Router {
    let authenticated = || middleware::from_fn_with_state(state.clone(), authenticate);

    let admin = init_roles_router()
        .merge(init_users_router())
        .merge(init_stats_router());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", init_auth_router(state.clone()))
                .nest("/students", init_students_router().route_layer(authenticated()))
                .nest("/courses", init_courses_router().route_layer(authenticated()))
                .nest("/enrollments", init_enrollments_router().route_layer(authenticated()))
                .nest("/grades", init_grades_router().route_layer(authenticated()))
                .nest("/classes", init_classes_router().route_layer(authenticated()))
                .nest("/schedules", init_schedules_router().route_layer(authenticated()))
                .nest("/attendance", init_attendance_router().route_layer(authenticated()))
                .nest("/rewards", init_rewards_router().route_layer(authenticated()))
                .nest("/parents", init_parents_router().route_layer(authenticated()))
                .nest(
                    "/notifications",
                    init_notifications_router().route_layer(authenticated()),
                )
                .nest("/admin", admin.route_layer(authenticated())),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}
