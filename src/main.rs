use anyhow::Context;
use dotenvy::dotenv;
use rollbook::config::{CorsConfig, DatabaseConfig, JwtConfig, ServerConfig};
use rollbook::logging::{init_tracing, shutdown_tracer};
use rollbook::metrics::{init_metrics, metrics_app};
use rollbook::router::init_router;
use rollbook::state::AppState;
use rollbook_db::{init_db_pool, run_migrations, seed::seed_defaults};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing().context("failed to initialise logging")?;

    let db_config = DatabaseConfig::from_env()?;
    let db = init_db_pool(&db_config)
        .await
        .context("failed to connect to database")?;
    run_migrations(&db).await.context("failed to run migrations")?;
    seed_defaults(&db).await.context("failed to seed built-in roles")?;

    let jwt_config = JwtConfig::from_env();
    if jwt_config.uses_default_secret() {
        warn!("JWT_SECRET is not set; tokens are signed with the development secret");
    }

    let state = AppState::new(db, &jwt_config, CorsConfig::from_env());
    let mut app = init_router(state);

    match init_metrics() {
        Ok(Some(handle)) => app = app.merge(metrics_app(handle)),
        Ok(None) => info!("Observability disabled; /metrics not mounted"),
        Err(e) => warn!(error = %e, "Failed to install Prometheus recorder"),
    }

    let server = ServerConfig::from_env();
    let listener = tokio::net::TcpListener::bind(&server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", server.bind_addr))?;

    info!(addr = %server.bind_addr, "Server listening");
    info!("Swagger UI at /swagger-ui, Scalar at /scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracer();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => warn!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
