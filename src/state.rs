use rollbook_auth::TokenService;
use rollbook_config::{CorsConfig, JwtConfig};
use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: TokenService,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(db: PgPool, jwt_config: &JwtConfig, cors_config: CorsConfig) -> Self {
        Self {
            db,
            tokens: TokenService::new(jwt_config),
            cors_config,
        }
    }
}
