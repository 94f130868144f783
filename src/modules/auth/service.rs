use anyhow::anyhow;
use axum::http::StatusCode;
use rollbook_auth::TokenService;
use rollbook_core::{AppError, hash_password, verify_dummy_password, verify_password};
use rollbook_models::UserId;
use rollbook_models::auth::{ChangePasswordRequest, LoginRequest, LoginResponse, MeResponse};
use rollbook_models::users::UserCredentials;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::metrics::{track_login_failure, track_login_success, track_token_issued};
use crate::modules::roles::service::resolve_permission_set;
use crate::modules::users::UserService;

const INVALID_CREDENTIALS: &str = "invalid username or password";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, tokens, dto), fields(username = %dto.username))]
    pub async fn login(
        db: &PgPool,
        tokens: &TokenService,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, username, password_hash, role_id, is_active FROM users WHERE username = $1",
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await?;

        let Some(credentials) = credentials else {
            verify_dummy_password(&dto.password);
            track_login_failure("unknown_user");
            return Err(AppError::new(StatusCode::UNAUTHORIZED, anyhow!(INVALID_CREDENTIALS)));
        };

        if !verify_password(&dto.password, &credentials.password_hash)? {
            track_login_failure("wrong_password");
            return Err(AppError::new(StatusCode::UNAUTHORIZED, anyhow!(INVALID_CREDENTIALS)));
        }

        if !credentials.is_active {
            track_login_failure("inactive");
            warn!(user_id = %credentials.id, "Login refused for inactive account");
            return Err(AppError::forbidden("Account is disabled"));
        }

        let token = tokens
            .issue(
                credentials.id.into_inner(),
                &credentials.username,
                credentials.role_id.into_inner(),
            )
            .map_err(AppError::internal)?;
        track_token_issued();

        let user = UserService::get_user(db, credentials.id).await?;
        let profile = UserService::profile_summary(db, &user.profile).await?;
        let permissions = resolve_permission_set(db, credentials.role_id).await?;

        track_login_success();
        info!(user_id = %credentials.id, "User logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.ttl_seconds(),
            user,
            profile,
            permissions,
        })
    }

    #[instrument(skip(db))]
    pub async fn me(db: &PgPool, user_id: UserId) -> Result<MeResponse, AppError> {
        let user = UserService::get_user(db, user_id).await?;
        let profile = UserService::profile_summary(db, &user.profile).await?;
        let permissions = resolve_permission_set(db, user.role_id).await?;

        Ok(MeResponse {
            user,
            profile,
            permissions,
        })
    }

    /// Changes the caller's password. Tokens issued before the change stay valid
    /// until they expire.
    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        user_id: UserId,
        dto: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let current_hash: String =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        if !verify_password(&dto.old_password, &current_hash)? {
            return Err(AppError::bad_request(anyhow!("Current password is incorrect")));
        }

        let new_hash = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(&new_hash)
            .execute(db)
            .await?;

        info!(%user_id, "Password changed");
        Ok(())
    }
}
