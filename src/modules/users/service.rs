use anyhow::{Context, anyhow};
use rollbook_core::{AppError, Paginated, PaginationParams, hash_password};
use rollbook_models::users::{CreateUserDto, UpdateUserDto, User, UserFilterParams, UserRecord};
use rollbook_models::{ProfileRef, ProfileSummary, RoleId, UserId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::utils::db::conflict_on_unique;

const USER_SELECT: &str = r#"SELECT u.id, u.username, u.role_id, r.name AS role_name, u.is_active,
    u.profile_type, u.profile_id, u.created_at, u.updated_at
FROM users u
LEFT JOIN roles r ON r.id = u.role_id"#;

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilterParams) {
    qb.push(" WHERE 1=1");
    if let Some(username) = filter.username.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND u.username ILIKE ")
            .push_bind(format!("%{}%", username));
    }
    if let Some(role_id) = filter.role_id {
        qb.push(" AND u.role_id = ").push_bind(role_id);
    }
    if let Some(is_active) = filter.is_active {
        qb.push(" AND u.is_active = ").push_bind(is_active);
    }
}

fn into_user(row: UserRecord) -> Result<User, AppError> {
    User::try_from(row)
        .context("Stored profile link is invalid")
        .map_err(AppError::internal)
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: UserId) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRecord>(&format!("{} WHERE u.id = $1", USER_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        into_user(row)
    }

    #[instrument(skip(db))]
    pub async fn list_users(
        db: &PgPool,
        filter: UserFilterParams,
        pagination: PaginationParams,
    ) -> Result<Paginated<User>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(USER_SELECT);
        push_filters(&mut qb, &filter);
        qb.push(" ORDER BY u.created_at DESC, u.username LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows = qb.build_query_as::<UserRecord>().fetch_all(db).await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users u");
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        let users = rows.into_iter().map(into_user).collect::<Result<Vec<_>, _>>()?;
        Ok(Paginated::new(users, total, &pagination))
    }

    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        Self::ensure_role_exists(db, dto.role_id).await?;
        let profile = dto.profile.unwrap_or_default();
        Self::ensure_profile_exists(db, &profile).await?;

        let password_hash = hash_password(&dto.password)?;
        let (profile_type, profile_id) = profile.to_parts();

        let id: UserId = sqlx::query_scalar(
            r#"INSERT INTO users (username, password_hash, role_id, is_active, profile_type, profile_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id"#,
        )
        .bind(&dto.username)
        .bind(&password_hash)
        .bind(dto.role_id)
        .bind(dto.is_active.unwrap_or(true))
        .bind(profile_type)
        .bind(profile_id)
        .fetch_one(db)
        .await
        .map_err(|e| conflict_on_unique(e, format!("Username '{}' is already taken", dto.username)))?;

        info!(user_id = %id, "User created");
        Self::get_user(db, id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_user(db: &PgPool, id: UserId, dto: UpdateUserDto) -> Result<User, AppError> {
        if let Some(role_id) = dto.role_id {
            Self::ensure_role_exists(db, role_id).await?;
        }
        if let Some(profile) = &dto.profile {
            Self::ensure_profile_exists(db, profile).await?;
        }

        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;
        let (profile_type, profile_id) = match dto.profile {
            Some(profile) => {
                let (kind, id) = profile.to_parts();
                (Some(kind), id)
            }
            None => (None, None),
        };

        let updated = sqlx::query(
            r#"UPDATE users SET
                password_hash = COALESCE($2, password_hash),
                role_id = COALESCE($3, role_id),
                is_active = COALESCE($4, is_active),
                profile_type = COALESCE($5::text, profile_type),
                profile_id = CASE WHEN $5::text IS NULL THEN profile_id ELSE $6 END,
                updated_at = NOW()
            WHERE id = $1"#,
        )
        .bind(id)
        .bind(password_hash)
        .bind(dto.role_id)
        .bind(dto.is_active)
        .bind(profile_type)
        .bind(profile_id)
        .execute(db)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        Self::get_user(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: UserId) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn ensure_role_exists(db: &PgPool, role_id: RoleId) -> Result<(), AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM roles WHERE id = $1)")
            .bind(role_id)
            .fetch_one(db)
            .await?;

        if !exists {
            return Err(AppError::bad_request(anyhow!("Role {} does not exist", role_id)));
        }
        Ok(())
    }

    /// Rejects links to profile rows that do not exist.
    pub async fn ensure_profile_exists(db: &PgPool, profile: &ProfileRef) -> Result<(), AppError> {
        let Some((table, id)) = profile_table(profile) else {
            return Ok(());
        };

        let exists: bool =
            sqlx::query_scalar(&format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", table))
                .bind(id)
                .fetch_one(db)
                .await?;

        if !exists {
            return Err(AppError::bad_request(anyhow!(
                "{} profile {} does not exist",
                profile.kind(),
                id
            )));
        }
        Ok(())
    }

    /// Display name of the linked profile. `None` for unlinked accounts and
    /// for links whose row has since been removed.
    #[instrument(skip(db))]
    pub async fn profile_summary(
        db: &PgPool,
        profile: &ProfileRef,
    ) -> Result<Option<ProfileSummary>, AppError> {
        let Some((table, id)) = profile_table(profile) else {
            return Ok(None);
        };

        let name: Option<String> =
            sqlx::query_scalar(&format!("SELECT name FROM {} WHERE id = $1", table))
                .bind(id)
                .fetch_optional(db)
                .await?;

        Ok(name.map(|name| ProfileSummary {
            kind: profile.kind().to_string(),
            id,
            name,
        }))
    }
}

/// Table holding the profile row, for kinds that have one.
fn profile_table(profile: &ProfileRef) -> Option<(&'static str, Uuid)> {
    match profile {
        ProfileRef::None | ProfileRef::Admin => None,
        ProfileRef::Student(id) => Some(("students", id.into_inner())),
        ProfileRef::Teacher(id) => Some(("teachers", id.into_inner())),
        ProfileRef::Parent(id) => Some(("parents", id.into_inner())),
    }
}
