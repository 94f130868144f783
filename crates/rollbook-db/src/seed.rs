//! Bootstrap data: built-in roles, the permission catalog, default grants and
//! the first administrator account.
//!
//! Everything here is safe to run on every start. Whether a step already ran is
//! decided by the rows present, never by a flag:
//!
//! - roles and permissions are inserted with `ON CONFLICT DO NOTHING` on their
//!   unique name/key;
//! - a built-in role receives its default grants only while it has no
//!   permissions at all. Once an operator has configured a role, later releases
//!   do not push new defaults onto it.

use rollbook_core::hash_password;
use rollbook_core::permissions::{BuiltinRole, CATALOG};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Key for the transaction-scoped advisory lock that serializes concurrent seeders.
const SEED_LOCK_KEY: i64 = 0x726f_6c6c_626f_6f6b;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("the built-in admin role is missing; run the bootstrap seed first")]
    MissingAdminRole,
    #[error("failed to hash password: {0}")]
    PasswordHash(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: u64,
    pub permissions_created: u64,
    /// Built-in roles that received their default grants during this run.
    pub roles_granted: Vec<&'static str>,
}

/// Runs the whole bootstrap sequence in one transaction.
pub async fn seed_defaults(pool: &PgPool) -> Result<SeedReport, SeedError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SEED_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    let roles_created = ensure_builtin_roles(&mut tx).await?;
    let permissions_created = ensure_permission_catalog(&mut *tx).await?;
    let roles_granted = grant_default_permissions(&mut tx).await?;

    tx.commit().await?;

    let report = SeedReport {
        roles_created,
        permissions_created,
        roles_granted,
    };
    tracing::info!(
        roles_created = report.roles_created,
        permissions_created = report.permissions_created,
        roles_granted = ?report.roles_granted,
        "Bootstrap seeding finished"
    );

    Ok(report)
}

pub async fn ensure_builtin_roles(tx: &mut Transaction<'_, Postgres>) -> Result<u64, sqlx::Error> {
    let names: Vec<String> = BuiltinRole::ALL.iter().map(|r| r.name().to_string()).collect();

    let result = sqlx::query(
        "INSERT INTO roles (name) SELECT unnest($1::text[]) ON CONFLICT (name) DO NOTHING",
    )
    .bind(&names)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

/// Inserts every catalog key that is not stored yet. Returns how many were added.
pub async fn ensure_permission_catalog<'e, E>(executor: E) -> Result<u64, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let keys: Vec<String> = CATALOG.iter().map(|e| e.key.to_string()).collect();
    let names: Vec<String> = CATALOG.iter().map(|e| e.name.to_string()).collect();
    let groups: Vec<String> = CATALOG.iter().map(|e| e.group.to_string()).collect();

    let result = sqlx::query(
        r#"INSERT INTO permissions (key, name, group_tag)
        SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[])
        ON CONFLICT (key) DO NOTHING"#,
    )
    .bind(&keys)
    .bind(&names)
    .bind(&groups)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Grants defaults to each built-in role that currently holds no permissions.
pub async fn grant_default_permissions(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Vec<&'static str>, sqlx::Error> {
    let mut granted = Vec::new();

    for role in BuiltinRole::ALL {
        let Some(role_id) = sqlx::query_scalar::<_, Uuid>("SELECT id FROM roles WHERE name = $1")
            .bind(role.name())
            .fetch_optional(&mut **tx)
            .await?
        else {
            continue;
        };

        let assigned: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM role_permissions WHERE role_id = $1")
                .bind(role_id)
                .fetch_one(&mut **tx)
                .await?;

        if assigned > 0 {
            continue;
        }

        let keys: Vec<String> = role.default_grants().into_iter().map(str::to_string).collect();
        sqlx::query(
            r#"INSERT INTO role_permissions (role_id, permission_id)
            SELECT $1, id FROM permissions WHERE key = ANY($2)
            ON CONFLICT DO NOTHING"#,
        )
        .bind(role_id)
        .bind(&keys)
        .execute(&mut **tx)
        .await?;

        granted.push(role.name());
    }

    Ok(granted)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapAdmin {
    Created { user_id: Uuid },
    AlreadyExists,
}

pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "admin123";

/// Creates the first administrator account unless the username is taken.
///
/// Requires the built-in `admin` role, see [`seed_defaults`].
pub async fn create_bootstrap_admin(
    pool: &PgPool,
    username: &str,
    password: &str,
) -> Result<BootstrapAdmin, SeedError> {
    let admin_role: Option<Uuid> = sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
        .bind(BuiltinRole::Admin.name())
        .fetch_optional(pool)
        .await?;
    let admin_role = admin_role.ok_or(SeedError::MissingAdminRole)?;

    let password_hash =
        hash_password(password).map_err(|e| SeedError::PasswordHash(e.error.to_string()))?;

    let created: Option<Uuid> = sqlx::query_scalar(
        r#"INSERT INTO users (username, password_hash, role_id, profile_type)
        VALUES ($1, $2, $3, 'admin')
        ON CONFLICT (username) DO NOTHING
        RETURNING id"#,
    )
    .bind(username)
    .bind(&password_hash)
    .bind(admin_role)
    .fetch_optional(pool)
    .await?;

    Ok(match created {
        Some(user_id) => {
            tracing::warn!(%username, "Bootstrap administrator created; rotate its password now");
            BootstrapAdmin::Created { user_id }
        }
        None => BootstrapAdmin::AlreadyExists,
    })
}
