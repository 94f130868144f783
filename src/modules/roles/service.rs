use std::collections::BTreeSet;

use anyhow::{Context, anyhow};
use rollbook_core::{AppError, Paginated, PaginationParams, PermissionSet};
use rollbook_db::seed::ensure_permission_catalog;
use rollbook_models::RoleId;
use rollbook_models::roles::{
    CreateRoleDto, Permission, PermissionCatalog, Role, RoleFilterParams, RolePermissions,
    RoleSummary, UpdateRoleDto,
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::metrics::track_role_permissions_replaced;
use crate::utils::db::conflict_on_unique;

fn role_not_found(role_id: RoleId) -> AppError {
    AppError::not_found(anyhow!("Role {} not found", role_id))
}

// ============ Permission resolution ============

/// Permission keys currently granted to `role_id`.
///
/// A role that no longer exists resolves to the empty set; the caller then
/// fails authorization rather than authentication.
#[instrument(skip(db))]
pub async fn resolve_permission_set(
    db: &PgPool,
    role_id: RoleId,
) -> Result<PermissionSet, AppError> {
    let keys: Vec<String> = sqlx::query_scalar(
        r#"SELECT p.key
        FROM role_permissions rp
        JOIN permissions p ON p.id = rp.permission_id
        WHERE rp.role_id = $1"#,
    )
    .bind(role_id)
    .fetch_all(db)
    .await
    .context("Failed to resolve role permissions")?;

    Ok(PermissionSet::from_keys(keys))
}

// ============ Permission catalog ============

/// The full catalog, grouped by tag. Seeds the built-in catalog first if the
/// table is empty.
#[instrument(skip(db))]
pub async fn list_permissions(db: &PgPool) -> Result<PermissionCatalog, AppError> {
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM permissions")
        .fetch_one(db)
        .await?;

    if stored == 0 {
        let added = ensure_permission_catalog(db)
            .await
            .context("Failed to seed permission catalog")?;
        info!(added, "Permission catalog was empty and has been seeded");
    }

    let list = sqlx::query_as::<_, Permission>(
        "SELECT id, key, name, group_tag, created_at FROM permissions ORDER BY group_tag, key",
    )
    .fetch_all(db)
    .await?;

    Ok(PermissionCatalog::new(list))
}

// ============ Roles ============

#[instrument(skip(db))]
pub async fn get_role(db: &PgPool, role_id: RoleId) -> Result<Role, AppError> {
    sqlx::query_as::<_, Role>("SELECT id, name, created_at, updated_at FROM roles WHERE id = $1")
        .bind(role_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| role_not_found(role_id))
}

#[instrument(skip(db))]
pub async fn list_roles(
    db: &PgPool,
    filter: RoleFilterParams,
    pagination: PaginationParams,
) -> Result<Paginated<RoleSummary>, AppError> {
    let name = filter.name.filter(|n| !n.trim().is_empty());

    let roles = sqlx::query_as::<_, RoleSummary>(
        r#"SELECT r.id, r.name, r.created_at, r.updated_at,
            (SELECT COUNT(*) FROM role_permissions rp WHERE rp.role_id = r.id) AS permission_count,
            (SELECT COUNT(*) FROM users u WHERE u.role_id = r.id) AS user_count
        FROM roles r
        WHERE ($1::text IS NULL OR r.name ILIKE '%' || $1 || '%')
        ORDER BY r.created_at, r.name
        LIMIT $2 OFFSET $3"#,
    )
    .bind(&name)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(db)
    .await?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM roles r WHERE ($1::text IS NULL OR r.name ILIKE '%' || $1 || '%')",
    )
    .bind(&name)
    .fetch_one(db)
    .await?;

    Ok(Paginated::new(roles, total, &pagination))
}

#[instrument(skip(db))]
pub async fn create_role(db: &PgPool, dto: CreateRoleDto) -> Result<Role, AppError> {
    let name = dto.name.trim();

    let role = sqlx::query_as::<_, Role>(
        "INSERT INTO roles (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
    )
    .bind(name)
    .fetch_one(db)
    .await
    .map_err(|e| conflict_on_unique(e, format!("Role '{}' already exists", name)))?;

    info!(role_id = %role.id, name = %role.name, "Role created");
    Ok(role)
}

#[instrument(skip(db))]
pub async fn update_role(db: &PgPool, role_id: RoleId, dto: UpdateRoleDto) -> Result<Role, AppError> {
    let name = dto.name.trim();

    sqlx::query_as::<_, Role>(
        r#"UPDATE roles SET name = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, created_at, updated_at"#,
    )
    .bind(role_id)
    .bind(name)
    .fetch_optional(db)
    .await
    .map_err(|e| conflict_on_unique(e, format!("Role '{}' already exists", name)))?
    .ok_or_else(|| role_not_found(role_id))
}

/// Deletes a role and its grants. Users that reference it keep the stale
/// `role_id` and resolve to no permissions from then on.
#[instrument(skip(db))]
pub async fn delete_role(db: &PgPool, role_id: RoleId) -> Result<(), AppError> {
    let mut tx = db.begin().await?;

    let affected_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role_id = $1")
        .bind(role_id)
        .fetch_one(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(role_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(role_not_found(role_id));
    }

    tx.commit().await?;

    if affected_users > 0 {
        warn!(%role_id, affected_users, "Deleted role is still referenced by users");
    } else {
        info!(%role_id, "Role deleted");
    }

    Ok(())
}

// ============ Role permissions ============

#[instrument(skip(db))]
pub async fn get_role_permissions(
    db: &PgPool,
    role_id: RoleId,
) -> Result<RolePermissions, AppError> {
    let role = get_role(db, role_id).await?;
    let permissions = resolve_permission_set(db, role_id).await?;

    Ok(RolePermissions {
        role_id: role.id,
        role_name: role.name,
        permissions: permissions.into_vec(),
    })
}

/// Replaces the whole permission set of a role.
///
/// Every key must exist in the catalog, otherwise nothing changes. The role row
/// is locked for the duration, so concurrent replaces on one role apply one
/// after the other and the last commit wins.
#[instrument(skip(db))]
pub async fn replace_role_permissions(
    db: &PgPool,
    role_id: RoleId,
    keys: Vec<String>,
) -> Result<RolePermissions, AppError> {
    let requested: Vec<String> = keys.into_iter().collect::<BTreeSet<_>>().into_iter().collect();

    let mut tx = db.begin().await?;

    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, created_at, updated_at FROM roles WHERE id = $1 FOR UPDATE",
    )
    .bind(role_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| role_not_found(role_id))?;

    let permission_ids: Vec<Uuid> =
        sqlx::query_scalar("SELECT id FROM permissions WHERE key = ANY($1)")
            .bind(&requested)
            .fetch_all(&mut *tx)
            .await?;

    if permission_ids.len() != requested.len() {
        return Err(AppError::bad_request(anyhow!(
            "{} of {} permission keys do not exist",
            requested.len() - permission_ids.len(),
            requested.len()
        )));
    }

    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO role_permissions (role_id, permission_id) SELECT $1, unnest($2::uuid[])",
    )
    .bind(role_id)
    .bind(&permission_ids)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE roles SET updated_at = NOW() WHERE id = $1")
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    track_role_permissions_replaced(requested.len());
    info!(%role_id, count = requested.len(), "Role permissions replaced");

    Ok(RolePermissions {
        role_id: role.id,
        role_name: role.name,
        permissions: requested,
    })
}
