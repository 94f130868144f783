//! Roles, catalog permissions, and the assignment between them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{PermissionId, RoleId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Permission {
    pub id: PermissionId,
    /// Stable key such as `student:create`.
    pub key: String,
    /// Display name.
    pub name: String,
    #[serde(rename = "group")]
    pub group_tag: String,
    pub created_at: DateTime<Utc>,
}

/// The catalog as a flat list plus the same rows bucketed by group.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PermissionCatalog {
    pub list: Vec<Permission>,
    pub grouped: BTreeMap<String, Vec<Permission>>,
}

impl PermissionCatalog {
    pub fn new(list: Vec<Permission>) -> Self {
        let mut grouped: BTreeMap<String, Vec<Permission>> = BTreeMap::new();
        for permission in &list {
            grouped
                .entry(permission.group_tag.clone())
                .or_default()
                .push(permission.clone());
        }
        Self { list, grouped }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List row for the role admin screen.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct RoleSummary {
    pub id: RoleId,
    pub name: String,
    pub permission_count: i64,
    pub user_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RolePermissions {
    pub role_id: RoleId,
    pub role_name: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoleDto {
    #[validate(length(min = 1, max = 50, message = "Role name must be 1-50 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleDto {
    #[validate(length(min = 1, max = 50, message = "Role name must be 1-50 characters"))]
    pub name: String,
}

/// Full replacement of a role's permission keys. An empty list revokes everything.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplaceRolePermissionsDto {
    #[validate(length(max = 200, message = "Too many permission keys"))]
    pub permissions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RoleFilterParams {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permission(key: &str, group: &str) -> Permission {
        Permission {
            id: PermissionId::new(),
            key: key.to_string(),
            name: key.to_string(),
            group_tag: group.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_catalog_groups_rows() {
        let catalog = PermissionCatalog::new(vec![
            permission("grade:read", "grade"),
            permission("student:read", "student"),
            permission("grade:create", "grade"),
        ]);

        assert_eq!(catalog.list.len(), 3);
        assert_eq!(catalog.grouped.len(), 2);
        let grade_keys: Vec<_> = catalog.grouped["grade"].iter().map(|p| p.key.as_str()).collect();
        assert_eq!(grade_keys, vec!["grade:read", "grade:create"]);
    }

    #[test]
    fn test_permission_serializes_group() {
        let json = serde_json::to_value(permission("class:read", "class")).unwrap();
        assert_eq!(json["group"], "class");
        assert!(json.get("group_tag").is_none());
    }

    #[test]
    fn test_role_name_validation() {
        assert!(CreateRoleDto { name: "registrar".into() }.validate().is_ok());
        assert!(CreateRoleDto { name: String::new() }.validate().is_err());
        assert!(CreateRoleDto { name: "x".repeat(51) }.validate().is_err());
    }
}
