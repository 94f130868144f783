//! User credential records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::ids::{RoleId, UserId};
use crate::profile::{ProfileRef, ProfileRefError};

/// A `users` row joined with its role name.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub role_id: RoleId,
    /// `None` when the role was deleted after the user was created.
    pub role_name: Option<String>,
    pub is_active: bool,
    pub profile_type: String,
    pub profile_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the login path needs to check a password.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role_id: RoleId,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role_id: RoleId,
    pub role_name: Option<String>,
    pub is_active: bool,
    #[schema(value_type = Object)]
    pub profile: ProfileRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = ProfileRefError;

    fn try_from(row: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            profile: ProfileRef::from_parts(&row.profile_type, row.profile_id)?,
            id: row.id,
            username: row.username,
            role_id: row.role_id,
            role_name: row.role_name,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
    pub role_id: RoleId,
    pub is_active: Option<bool>,
    #[schema(value_type = Option<Object>)]
    pub profile: Option<ProfileRef>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: Option<String>,
    pub role_id: Option<RoleId>,
    pub is_active: Option<bool>,
    #[schema(value_type = Option<Object>)]
    pub profile: Option<ProfileRef>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserFilterParams {
    pub username: Option<String>,
    pub role_id: Option<RoleId>,
    pub is_active: Option<bool>,
}
