//! Parent contacts. Each row belongs to exactly one student.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ParentId, StudentId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Parent {
    pub id: ParentId,
    pub student_id: StudentId,
    pub student_name: String,
    pub student_code: String,
    pub name: String,
    pub phone: Option<String>,
    /// e.g. `mother`, `guardian`.
    pub relation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The student is addressed by code, as at enrollment.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateParentDto {
    #[validate(length(min = 1, max = 32, message = "Student code is required"))]
    pub student_code: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 32, message = "Phone must be 1-32 characters"))]
    pub phone: String,
    #[validate(length(min = 1, max = 20, message = "Relation must be 1-20 characters"))]
    pub relation: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateParentDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 32, message = "Phone must be 1-32 characters"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Relation must be 1-20 characters"))]
    pub relation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ParentFilterParams {
    /// Substring of the student's code.
    pub student_code: Option<String>,
    pub student_id: Option<StudentId>,
}
