use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ClassId, TeacherId};
use crate::students::StudentBrief;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    /// Homeroom teacher.
    pub teacher_id: Option<TeacherId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A class with its roster.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClassDetail {
    #[serde(flatten)]
    pub class: Class,
    pub teacher_name: Option<String>,
    pub students: Vec<StudentBrief>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 100, message = "Class name must be 1-100 characters"))]
    pub name: String,
    pub teacher_id: Option<TeacherId>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClassDto {
    #[validate(length(min = 1, max = 100, message = "Class name must be 1-100 characters"))]
    pub name: Option<String>,
    pub teacher_id: Option<TeacherId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClassFilterParams {
    pub name: Option<String>,
    pub teacher_id: Option<TeacherId>,
}

/// What changed alongside a deleted class. Students stay, without a class.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassDeletion {
    pub class_id: ClassId,
    pub students_unassigned: u64,
    pub schedules_removed: u64,
}
