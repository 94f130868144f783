//! Student records, addressed externally by their human-readable `student_code`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ClassId, StudentId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub student_code: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub class_id: Option<ClassId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 32, message = "Student code must be 1-32 characters"))]
    pub student_code: String,
    #[validate(length(max = 10))]
    pub gender: Option<String>,
    #[validate(range(min = 1, max = 150, message = "Age must be between 1 and 150"))]
    pub age: Option<i32>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub class_id: Option<ClassId>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 10))]
    pub gender: Option<String>,
    #[validate(range(min = 1, max = 150, message = "Age must be between 1 and 150"))]
    pub age: Option<i32>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub class_id: Option<ClassId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StudentFilterParams {
    pub name: Option<String>,
    pub student_code: Option<String>,
    pub class_id: Option<ClassId>,
}

/// Compact student reference embedded in enrollment and grade listings.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StudentBrief {
    pub id: StudentId,
    pub name: String,
    pub student_code: String,
}

/// What was removed alongside a deleted student.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentDeletion {
    pub student_id: StudentId,
    pub enrollments_removed: u64,
    pub grades_removed: u64,
}
