use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{CourseId, TeacherId};

pub const DEFAULT_CAPACITY: i32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub teacher_id: Option<TeacherId>,
    pub credits: f64,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 100, message = "Course name must be 1-100 characters"))]
    pub name: String,
    pub teacher_id: Option<TeacherId>,
    #[validate(range(min = 0.0, max = 100.0, message = "Credits must be between 0 and 100"))]
    pub credits: Option<f64>,
    #[validate(range(min = 1, max = 10000, message = "Capacity must be between 1 and 10000"))]
    pub capacity: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 100, message = "Course name must be 1-100 characters"))]
    pub name: Option<String>,
    pub teacher_id: Option<TeacherId>,
    #[validate(range(min = 0.0, max = 100.0, message = "Credits must be between 0 and 100"))]
    pub credits: Option<f64>,
    #[validate(range(min = 1, max = 10000, message = "Capacity must be between 1 and 10000"))]
    pub capacity: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseFilterParams {
    pub name: Option<String>,
    pub teacher_id: Option<TeacherId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CourseBrief {
    pub id: CourseId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseDeletion {
    pub course_id: CourseId,
    pub enrollments_removed: u64,
    pub grades_removed: u64,
}
