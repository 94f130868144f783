//! Grades recorded against enrollments, and their change history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{CourseId, EnrollmentId, GradeId, StudentId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Grade {
    pub id: GradeId,
    pub enrollment_id: EnrollmentId,
    /// Free-form tag such as `midterm` or `final`.
    pub score_type: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Scores are stored as given; there is no range check.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordGradeDto {
    pub student_id: StudentId,
    pub course_id: CourseId,
    #[validate(length(min = 1, max = 50, message = "Score type must be 1-50 characters"))]
    pub score_type: String,
    pub score: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateGradeDto {
    pub score: f64,
    #[validate(length(min = 1, max = 50, message = "Score type must be 1-50 characters"))]
    pub score_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecordedGrade {
    pub grade: Grade,
    /// True when no enrollment existed and one was created for this grade.
    pub enrollment_created: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GradeAuditLog {
    pub id: i64,
    pub grade_id: GradeId,
    pub old_score: f64,
    pub new_score: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditLogFilterParams {
    pub grade_id: Option<GradeId>,
}

/// A grade with the student and course it belongs to, for listings.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct GradeDetail {
    pub id: GradeId,
    pub enrollment_id: EnrollmentId,
    pub student_id: StudentId,
    pub student_name: String,
    pub student_code: String,
    pub course_id: CourseId,
    pub course_name: String,
    pub score_type: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GradeFilterParams {
    pub student_id: Option<StudentId>,
    pub course_id: Option<CourseId>,
    pub score_type: Option<String>,
}
