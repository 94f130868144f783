//! The (student, course) join entity.
//!
//! At most one enrollment exists per pair; the database enforces it with a unique
//! constraint and the service maps the violation to a conflict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::courses::CourseBrief;
use crate::grades::Grade;
use crate::ids::{CourseId, EnrollmentId, StudentId};
use crate::students::StudentBrief;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub created_at: DateTime<Utc>,
}

/// Flat join row, see [`EnrollmentDetail`].
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentDetailRow {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub student_name: String,
    pub student_code: String,
    pub course_id: CourseId,
    pub course_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EnrollmentDetail {
    pub id: EnrollmentId,
    pub student: StudentBrief,
    pub course: CourseBrief,
    pub created_at: DateTime<Utc>,
    pub grades: Vec<Grade>,
}

impl EnrollmentDetail {
    pub fn from_row(row: EnrollmentDetailRow, grades: Vec<Grade>) -> Self {
        Self {
            id: row.id,
            student: StudentBrief {
                id: row.student_id,
                name: row.student_name,
                student_code: row.student_code,
            },
            course: CourseBrief {
                id: row.course_id,
                name: row.course_name,
            },
            created_at: row.created_at,
            grades,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EnrollDto {
    #[validate(length(min = 1, max = 32, message = "Student code is required"))]
    pub student_code: String,
    pub course_id: CourseId,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnrollmentFilterParams {
    pub student_id: Option<StudentId>,
    pub course_id: Option<CourseId>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Unenrollment {
    pub enrollment_id: EnrollmentId,
    pub grades_removed: u64,
}
