//! Daily attendance marks and their per-student tallies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{AttendanceId, StudentId, TeacherId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    /// Excused absence.
    Leave,
    Late,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Leave,
        AttendanceStatus::Late,
    ];

    /// Column value.
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Leave => "leave",
            AttendanceStatus::Late => "late",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendance {
    pub id: AttendanceId,
    pub student_id: StudentId,
    pub student_name: String,
    pub student_code: String,
    pub date: NaiveDate,
    /// One of `present`, `absent`, `leave`, `late`.
    pub status: String,
    pub reason: Option<String>,
    /// Who took the register.
    pub teacher_id: Option<TeacherId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordAttendanceDto {
    pub student_id: StudentId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
    pub teacher_id: Option<TeacherId>,
}

/// Filters for listings and tallies. Date bounds are inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct AttendanceFilterParams {
    pub student_id: Option<StudentId>,
    pub status: Option<AttendanceStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Attendance counts for one student over the filtered range.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct AttendanceTally {
    pub student_id: StudentId,
    pub student_name: String,
    pub student_code: String,
    pub present: i64,
    pub absent: i64,
    pub leave: i64,
    pub late: i64,
    pub total: i64,
}
