use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::CourseId;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct OverviewStats {
    pub users_total: i64,
    pub users_active: i64,
    pub students_total: i64,
    pub teachers_total: i64,
    pub classes_total: i64,
    pub courses_total: i64,
    pub enrollments_total: i64,
    pub grades_total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow, ToSchema)]
pub struct GenderSplit {
    pub male: i64,
    pub female: i64,
    /// Any other recorded value.
    pub other: i64,
    pub unspecified: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    pub present: i64,
    pub absent: i64,
    pub leave: i64,
    pub late: i64,
    /// Share of marks that are `present` or `late`, 0.0 when there are none.
    pub attendance_rate: f64,
}

impl AttendanceSummary {
    pub fn total(&self) -> i64 {
        self.present + self.absent + self.leave + self.late
    }

    pub fn with_rate(mut self) -> Self {
        let total = self.total();
        self.attendance_rate = if total == 0 {
            0.0
        } else {
            (self.present + self.late) as f64 / total as f64
        };
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct GradeBucket {
    /// `<60`, `60-69`, `70-79`, `80-89` or `>=90`.
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GradeSummary {
    /// `None` when no grades exist.
    pub average_score: Option<f64>,
    pub total_grades: i64,
    /// All five buckets, lowest first, including empty ones.
    pub distribution: Vec<GradeBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct CoursePopularity {
    pub course_id: CourseId,
    pub course_name: String,
    pub enrollments: i64,
}

/// Aggregates for the dashboard, computed in SQL.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub student_gender: GenderSplit,
    pub attendance: AttendanceSummary,
    pub grades: GradeSummary,
    pub classes_total: i64,
    pub courses_total: i64,
    /// The five most enrolled courses.
    pub course_popularity: Vec<CoursePopularity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_rate_counts_late_as_attended() {
        let summary = AttendanceSummary {
            present: 6,
            absent: 2,
            leave: 0,
            late: 2,
            attendance_rate: 0.0,
        }
        .with_rate();
        assert_eq!(summary.total(), 10);
        assert!((summary.attendance_rate - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_attendance_rate_without_marks() {
        assert_eq!(AttendanceSummary::default().with_rate().attendance_rate, 0.0);
    }
}
