//! Weekly timetable slots tying a course to a class.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ClassId, CourseId, ScheduleId, TeacherId};

/// A slot with the names of what it links, for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Schedule {
    pub id: ScheduleId,
    pub course_id: CourseId,
    pub course_name: String,
    pub class_id: ClassId,
    pub class_name: String,
    pub teacher_id: Option<TeacherId>,
    pub teacher_name: Option<String>,
    /// 1 = Monday .. 7 = Sunday.
    pub day_of_week: i16,
    /// `08:00` or a period label such as `1-2`.
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
    pub semester: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateScheduleDto {
    pub course_id: CourseId,
    pub class_id: ClassId,
    pub teacher_id: Option<TeacherId>,
    #[validate(range(min = 1, max = 7, message = "Day of week must be between 1 and 7"))]
    pub day_of_week: i16,
    #[validate(length(min = 1, max = 20))]
    pub start_time: String,
    #[validate(length(min = 1, max = 20))]
    pub end_time: String,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[validate(length(max = 32))]
    pub semester: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateScheduleDto {
    pub course_id: Option<CourseId>,
    pub class_id: Option<ClassId>,
    pub teacher_id: Option<TeacherId>,
    #[validate(range(min = 1, max = 7, message = "Day of week must be between 1 and 7"))]
    pub day_of_week: Option<i16>,
    #[validate(length(min = 1, max = 20))]
    pub start_time: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub end_time: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[validate(length(max = 32))]
    pub semester: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleFilterParams {
    pub class_id: Option<ClassId>,
    pub course_id: Option<CourseId>,
    pub teacher_id: Option<TeacherId>,
    pub semester: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day_of_week: i16) -> CreateScheduleDto {
        CreateScheduleDto {
            course_id: CourseId::new(),
            class_id: ClassId::new(),
            teacher_id: None,
            day_of_week,
            start_time: "08:00".into(),
            end_time: "09:40".into(),
            location: None,
            semester: Some("2025-Fall".into()),
        }
    }

    #[test]
    fn test_day_of_week_range() {
        assert!(slot(1).validate().is_ok());
        assert!(slot(7).validate().is_ok());
        assert!(slot(0).validate().is_err());
        assert!(slot(8).validate().is_err());
    }

    #[test]
    fn test_update_checks_day_only_when_given() {
        assert!(UpdateScheduleDto::default().validate().is_ok());
        let dto = UpdateScheduleDto {
            day_of_week: Some(9),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}
