//! # Rollbook Models
//!
//! Database rows, request DTOs and response bodies for the Rollbook API.
//!
//! - [`ids`]: typed `Uuid` identifiers
//! - [`profile`]: [`ProfileRef`], the user-to-profile link
//! - [`auth`]: login and session payloads
//! - [`users`]: credential records
//! - [`roles`]: roles, permissions and their assignment
//! - [`students`], [`courses`], [`enrollments`], [`grades`]: the school domain
//! - [`classes`], [`schedules`], [`parents`], [`attendance`], [`rewards`],
//!   [`notifications`]: school records around it
//! - [`stats`]: admin overview counters and dashboard aggregates

pub mod attendance;
pub mod auth;
pub mod classes;
pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod ids;
pub mod notifications;
pub mod parents;
pub mod profile;
pub mod rewards;
pub mod roles;
pub mod schedules;
pub mod stats;
pub mod students;
pub mod users;

pub use ids::{
    AttendanceId, ClassId, CourseId, EnrollmentId, GradeId, NotificationId, ParentId,
    PermissionId, RewardId, RoleId, ScheduleId, StudentId, TeacherId, UserId,
};
pub use profile::{ProfileRef, ProfileRefError, ProfileSummary};
