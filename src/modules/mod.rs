pub mod attendance;
pub mod auth;
pub mod classes;
pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod notifications;
pub mod parents;
pub mod rewards;
pub mod roles;
pub mod schedules;
pub mod stats;
pub mod students;
pub mod users;
