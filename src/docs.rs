use rollbook_core::errors::ErrorBody;
use rollbook_core::permissions::PermissionSet;
use rollbook_core::{MessageResponse, PaginationParams};
use rollbook_models::ProfileSummary;
use rollbook_models::attendance::{
    Attendance, AttendanceStatus, AttendanceTally, RecordAttendanceDto,
};
use rollbook_models::auth::{ChangePasswordRequest, LoginRequest, LoginResponse, MeResponse};
use rollbook_models::classes::{Class, ClassDeletion, ClassDetail, CreateClassDto, UpdateClassDto};
use rollbook_models::courses::{Course, CourseBrief, CourseDeletion, CreateCourseDto, UpdateCourseDto};
use rollbook_models::enrollments::{EnrollDto, Enrollment, EnrollmentDetail, Unenrollment};
use rollbook_models::grades::{
    Grade, GradeAuditLog, GradeDetail, RecordGradeDto, RecordedGrade, UpdateGradeDto,
};
use rollbook_models::notifications::{
    Delivery, DeliveryChannel, Notification, NotificationDispatch, SendNotificationDto,
};
use rollbook_models::parents::{CreateParentDto, Parent, UpdateParentDto};
use rollbook_models::rewards::{CreateRewardDto, Reward, RewardKind};
use rollbook_models::roles::{
    CreateRoleDto, Permission, PermissionCatalog, ReplaceRolePermissionsDto, Role,
    RolePermissions, RoleSummary, UpdateRoleDto,
};
use rollbook_models::schedules::{CreateScheduleDto, Schedule, UpdateScheduleDto};
use rollbook_models::stats::{
    AttendanceSummary, CoursePopularity, DashboardStats, GenderSplit, GradeBucket, GradeSummary,
    OverviewStats,
};
use rollbook_models::students::{
    CreateStudentDto, Student, StudentBrief, StudentDeletion, UpdateStudentDto,
};
use rollbook_models::users::{CreateUserDto, UpdateUserDto, User};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::change_password,
        crate::modules::students::controller::list_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::enrollments::controller::list_enrollments,
        crate::modules::enrollments::controller::enroll,
        crate::modules::enrollments::controller::unenroll,
        crate::modules::grades::controller::list_grades,
        crate::modules::grades::controller::record_grade,
        crate::modules::grades::controller::update_grade,
        crate::modules::grades::controller::grades_by_student,
        crate::modules::grades::controller::grades_by_course,
        crate::modules::grades::controller::list_audit_logs,
        crate::modules::classes::controller::list_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::schedules::controller::list_schedules,
        crate::modules::schedules::controller::get_schedule,
        crate::modules::schedules::controller::create_schedule,
        crate::modules::schedules::controller::update_schedule,
        crate::modules::schedules::controller::delete_schedule,
        crate::modules::attendance::controller::list_attendance,
        crate::modules::attendance::controller::student_attendance,
        crate::modules::attendance::controller::attendance_stats,
        crate::modules::attendance::controller::record_attendance,
        crate::modules::attendance::controller::delete_attendance,
        crate::modules::rewards::controller::list_rewards,
        crate::modules::rewards::controller::student_rewards,
        crate::modules::rewards::controller::create_reward,
        crate::modules::rewards::controller::delete_reward,
        crate::modules::parents::controller::list_parents,
        crate::modules::parents::controller::create_parent,
        crate::modules::parents::controller::update_parent,
        crate::modules::parents::controller::delete_parent,
        crate::modules::notifications::controller::list_notifications,
        crate::modules::notifications::controller::send_notification,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::roles::controller::list_permissions,
        crate::modules::roles::controller::list_roles,
        crate::modules::roles::controller::create_role,
        crate::modules::roles::controller::update_role,
        crate::modules::roles::controller::delete_role,
        crate::modules::roles::controller::get_role_permissions,
        crate::modules::roles::controller::replace_role_permissions,
        crate::modules::stats::controller::overview,
        crate::modules::stats::controller::dashboard,
    ),
    components(
        schemas(
            ErrorBody,
            MessageResponse,
            PaginationParams,
            PermissionSet,
            LoginRequest,
            LoginResponse,
            MeResponse,
            ChangePasswordRequest,
            ProfileSummary,
            User,
            CreateUserDto,
            UpdateUserDto,
            Permission,
            PermissionCatalog,
            Role,
            RoleSummary,
            RolePermissions,
            CreateRoleDto,
            UpdateRoleDto,
            ReplaceRolePermissionsDto,
            Student,
            StudentBrief,
            StudentDeletion,
            CreateStudentDto,
            UpdateStudentDto,
            Course,
            CourseBrief,
            CourseDeletion,
            CreateCourseDto,
            UpdateCourseDto,
            Enrollment,
            EnrollmentDetail,
            EnrollDto,
            Unenrollment,
            Grade,
            GradeDetail,
            GradeAuditLog,
            RecordGradeDto,
            RecordedGrade,
            UpdateGradeDto,
            Class,
            ClassDetail,
            ClassDeletion,
            CreateClassDto,
            UpdateClassDto,
            Schedule,
            CreateScheduleDto,
            UpdateScheduleDto,
            Attendance,
            AttendanceStatus,
            AttendanceTally,
            RecordAttendanceDto,
            Reward,
            RewardKind,
            CreateRewardDto,
            Parent,
            CreateParentDto,
            UpdateParentDto,
            Notification,
            NotificationDispatch,
            SendNotificationDto,
            Delivery,
            DeliveryChannel,
            OverviewStats,
            DashboardStats,
            GenderSplit,
            AttendanceSummary,
            GradeSummary,
            GradeBucket,
            CoursePopularity,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and session endpoints"),
        (name = "Students", description = "Student records"),
        (name = "Courses", description = "Course records"),
        (name = "Enrollments", description = "Student-course enrollments"),
        (name = "Grades", description = "Grades and their change history"),
        (name = "Classes", description = "Classes and their rosters"),
        (name = "Schedules", description = "Weekly timetable"),
        (name = "Attendance", description = "Attendance marks and tallies"),
        (name = "Rewards", description = "Rewards and disciplinary records"),
        (name = "Parents", description = "Parent contacts"),
        (name = "Notifications", description = "Notices and their delivery"),
        (name = "Users", description = "Account management"),
        (name = "Roles", description = "Roles and permission assignment"),
        (name = "Stats", description = "Admin overview and dashboard")
    ),
    info(
        title = "Rollbook API",
        version = "0.1.0",
        description = "School administration backend with role-based access control.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_guarded_path_declares_bearer_auth() {
        let doc = ApiDoc::openapi();
        let public = ["/api/v1/auth/login", "/api/v1/auth/logout"];

        for (path, item) in doc.paths.paths.iter() {
            let ops = [&item.get, &item.post, &item.put, &item.delete];
            for op in ops.into_iter().flatten() {
                let secured = op.security.as_ref().is_some_and(|s| !s.is_empty());
                assert_eq!(
                    secured,
                    !public.contains(&path.as_str()),
                    "unexpected security on {}",
                    path
                );
            }
        }
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
