//! Permission keys, the built-in catalog, and the resolved [`PermissionSet`].
//!
//! Keys are `<domain>:<action>` strings. Client UIs key off them, so they must
//! never be renamed; add new keys instead.
//!
//! # Example
//!
//! ```ignore
//! use rollbook_core::permissions::{self, PermissionSet};
//!
//! let set = PermissionSet::from_keys(["student:read"]);
//! assert!(set.contains(permissions::STUDENT_READ));
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Students
// =============================================================================

pub const STUDENT_READ: &str = "student:read";
pub const STUDENT_CREATE: &str = "student:create";
pub const STUDENT_UPDATE: &str = "student:update";
pub const STUDENT_DELETE: &str = "student:delete";

// =============================================================================
// Classes
// =============================================================================

pub const CLASS_READ: &str = "class:read";
pub const CLASS_CREATE: &str = "class:create";
pub const CLASS_UPDATE: &str = "class:update";
pub const CLASS_DELETE: &str = "class:delete";

// =============================================================================
// Courses
// =============================================================================

pub const COURSE_READ: &str = "course:read";
pub const COURSE_CREATE: &str = "course:create";
pub const COURSE_UPDATE: &str = "course:update";
pub const COURSE_DELETE: &str = "course:delete";

// =============================================================================
// Schedules
// =============================================================================

pub const SCHEDULE_READ: &str = "schedule:read";
pub const SCHEDULE_CREATE: &str = "schedule:create";
pub const SCHEDULE_UPDATE: &str = "schedule:update";
pub const SCHEDULE_DELETE: &str = "schedule:delete";

// =============================================================================
// Enrollments
// =============================================================================

pub const ENROLLMENT_READ: &str = "enrollment:read";
pub const ENROLLMENT_CREATE: &str = "enrollment:create";
pub const ENROLLMENT_DELETE: &str = "enrollment:delete";

// =============================================================================
// Grades
// =============================================================================

pub const GRADE_READ: &str = "grade:read";
pub const GRADE_CREATE: &str = "grade:create";
pub const GRADE_UPDATE: &str = "grade:update";

// =============================================================================
// Attendance
// =============================================================================

pub const ATTENDANCE_READ: &str = "attendance:read";
pub const ATTENDANCE_CREATE: &str = "attendance:create";
pub const ATTENDANCE_DELETE: &str = "attendance:delete";

// =============================================================================
// Rewards and punishments
// =============================================================================

pub const REWARD_READ: &str = "reward:read";
pub const REWARD_CREATE: &str = "reward:create";
pub const REWARD_DELETE: &str = "reward:delete";

// =============================================================================
// Parents
// =============================================================================

pub const PARENT_READ: &str = "parent:read";
pub const PARENT_CREATE: &str = "parent:create";
pub const PARENT_UPDATE: &str = "parent:update";
pub const PARENT_DELETE: &str = "parent:delete";

// =============================================================================
// Notifications
// =============================================================================

pub const NOTIFICATION_READ: &str = "notification:read";
pub const NOTIFICATION_CREATE: &str = "notification:create";

// =============================================================================
// Administration
// =============================================================================

pub const ADMIN_USER_READ: &str = "admin:user:read";
pub const ADMIN_USER_CREATE: &str = "admin:user:create";
pub const ADMIN_USER_UPDATE: &str = "admin:user:update";
pub const ADMIN_USER_DELETE: &str = "admin:user:delete";
pub const ADMIN_ROLE_READ: &str = "admin:role:read";
pub const ADMIN_ROLE_CREATE: &str = "admin:role:create";
pub const ADMIN_ROLE_UPDATE: &str = "admin:role:update";
pub const ADMIN_ROLE_DELETE: &str = "admin:role:delete";
pub const ADMIN_STATS_READ: &str = "admin:stats:read";

/// One row of the built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub group: &'static str,
}

const fn entry(key: &'static str, name: &'static str, group: &'static str) -> CatalogEntry {
    CatalogEntry { key, name, group }
}

/// Every permission the system knows about, in presentation order.
pub const CATALOG: &[CatalogEntry] = &[
    entry(STUDENT_READ, "View students", "student"),
    entry(STUDENT_CREATE, "Create students", "student"),
    entry(STUDENT_UPDATE, "Edit students", "student"),
    entry(STUDENT_DELETE, "Delete students", "student"),
    entry(CLASS_READ, "View classes", "class"),
    entry(CLASS_CREATE, "Create classes", "class"),
    entry(CLASS_UPDATE, "Edit classes", "class"),
    entry(CLASS_DELETE, "Delete classes", "class"),
    entry(COURSE_READ, "View courses", "course"),
    entry(COURSE_CREATE, "Create courses", "course"),
    entry(COURSE_UPDATE, "Edit courses", "course"),
    entry(COURSE_DELETE, "Delete courses", "course"),
    entry(SCHEDULE_READ, "View schedules", "schedule"),
    entry(SCHEDULE_CREATE, "Create schedules", "schedule"),
    entry(SCHEDULE_UPDATE, "Edit schedules", "schedule"),
    entry(SCHEDULE_DELETE, "Delete schedules", "schedule"),
    entry(ENROLLMENT_READ, "View enrollments", "enrollment"),
    entry(ENROLLMENT_CREATE, "Enroll students", "enrollment"),
    entry(ENROLLMENT_DELETE, "Drop enrollments", "enrollment"),
    entry(GRADE_READ, "View grades", "grade"),
    entry(GRADE_CREATE, "Record grades", "grade"),
    entry(GRADE_UPDATE, "Edit grades", "grade"),
    entry(ATTENDANCE_READ, "View attendance", "attendance"),
    entry(ATTENDANCE_CREATE, "Record attendance", "attendance"),
    entry(ATTENDANCE_DELETE, "Delete attendance", "attendance"),
    entry(REWARD_READ, "View rewards and punishments", "reward"),
    entry(REWARD_CREATE, "Create rewards and punishments", "reward"),
    entry(REWARD_DELETE, "Delete rewards and punishments", "reward"),
    entry(PARENT_READ, "View parents", "parent"),
    entry(PARENT_CREATE, "Create parents", "parent"),
    entry(PARENT_UPDATE, "Edit parents", "parent"),
    entry(PARENT_DELETE, "Delete parents", "parent"),
    entry(NOTIFICATION_READ, "View notifications", "notification"),
    entry(NOTIFICATION_CREATE, "Send notifications", "notification"),
    entry(ADMIN_USER_READ, "View user accounts", "admin"),
    entry(ADMIN_USER_CREATE, "Create user accounts", "admin"),
    entry(ADMIN_USER_UPDATE, "Edit user accounts", "admin"),
    entry(ADMIN_USER_DELETE, "Delete user accounts", "admin"),
    entry(ADMIN_ROLE_READ, "View roles", "admin"),
    entry(ADMIN_ROLE_CREATE, "Create roles", "admin"),
    entry(ADMIN_ROLE_UPDATE, "Edit roles and their permissions", "admin"),
    entry(ADMIN_ROLE_DELETE, "Delete roles", "admin"),
    entry(ADMIN_STATS_READ, "View system statistics", "admin"),
];

/// Looks a key up in the built-in catalog.
pub fn catalog_entry(key: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.key == key)
}

/// The roles created on first boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinRole {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl BuiltinRole {
    pub const ALL: [BuiltinRole; 4] = [
        BuiltinRole::Admin,
        BuiltinRole::Teacher,
        BuiltinRole::Student,
        BuiltinRole::Parent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinRole::Admin => "admin",
            BuiltinRole::Teacher => "teacher",
            BuiltinRole::Student => "student",
            BuiltinRole::Parent => "parent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    /// Permission keys granted to this role when it is first seeded.
    pub fn default_grants(self) -> Vec<&'static str> {
        match self {
            BuiltinRole::Admin => CATALOG.iter().map(|e| e.key).collect(),
            BuiltinRole::Teacher => CATALOG
                .iter()
                .filter(|e| {
                    matches!(
                        e.group,
                        "course" | "schedule" | "enrollment" | "grade" | "attendance" | "reward"
                    )
                })
                .map(|e| e.key)
                .chain([STUDENT_READ, CLASS_READ])
                .collect(),
            BuiltinRole::Student => vec![
                STUDENT_READ,
                CLASS_READ,
                COURSE_READ,
                SCHEDULE_READ,
                ENROLLMENT_READ,
                GRADE_READ,
                ATTENDANCE_READ,
                REWARD_READ,
                NOTIFICATION_READ,
            ],
            BuiltinRole::Parent => vec![
                STUDENT_READ,
                PARENT_READ,
                COURSE_READ,
                SCHEDULE_READ,
                GRADE_READ,
                ATTENDANCE_READ,
                REWARD_READ,
                NOTIFICATION_READ,
            ],
        }
    }
}

/// The permission keys a caller holds, resolved once per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Vec<String>)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn contains_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.contains(k))
    }

    pub fn contains_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|k| self.contains(k))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
