//! Typed identifiers.
//!
//! Each table's primary key gets its own `Uuid` wrapper, so a `StudentId`
//! cannot be bound where a `CourseId` is expected. The wrappers are
//! transparent everywhere they cross a boundary: a bare `uuid` column to sqlx,
//! a bare UUID string to serde and the OpenAPI schema, and a UUID path
//! segment to axum's `Path` extractor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! uuid_ids {
    ($($(#[$doc:meta])* $name:ident;)+) => {$(
        $(#[$doc])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize, sqlx::Type, ToSchema,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        #[schema(value_type = String, format = "uuid")]
        pub struct $name(Uuid);

        impl $name {
            /// A fresh random (v4) id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }
    )+};
}

uuid_ids! {
    /// A credential record in `users`.
    UserId;
    RoleId;
    PermissionId;
    StudentId;
    TeacherId;
    ParentId;
    ClassId;
    CourseId;
    /// A (student, course) pair in `enrollments`.
    EnrollmentId;
    GradeId;
    ScheduleId;
    AttendanceId;
    RewardId;
    NotificationId;
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

    #[test]
    fn test_fresh_ids_differ() {
        assert_ne!(StudentId::new(), StudentId::new());
        assert_ne!(CourseId::default().into_inner(), Uuid::nil());
    }

    #[test]
    fn test_display_is_the_bare_uuid_and_debug_names_the_kind() {
        let id: EnrollmentId = RAW.parse().unwrap();
        assert_eq!(id.to_string(), RAW);
        assert_eq!(format!("{:?}", id), format!("EnrollmentId({})", RAW));
    }

    #[test]
    fn test_rejects_non_uuid_path_segments() {
        assert!("grade-7".parse::<GradeId>().is_err());
        assert!("".parse::<AttendanceId>().is_err());
    }

    #[test]
    fn test_json_form_is_a_plain_string() {
        let id = RoleId::from_uuid(Uuid::parse_str(RAW).unwrap());
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!(RAW));
        assert_eq!(serde_json::from_value::<RoleId>(json).unwrap(), id);
        assert!(serde_json::from_value::<RoleId>(serde_json::json!(7)).is_err());
    }

    #[test]
    fn test_converts_to_and_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = UserId::from(uuid);
        assert_eq!(Uuid::from(id), uuid);
        assert_eq!(id.into_inner(), uuid);
    }
}
