//! The optional link between a user account and a domain profile row.
//!
//! Stored as two columns, `profile_type` (`""`, `admin`, `student`, `teacher`,
//! `parent`) and `profile_id`. The database has no foreign key for this pair, so
//! the services check that the referenced row exists whenever a link is written.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::ids::{ParentId, StudentId, TeacherId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum ProfileRef {
    #[default]
    None,
    /// Administrators have no profile row.
    Admin,
    Student(StudentId),
    Teacher(TeacherId),
    Parent(ParentId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileRefError {
    #[error("unknown profile type '{0}'")]
    UnknownKind(String),
    #[error("profile type '{0}' requires a profile id")]
    MissingId(&'static str),
}

impl ProfileRef {
    pub const NONE: &'static str = "";
    pub const ADMIN: &'static str = "admin";
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
    pub const PARENT: &'static str = "parent";

    /// Rebuilds the link from its `(profile_type, profile_id)` columns.
    pub fn from_parts(kind: &str, id: Option<Uuid>) -> Result<Self, ProfileRefError> {
        let require = |name: &'static str| id.ok_or(ProfileRefError::MissingId(name));

        match kind {
            Self::NONE => Ok(ProfileRef::None),
            Self::ADMIN => Ok(ProfileRef::Admin),
            Self::STUDENT => Ok(ProfileRef::Student(StudentId::from_uuid(require(Self::STUDENT)?))),
            Self::TEACHER => Ok(ProfileRef::Teacher(TeacherId::from_uuid(require(Self::TEACHER)?))),
            Self::PARENT => Ok(ProfileRef::Parent(ParentId::from_uuid(require(Self::PARENT)?))),
            other => Err(ProfileRefError::UnknownKind(other.to_string())),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProfileRef::None => Self::NONE,
            ProfileRef::Admin => Self::ADMIN,
            ProfileRef::Student(_) => Self::STUDENT,
            ProfileRef::Teacher(_) => Self::TEACHER,
            ProfileRef::Parent(_) => Self::PARENT,
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            ProfileRef::None | ProfileRef::Admin => None,
            ProfileRef::Student(id) => Some(id.into_inner()),
            ProfileRef::Teacher(id) => Some(id.into_inner()),
            ProfileRef::Parent(id) => Some(id.into_inner()),
        }
    }

    /// The `(profile_type, profile_id)` column values.
    pub fn to_parts(&self) -> (&'static str, Option<Uuid>) {
        (self.kind(), self.id())
    }
}

/// Display data for the profile a user is linked to.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProfileSummary {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Uuid,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        let id = Uuid::new_v4();
        assert_eq!(ProfileRef::from_parts("", None).unwrap(), ProfileRef::None);
        assert_eq!(ProfileRef::from_parts("admin", None).unwrap(), ProfileRef::Admin);
        assert_eq!(
            ProfileRef::from_parts("student", Some(id)).unwrap(),
            ProfileRef::Student(StudentId::from_uuid(id))
        );
        assert_eq!(
            ProfileRef::from_parts("parent", Some(id)).unwrap(),
            ProfileRef::Parent(ParentId::from_uuid(id))
        );
    }

    #[test]
    fn test_from_parts_rejects_bad_rows() {
        assert_eq!(
            ProfileRef::from_parts("teacher", None),
            Err(ProfileRefError::MissingId("teacher"))
        );
        assert_eq!(
            ProfileRef::from_parts("janitor", Some(Uuid::new_v4())),
            Err(ProfileRefError::UnknownKind("janitor".to_string()))
        );
    }

    #[test]
    fn test_parts_round_trip() {
        let refs = [
            ProfileRef::None,
            ProfileRef::Admin,
            ProfileRef::Student(StudentId::new()),
            ProfileRef::Teacher(TeacherId::new()),
            ProfileRef::Parent(ParentId::new()),
        ];
        for r in refs {
            let (kind, id) = r.to_parts();
            assert_eq!(ProfileRef::from_parts(kind, id).unwrap(), r);
        }
    }

    #[test]
    fn test_json_shape() {
        let id = Uuid::from_u128(5);
        let json = serde_json::to_value(ProfileRef::Teacher(TeacherId::from_uuid(id))).unwrap();
        assert_eq!(json["type"], "teacher");
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000005");

        let none: ProfileRef = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert_eq!(none, ProfileRef::None);

        let parsed: ProfileRef =
            serde_json::from_str(r#"{"type":"student","id":"00000000-0000-0000-0000-000000000005"}"#)
                .unwrap();
        assert_eq!(parsed.id(), Some(id));
    }
}
