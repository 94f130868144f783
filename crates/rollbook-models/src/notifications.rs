//! Notices and their simulated delivery.
//!
//! A notice is addressed by a target string: `all`, `class:<id>`,
//! `student:<id>` or `parent:<id>`. Delivery is simulated. Student and parent
//! targets resolve to concrete recipients per channel, broadcasts do not.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::ids::{ClassId, NotificationId, ParentId, StudentId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub content: String,
    pub target: String,
    pub sender_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTarget {
    All,
    Class(ClassId),
    Student(StudentId),
    Parent(ParentId),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("target must be 'all', 'class:<id>', 'student:<id>' or 'parent:<id>'")]
pub struct InvalidTarget;

impl FromStr for NotificationTarget {
    type Err = InvalidTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(NotificationTarget::All);
        }
        let (kind, id) = s.split_once(':').ok_or(InvalidTarget)?;
        let id: Uuid = id.trim().parse().map_err(|_| InvalidTarget)?;
        match kind.to_ascii_lowercase().as_str() {
            "class" => Ok(NotificationTarget::Class(id.into())),
            "student" => Ok(NotificationTarget::Student(id.into())),
            "parent" => Ok(NotificationTarget::Parent(id.into())),
            _ => Err(InvalidTarget),
        }
    }
}

impl TryFrom<String> for NotificationTarget {
    type Error = InvalidTarget;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for NotificationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationTarget::All => f.write_str("all"),
            NotificationTarget::Class(id) => write!(f, "class:{}", id),
            NotificationTarget::Student(id) => write!(f, "student:{}", id),
            NotificationTarget::Parent(id) => write!(f, "parent:{}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryChannel {
    Sms,
    Email,
}

impl DeliveryChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryChannel::Sms => "sms",
            DeliveryChannel::Email => "email",
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendNotificationDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(deserialize_with = "deserialize_target")]
    #[schema(value_type = String, example = "student:0f8fad5b-d9cb-469f-a165-70867728950e")]
    pub target: NotificationTarget,
    #[serde(default)]
    pub channels: Vec<DeliveryChannel>,
}

fn deserialize_target<'de, D>(deserializer: D) -> Result<NotificationTarget, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NotificationTarget::try_from(raw).map_err(serde::de::Error::custom)
}

/// One simulated message.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Delivery {
    pub channel: DeliveryChannel,
    /// Phone number or email address.
    pub recipient: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotificationDispatch {
    pub notification: Notification,
    pub channels: Vec<DeliveryChannel>,
    /// True for `all` and `class:` targets, which are not expanded to recipients.
    pub broadcast: bool,
    pub sent_count: usize,
    pub deliveries: Vec<Delivery>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationFilterParams {
    /// Substring of the target string.
    pub target: Option<String>,
    /// Substring of the title or content.
    pub keyword: Option<String>,
}
