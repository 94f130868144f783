//! Rewards and disciplinary records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{RewardId, StudentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Reward,
    Punishment,
}

impl RewardKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RewardKind::Reward => "reward",
            RewardKind::Punishment => "punishment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reward {
    pub id: RewardId,
    pub student_id: StudentId,
    pub student_name: String,
    pub student_code: String,
    /// `reward` or `punishment`.
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub date: NaiveDate,
    pub issuer: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRewardDto {
    pub student_id: StudentId,
    #[serde(rename = "type")]
    pub kind: RewardKind,
    #[validate(length(min = 1, max = 2000, message = "Description is required"))]
    pub description: String,
    pub date: NaiveDate,
    #[validate(length(max = 100))]
    pub issuer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RewardFilterParams {
    pub student_id: Option<StudentId>,
    #[serde(rename = "type")]
    pub kind: Option<RewardKind>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}
