use anyhow::anyhow;
use rollbook_core::{AppError, Paginated, PaginationParams};
use rollbook_models::rewards::{CreateRewardDto, Reward, RewardFilterParams};
use rollbook_models::{RewardId, StudentId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use crate::utils::db::is_foreign_key_violation;

const REWARD_SELECT: &str = r#"SELECT r.id, r.student_id, s.name AS student_name, s.student_code,
    r.kind, r.description, r.date, r.issuer, r.created_at
FROM r
JOIN students s ON s.id = r.student_id"#;

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &RewardFilterParams) {
    qb.push(" WHERE 1=1");
    if let Some(student_id) = filter.student_id {
        qb.push(" AND r.student_id = ").push_bind(student_id);
    }
    if let Some(kind) = filter.kind {
        qb.push(" AND r.kind = ").push_bind(kind.as_str());
    }
    if let Some(from) = filter.date_from {
        qb.push(" AND r.date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        qb.push(" AND r.date <= ").push_bind(to);
    }
}

fn student_not_found(id: StudentId) -> AppError {
    AppError::not_found(anyhow!("Student {} not found", id))
}

pub struct RewardService;

impl RewardService {
    #[instrument(skip(db))]
    pub async fn list_rewards(
        db: &PgPool,
        filter: RewardFilterParams,
        pagination: PaginationParams,
    ) -> Result<Paginated<Reward>, AppError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("WITH r AS (SELECT * FROM rewards) {}", REWARD_SELECT));
        push_filters(&mut qb, &filter);
        qb.push(" ORDER BY r.date DESC, r.created_at DESC, r.id LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let rewards = qb.build_query_as::<Reward>().fetch_all(db).await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM rewards r");
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        Ok(Paginated::new(rewards, total, &pagination))
    }

    #[instrument(skip(db))]
    pub async fn student_rewards(db: &PgPool, student_id: StudentId) -> Result<Vec<Reward>, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
            .bind(student_id)
            .fetch_one(db)
            .await?;
        if !exists {
            return Err(student_not_found(student_id));
        }

        let rewards = sqlx::query_as::<_, Reward>(&format!(
            "WITH r AS (SELECT * FROM rewards WHERE student_id = $1) {} ORDER BY r.date DESC, r.created_at DESC",
            REWARD_SELECT
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(rewards)
    }

    #[instrument(skip(db, dto), fields(student_id = %dto.student_id, kind = dto.kind.as_str()))]
    pub async fn create_reward(db: &PgPool, dto: CreateRewardDto) -> Result<Reward, AppError> {
        let reward = sqlx::query_as::<_, Reward>(&format!(
            r#"WITH r AS (
                INSERT INTO rewards (student_id, kind, description, date, issuer)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            ) {}"#,
            REWARD_SELECT
        ))
        .bind(dto.student_id)
        .bind(dto.kind.as_str())
        .bind(&dto.description)
        .bind(dto.date)
        .bind(&dto.issuer)
        .fetch_one(db)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                student_not_found(dto.student_id)
            } else {
                AppError::from(err)
            }
        })?;

        info!(reward_id = %reward.id, "Reward record created");
        Ok(reward)
    }

    #[instrument(skip(db))]
    pub async fn delete_reward(db: &PgPool, id: RewardId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM rewards WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Reward record {} not found", id)));
        }

        info!(reward_id = %id, "Reward record deleted");
        Ok(())
    }
}
