use anyhow::anyhow;
use rollbook_core::{AppError, Paginated, PaginationParams};
use rollbook_models::parents::{CreateParentDto, Parent, ParentFilterParams, UpdateParentDto};
use rollbook_models::{ParentId, StudentId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};
use uuid::Uuid;

const PARENT_SELECT: &str = r#"SELECT p.id, p.student_id, s.name AS student_name, s.student_code,
    p.name, p.phone, p.relation, p.created_at, p.updated_at
FROM p
JOIN students s ON s.id = p.student_id"#;

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ParentFilterParams) {
    qb.push(" WHERE 1=1");
    if let Some(code) = filter.student_code.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND s.student_code ILIKE ").push_bind(format!("%{}%", code));
    }
    if let Some(student_id) = filter.student_id {
        qb.push(" AND p.student_id = ").push_bind(student_id);
    }
}

fn not_found(id: ParentId) -> AppError {
    AppError::not_found(anyhow!("Parent {} not found", id))
}

pub struct ParentService;

impl ParentService {
    #[instrument(skip(db))]
    pub async fn list_parents(
        db: &PgPool,
        filter: ParentFilterParams,
        pagination: PaginationParams,
    ) -> Result<Paginated<Parent>, AppError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("WITH p AS (SELECT * FROM parents) {}", PARENT_SELECT));
        push_filters(&mut qb, &filter);
        qb.push(" ORDER BY s.student_code, p.name, p.id LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let parents = qb.build_query_as::<Parent>().fetch_all(db).await?;

        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM parents p JOIN students s ON s.id = p.student_id",
        );
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        Ok(Paginated::new(parents, total, &pagination))
    }

    /// Adds a contact for the student with `student_code`. `404` for an
    /// unknown code.
    #[instrument(skip(db, dto), fields(student_code = %dto.student_code))]
    pub async fn create_parent(db: &PgPool, dto: CreateParentDto) -> Result<Parent, AppError> {
        let mut tx = db.begin().await?;

        let student_id: StudentId =
            sqlx::query_scalar("SELECT id FROM students WHERE student_code = $1 FOR SHARE")
                .bind(&dto.student_code)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(anyhow!("Student '{}' not found", dto.student_code))
                })?;

        let parent = sqlx::query_as::<_, Parent>(&format!(
            r#"WITH p AS (
                INSERT INTO parents (student_id, name, phone, relation)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            ) {}"#,
            PARENT_SELECT
        ))
        .bind(student_id)
        .bind(&dto.name)
        .bind(&dto.phone)
        .bind(&dto.relation)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(parent_id = %parent.id, student_id = %student_id, "Parent created");
        Ok(parent)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_parent(
        db: &PgPool,
        id: ParentId,
        dto: UpdateParentDto,
    ) -> Result<Parent, AppError> {
        sqlx::query_as::<_, Parent>(&format!(
            r#"WITH p AS (
                UPDATE parents SET
                    name = COALESCE($2, name),
                    phone = COALESCE($3, phone),
                    relation = COALESCE($4, relation),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            ) {}"#,
            PARENT_SELECT
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.phone)
        .bind(&dto.relation)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| not_found(id))
    }

    /// Removes the contact and unlinks any account whose profile it was.
    #[instrument(skip(db))]
    pub async fn delete_parent(db: &PgPool, id: ParentId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, Uuid>("DELETE FROM parents WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found(id))?;

        let unlinked = sqlx::query(
            r#"UPDATE users SET profile_type = '', profile_id = NULL, updated_at = NOW()
            WHERE profile_type = 'parent' AND profile_id = $1"#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        info!(parent_id = %id, accounts_unlinked = unlinked, "Parent deleted");
        Ok(())
    }
}
