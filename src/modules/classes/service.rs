use anyhow::anyhow;
use rollbook_core::{AppError, Paginated, PaginationParams};
use rollbook_models::{ClassId, StudentId};
use rollbook_models::classes::{
    Class, ClassDeletion, ClassDetail, ClassFilterParams, CreateClassDto, UpdateClassDto,
};
use rollbook_models::students::StudentBrief;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::utils::db::is_foreign_key_violation;

const CLASS_COLUMNS: &str = "id, name, teacher_id, created_at, updated_at";

#[derive(FromRow)]
struct RosterRow {
    id: StudentId,
    name: String,
    student_code: String,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ClassFilterParams) {
    qb.push(" WHERE 1=1");
    if let Some(name) = filter.name.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND name ILIKE ").push_bind(format!("%{}%", name));
    }
    if let Some(teacher_id) = filter.teacher_id {
        qb.push(" AND teacher_id = ").push_bind(teacher_id);
    }
}

fn write_error(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        AppError::bad_request(anyhow!("Teacher does not exist"))
    } else {
        AppError::from(err)
    }
}

fn not_found(id: ClassId) -> AppError {
    AppError::not_found(anyhow!("Class {} not found", id))
}

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db))]
    pub async fn list_classes(
        db: &PgPool,
        filter: ClassFilterParams,
        pagination: PaginationParams,
    ) -> Result<Paginated<Class>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM classes", CLASS_COLUMNS));
        push_filters(&mut qb, &filter);
        qb.push(" ORDER BY name, id LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let classes = qb.build_query_as::<Class>().fetch_all(db).await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM classes");
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        Ok(Paginated::new(classes, total, &pagination))
    }

    /// A class with its homeroom teacher's name and its students.
    #[instrument(skip(db))]
    pub async fn get_class(db: &PgPool, id: ClassId) -> Result<ClassDetail, AppError> {
        let class = sqlx::query_as::<_, Class>(&format!(
            "SELECT {} FROM classes WHERE id = $1",
            CLASS_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| not_found(id))?;

        let teacher_name: Option<String> = match class.teacher_id {
            Some(teacher_id) => sqlx::query_scalar("SELECT name FROM teachers WHERE id = $1")
                .bind(teacher_id)
                .fetch_optional(db)
                .await?,
            None => None,
        };

        let students = sqlx::query_as::<_, RosterRow>(
            "SELECT id, name, student_code FROM students WHERE class_id = $1 ORDER BY student_code",
        )
        .bind(id)
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|row| StudentBrief {
            id: row.id,
            name: row.name,
            student_code: row.student_code,
        })
        .collect();

        Ok(ClassDetail {
            class,
            teacher_name,
            students,
        })
    }

    #[instrument(skip(db, dto), fields(name = %dto.name))]
    pub async fn create_class(db: &PgPool, dto: CreateClassDto) -> Result<Class, AppError> {
        let class = sqlx::query_as::<_, Class>(&format!(
            "INSERT INTO classes (name, teacher_id) VALUES ($1, $2) RETURNING {}",
            CLASS_COLUMNS
        ))
        .bind(&dto.name)
        .bind(dto.teacher_id)
        .fetch_one(db)
        .await
        .map_err(write_error)?;

        info!(class_id = %class.id, "Class created");
        Ok(class)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_class(
        db: &PgPool,
        id: ClassId,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        sqlx::query_as::<_, Class>(&format!(
            r#"UPDATE classes SET
                name = COALESCE($2, name),
                teacher_id = COALESCE($3, teacher_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}"#,
            CLASS_COLUMNS
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(dto.teacher_id)
        .fetch_optional(db)
        .await
        .map_err(write_error)?
        .ok_or_else(|| not_found(id))
    }

    /// Deletes a class. Its students are kept without a class; its timetable
    /// slots are removed.
    #[instrument(skip(db))]
    pub async fn delete_class(db: &PgPool, id: ClassId) -> Result<ClassDeletion, AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM classes WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found(id))?;

        let students_unassigned = sqlx::query(
            "UPDATE students SET class_id = NULL, updated_at = NOW() WHERE class_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let schedules_removed = sqlx::query("DELETE FROM schedules WHERE class_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(class_id = %id, students_unassigned, schedules_removed, "Class deleted");

        Ok(ClassDeletion {
            class_id: id,
            students_unassigned,
            schedules_removed,
        })
    }
}
