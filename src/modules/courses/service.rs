use anyhow::anyhow;
use rollbook_core::{AppError, Paginated, PaginationParams};
use rollbook_models::CourseId;
use rollbook_models::courses::{
    Course, CourseDeletion, CourseFilterParams, CreateCourseDto, DEFAULT_CAPACITY, UpdateCourseDto,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::utils::db::is_foreign_key_violation;

const COURSE_COLUMNS: &str = "id, name, teacher_id, credits, capacity, created_at, updated_at";

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &CourseFilterParams) {
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

fn not_found(id: CourseId) -> AppError {
    AppError::not_found(anyhow!("Course {} not found", id))
}

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn list_courses(
        db: &PgPool,
        filter: CourseFilterParams,
        pagination: PaginationParams,
    ) -> Result<Paginated<Course>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM courses", COURSE_COLUMNS));
        push_filters(&mut qb, &filter);
        qb.push(" ORDER BY name, id LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let courses = qb.build_query_as::<Course>().fetch_all(db).await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM courses");
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        Ok(Paginated::new(courses, total, &pagination))
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, id: CourseId) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!("SELECT {} FROM courses WHERE id = $1", COURSE_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| not_found(id))
    }

    #[instrument(skip(db, dto), fields(name = %dto.name))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            r#"INSERT INTO courses (name, teacher_id, credits, capacity)
            VALUES ($1, $2, $3, $4)
            RETURNING {}"#,
            COURSE_COLUMNS
        ))
        .bind(&dto.name)
        .bind(dto.teacher_id)
        .bind(dto.credits.unwrap_or(0.0))
        .bind(dto.capacity.unwrap_or(DEFAULT_CAPACITY))
        .fetch_one(db)
        .await
        .map_err(write_error)?;

        info!(course_id = %course.id, "Course created");
        Ok(course)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            r#"UPDATE courses SET
                name = COALESCE($2, name),
                teacher_id = COALESCE($3, teacher_id),
                credits = COALESCE($4, credits),
                capacity = COALESCE($5, capacity),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}"#,
            COURSE_COLUMNS
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(dto.teacher_id)
        .bind(dto.credits)
        .bind(dto.capacity)
        .fetch_optional(db)
        .await
        .map_err(write_error)?
        .ok_or_else(|| not_found(id))
    }

    /// Deletes a course after its grades and enrollments, in one transaction.
    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: CourseId) -> Result<CourseDeletion, AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found(id))?;

        let grades_removed = sqlx::query(
            r#"DELETE FROM grades
            WHERE enrollment_id IN (SELECT id FROM enrollments WHERE course_id = $1)"#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let enrollments_removed = sqlx::query("DELETE FROM enrollments WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(course_id = %id, grades_removed, enrollments_removed, "Course deleted");

        Ok(CourseDeletion {
            course_id: id,
            enrollments_removed,
            grades_removed,
        })
    }
}
