//! Enrollment rules.
//!
//! - A (student, course) pair is enrolled at most once. The database's unique
//!   constraint decides this, so concurrent attempts cannot both succeed.
//! - An enrollment is removed only together with its grades, grades first, in
//!   one transaction.

use std::collections::HashMap;

use anyhow::anyhow;
use rollbook_core::{AppError, Paginated, PaginationParams};
use rollbook_models::enrollments::{
    EnrollDto, EnrollmentDetail, EnrollmentDetailRow, EnrollmentFilterParams, Unenrollment,
};
use rollbook_models::grades::Grade;
use rollbook_models::{CourseId, EnrollmentId, StudentId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::metrics::track_enrollment_created;
use crate::utils::db::{is_foreign_key_violation, is_unique_violation};

const DETAIL_SELECT: &str = r#"SELECT e.id, e.student_id, s.name AS student_name, s.student_code,
    e.course_id, c.name AS course_name, e.created_at
FROM enrollments e
JOIN students s ON s.id = e.student_id
JOIN courses c ON c.id = e.course_id"#;

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &EnrollmentFilterParams) {
    qb.push(" WHERE 1=1");
    if let Some(student_id) = filter.student_id {
        qb.push(" AND e.student_id = ").push_bind(student_id);
    }
    if let Some(course_id) = filter.course_id {
        qb.push(" AND e.course_id = ").push_bind(course_id);
    }
}

/// Grades for each of `ids`, oldest first.
async fn grades_by_enrollment(
    db: &PgPool,
    ids: &[Uuid],
) -> Result<HashMap<EnrollmentId, Vec<Grade>>, AppError> {
    let grades = sqlx::query_as::<_, Grade>(
        r#"SELECT id, enrollment_id, score_type, score, created_at, updated_at
        FROM grades WHERE enrollment_id = ANY($1)
        ORDER BY created_at, id"#,
    )
    .bind(ids)
    .fetch_all(db)
    .await?;

    let mut grouped: HashMap<EnrollmentId, Vec<Grade>> = HashMap::new();
    for grade in grades {
        grouped.entry(grade.enrollment_id).or_default().push(grade);
    }
    Ok(grouped)
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enrolls the student identified by `student_code` in a course.
    ///
    /// `404` for an unknown student code or course, `409` when the pair is
    /// already enrolled or the course is at capacity.
    #[instrument(skip(db))]
    pub async fn enroll(db: &PgPool, dto: EnrollDto) -> Result<EnrollmentDetail, AppError> {
        let mut tx = db.begin().await?;

        let student_id: StudentId =
            sqlx::query_scalar("SELECT id FROM students WHERE student_code = $1")
                .bind(&dto.student_code)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(anyhow!("Student '{}' not found", dto.student_code))
                })?;

        // Row lock serializes enrollments into one course for the capacity check.
        let capacity: i32 = sqlx::query_scalar("SELECT capacity FROM courses WHERE id = $1 FOR UPDATE")
            .bind(dto.course_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course {} not found", dto.course_id)))?;

        let enrolled: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
            .bind(dto.course_id)
            .fetch_one(&mut *tx)
            .await?;

        let id: EnrollmentId = sqlx::query_scalar(
            "INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(student_id)
        .bind(dto.course_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(anyhow!("Student is already enrolled in this course"))
            } else if is_foreign_key_violation(&e) {
                AppError::not_found(anyhow!("Student or course no longer exists"))
            } else {
                AppError::from(e)
            }
        })?;

        // Checked after the insert so a duplicate reports as a duplicate.
        if enrolled >= i64::from(capacity) {
            return Err(AppError::conflict(anyhow!("Course is full ({} seats)", capacity)));
        }

        tx.commit().await?;

        track_enrollment_created("enroll");
        info!(enrollment_id = %id, %student_id, course_id = %dto.course_id, "Student enrolled");

        Self::get_enrollment(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_enrollment(db: &PgPool, id: EnrollmentId) -> Result<EnrollmentDetail, AppError> {
        let row = sqlx::query_as::<_, EnrollmentDetailRow>(&format!("{} WHERE e.id = $1", DETAIL_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Enrollment {} not found", id)))?;

        let mut grades = grades_by_enrollment(db, &[id.into_inner()]).await?;
        let own = grades.remove(&id).unwrap_or_default();
        Ok(EnrollmentDetail::from_row(row, own))
    }

    #[instrument(skip(db))]
    pub async fn list_enrollments(
        db: &PgPool,
        filter: EnrollmentFilterParams,
        pagination: PaginationParams,
    ) -> Result<Paginated<EnrollmentDetail>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        push_filters(&mut qb, &filter);
        qb.push(" ORDER BY e.created_at DESC, e.id LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let rows = qb.build_query_as::<EnrollmentDetailRow>().fetch_all(db).await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM enrollments e");
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id.into_inner()).collect();
        let mut grades = grades_by_enrollment(db, &ids).await?;

        let list = rows
            .into_iter()
            .map(|row| {
                let own = grades.remove(&row.id).unwrap_or_default();
                EnrollmentDetail::from_row(row, own)
            })
            .collect();

        Ok(Paginated::new(list, total, &pagination))
    }

    /// Removes an enrollment and every grade recorded against it.
    #[instrument(skip(db))]
    pub async fn unenroll(db: &PgPool, id: EnrollmentId) -> Result<Unenrollment, AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM enrollments WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Enrollment {} not found", id)))?;

        let grades_removed = sqlx::query("DELETE FROM grades WHERE enrollment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(enrollment_id = %id, grades_removed, "Enrollment removed");

        Ok(Unenrollment {
            enrollment_id: id,
            grades_removed,
        })
    }

    /// Finds the enrollment for a pair, creating it when absent.
    ///
    /// Runs inside the caller's transaction. Capacity is not checked on this
    /// path. Returns the id and whether a row was created.
    pub async fn find_or_create(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<(EnrollmentId, bool), AppError> {
        let existing: Option<EnrollmentId> = sqlx::query_scalar(
            "SELECT id FROM enrollments WHERE student_id = $1 AND course_id = $2",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(id) = existing {
            return Ok((id, false));
        }

        let inserted: Option<EnrollmentId> = sqlx::query_scalar(
            r#"INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT uq_enrollments_student_course DO NOTHING
            RETURNING id"#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                let what = match e.as_database_error().and_then(|d| d.constraint()) {
                    Some(c) if c.contains("student") => "Student",
                    _ => "Course",
                };
                AppError::not_found(anyhow!("{} not found", what))
            } else {
                AppError::from(e)
            }
        })?;

        if let Some(id) = inserted {
            return Ok((id, true));
        }

        // Lost a race with a concurrent insert of the same pair.
        let id: EnrollmentId = sqlx::query_scalar(
            "SELECT id FROM enrollments WHERE student_id = $1 AND course_id = $2",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok((id, false))
    }
}
