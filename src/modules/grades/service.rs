use anyhow::anyhow;
use rollbook_core::{AppError, Paginated, PaginationParams};
use rollbook_models::grades::{
    AuditLogFilterParams, Grade, GradeAuditLog, GradeDetail, GradeFilterParams, RecordGradeDto,
    RecordedGrade, UpdateGradeDto,
};
use rollbook_models::{CourseId, GradeId, StudentId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use crate::metrics::{track_enrollment_created, track_grade_recorded};
use crate::modules::enrollments::EnrollmentService;

const GRADE_COLUMNS: &str = "id, enrollment_id, score_type, score, created_at, updated_at";

const DETAIL_SELECT: &str = r#"SELECT g.id, g.enrollment_id, e.student_id, s.name AS student_name,
    s.student_code, e.course_id, c.name AS course_name, g.score_type, g.score,
    g.created_at, g.updated_at
FROM grades g
JOIN enrollments e ON e.id = g.enrollment_id
JOIN students s ON s.id = e.student_id
JOIN courses c ON c.id = e.course_id"#;

const DETAIL_FROM: &str = r#"SELECT COUNT(*)
FROM grades g
JOIN enrollments e ON e.id = g.enrollment_id"#;

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &GradeFilterParams) {
    qb.push(" WHERE 1=1");
    if let Some(student_id) = filter.student_id {
        qb.push(" AND e.student_id = ").push_bind(student_id);
    }
    if let Some(course_id) = filter.course_id {
        qb.push(" AND e.course_id = ").push_bind(course_id);
    }
    if let Some(score_type) = filter.score_type.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND g.score_type = ").push_bind(score_type.to_string());
    }
}

pub struct GradeService;

impl GradeService {
    /// Records a grade for a (student, course) pair.
    ///
    /// When the student is not yet enrolled the enrollment is created in the
    /// same transaction, so a grade never exists without its enrollment.
    #[instrument(skip(db, dto), fields(student_id = %dto.student_id, course_id = %dto.course_id))]
    pub async fn record_grade(db: &PgPool, dto: RecordGradeDto) -> Result<RecordedGrade, AppError> {
        let mut tx = db.begin().await?;

        let (enrollment_id, enrollment_created) =
            EnrollmentService::find_or_create(&mut tx, dto.student_id, dto.course_id).await?;

        let grade = sqlx::query_as::<_, Grade>(&format!(
            "INSERT INTO grades (enrollment_id, score_type, score) VALUES ($1, $2, $3) RETURNING {}",
            GRADE_COLUMNS
        ))
        .bind(enrollment_id)
        .bind(&dto.score_type)
        .bind(dto.score)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        if enrollment_created {
            track_enrollment_created("grade");
        }
        track_grade_recorded();
        info!(grade_id = %grade.id, %enrollment_id, enrollment_created, "Grade recorded");

        Ok(RecordedGrade {
            grade,
            enrollment_created,
        })
    }

    /// Changes a grade's score. Score changes are written to the audit log by
    /// a database trigger.
    #[instrument(skip(db, dto))]
    pub async fn update_grade(
        db: &PgPool,
        id: GradeId,
        dto: UpdateGradeDto,
    ) -> Result<Grade, AppError> {
        let grade = sqlx::query_as::<_, Grade>(&format!(
            r#"UPDATE grades SET
                score = $2,
                score_type = COALESCE($3, score_type),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}"#,
            GRADE_COLUMNS
        ))
        .bind(id)
        .bind(dto.score)
        .bind(dto.score_type)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Grade {} not found", id)))?;

        info!(grade_id = %id, score = grade.score, "Grade updated");
        Ok(grade)
    }

    #[instrument(skip(db))]
    pub async fn list_grades(
        db: &PgPool,
        filter: GradeFilterParams,
        pagination: PaginationParams,
    ) -> Result<Paginated<GradeDetail>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        push_filters(&mut qb, &filter);
        qb.push(" ORDER BY g.created_at DESC, g.id LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let grades = qb.build_query_as::<GradeDetail>().fetch_all(db).await?;

        let mut count = QueryBuilder::<Postgres>::new(DETAIL_FROM);
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        Ok(Paginated::new(grades, total, &pagination))
    }

    #[instrument(skip(db))]
    pub async fn grades_by_student(
        db: &PgPool,
        student_id: StudentId,
        pagination: PaginationParams,
    ) -> Result<Paginated<GradeDetail>, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM students WHERE id = $1)")
            .bind(student_id)
            .fetch_one(db)
            .await?;
        if !exists {
            return Err(AppError::not_found(anyhow!("Student {} not found", student_id)));
        }

        let filter = GradeFilterParams {
            student_id: Some(student_id),
            ..Default::default()
        };
        Self::list_grades(db, filter, pagination).await
    }

    #[instrument(skip(db))]
    pub async fn grades_by_course(
        db: &PgPool,
        course_id: CourseId,
        pagination: PaginationParams,
    ) -> Result<Paginated<GradeDetail>, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM courses WHERE id = $1)")
            .bind(course_id)
            .fetch_one(db)
            .await?;
        if !exists {
            return Err(AppError::not_found(anyhow!("Course {} not found", course_id)));
        }

        let filter = GradeFilterParams {
            course_id: Some(course_id),
            ..Default::default()
        };
        Self::list_grades(db, filter, pagination).await
    }

    /// Score changes, newest first.
    #[instrument(skip(db))]
    pub async fn list_audit_logs(
        db: &PgPool,
        filter: AuditLogFilterParams,
        pagination: PaginationParams,
    ) -> Result<Paginated<GradeAuditLog>, AppError> {
        let logs = sqlx::query_as::<_, GradeAuditLog>(
            r#"SELECT id, grade_id, old_score, new_score, created_at
            FROM grade_audit_logs
            WHERE ($1::uuid IS NULL OR grade_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3"#,
        )
        .bind(filter.grade_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM grade_audit_logs WHERE ($1::uuid IS NULL OR grade_id = $1)",
        )
        .bind(filter.grade_id)
        .fetch_one(db)
        .await?;

        Ok(Paginated::new(logs, total, &pagination))
    }
}
