//! Attendance marks. A student may be marked more than once on a day.

use anyhow::anyhow;
use rollbook_core::{AppError, Paginated, PaginationParams};
use rollbook_models::attendance::{
    Attendance, AttendanceFilterParams, AttendanceTally, RecordAttendanceDto,
};
use rollbook_models::{AttendanceId, StudentId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use crate::metrics::track_attendance_recorded;
use crate::utils::db::{is_foreign_key_violation, violated_constraint};

const ATTENDANCE_SELECT: &str = r#"SELECT a.id, a.student_id, s.name AS student_name, s.student_code,
    a.date, a.status, a.reason, a.teacher_id, a.created_at
FROM a
JOIN students s ON s.id = a.student_id"#;

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &AttendanceFilterParams) {
    qb.push(" WHERE 1=1");
    if let Some(student_id) = filter.student_id {
        qb.push(" AND a.student_id = ").push_bind(student_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND a.status = ").push_bind(status.as_str());
    }
    if let Some(from) = filter.date_from {
        qb.push(" AND a.date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        qb.push(" AND a.date <= ").push_bind(to);
    }
}

fn student_not_found(id: StudentId) -> AppError {
    AppError::not_found(anyhow!("Student {} not found", id))
}

pub struct AttendanceService;

impl AttendanceService {
    /// Newest first.
    #[instrument(skip(db))]
    pub async fn list_attendance(
        db: &PgPool,
        filter: AttendanceFilterParams,
        pagination: PaginationParams,
    ) -> Result<Paginated<Attendance>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "WITH a AS (SELECT * FROM attendance) {}",
            ATTENDANCE_SELECT
        ));
        push_filters(&mut qb, &filter);
        qb.push(" ORDER BY a.date DESC, a.created_at DESC, a.id LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let marks = qb.build_query_as::<Attendance>().fetch_all(db).await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM attendance a");
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        Ok(Paginated::new(marks, total, &pagination))
    }

    /// Every mark for one student, newest first. `404` for an unknown student.
    #[instrument(skip(db))]
    pub async fn student_attendance(
        db: &PgPool,
        student_id: StudentId,
    ) -> Result<Vec<Attendance>, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
            .bind(student_id)
            .fetch_one(db)
            .await?;
        if !exists {
            return Err(student_not_found(student_id));
        }

        let marks = sqlx::query_as::<_, Attendance>(&format!(
            "WITH a AS (SELECT * FROM attendance WHERE student_id = $1) {} ORDER BY a.date DESC, a.created_at DESC",
            ATTENDANCE_SELECT
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(marks)
    }

    /// Per-student counts of each status over the filtered marks, by student code.
    /// Students without marks in range are left out.
    #[instrument(skip(db))]
    pub async fn tally(
        db: &PgPool,
        filter: AttendanceFilterParams,
    ) -> Result<Vec<AttendanceTally>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"SELECT a.student_id, s.name AS student_name, s.student_code,
                COUNT(*) FILTER (WHERE a.status = 'present') AS present,
                COUNT(*) FILTER (WHERE a.status = 'absent') AS absent,
                COUNT(*) FILTER (WHERE a.status = 'leave') AS "leave",
                COUNT(*) FILTER (WHERE a.status = 'late') AS late,
                COUNT(*) AS total
            FROM attendance a
            JOIN students s ON s.id = a.student_id"#,
        );
        push_filters(&mut qb, &filter);
        qb.push(" GROUP BY a.student_id, s.name, s.student_code ORDER BY s.student_code");

        let tallies = qb.build_query_as::<AttendanceTally>().fetch_all(db).await?;
        Ok(tallies)
    }

    /// `404` for an unknown student, `400` for an unknown teacher.
    #[instrument(skip(db, dto), fields(student_id = %dto.student_id, status = dto.status.as_str()))]
    pub async fn record_attendance(
        db: &PgPool,
        dto: RecordAttendanceDto,
    ) -> Result<Attendance, AppError> {
        let mark = sqlx::query_as::<_, Attendance>(&format!(
            r#"WITH a AS (
                INSERT INTO attendance (student_id, date, status, reason, teacher_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            ) {}"#,
            ATTENDANCE_SELECT
        ))
        .bind(dto.student_id)
        .bind(dto.date)
        .bind(dto.status.as_str())
        .bind(&dto.reason)
        .bind(dto.teacher_id)
        .fetch_one(db)
        .await
        .map_err(|err| {
            if !is_foreign_key_violation(&err) {
                return AppError::from(err);
            }
            match violated_constraint(&err) {
                Some("attendance_teacher_id_fkey") => {
                    AppError::bad_request(anyhow!("Teacher does not exist"))
                }
                _ => student_not_found(dto.student_id),
            }
        })?;

        track_attendance_recorded(dto.status.as_str());
        info!(attendance_id = %mark.id, date = %mark.date, "Attendance recorded");
        Ok(mark)
    }

    #[instrument(skip(db))]
    pub async fn delete_attendance(db: &PgPool, id: AttendanceId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Attendance record {} not found", id)));
        }

        info!(attendance_id = %id, "Attendance deleted");
        Ok(())
    }
}
