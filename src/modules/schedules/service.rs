use anyhow::anyhow;
use rollbook_core::{AppError, Paginated, PaginationParams};
use rollbook_models::ScheduleId;
use rollbook_models::schedules::{
    CreateScheduleDto, Schedule, ScheduleFilterParams, UpdateScheduleDto,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use crate::utils::db::{is_foreign_key_violation, violated_constraint};

/// Selects from `sc`, which is either the table or a CTE over a write.
const SCHEDULE_SELECT: &str = r#"SELECT sc.id, sc.course_id, c.name AS course_name,
    sc.class_id, cl.name AS class_name, sc.teacher_id, t.name AS teacher_name,
    sc.day_of_week, sc.start_time, sc.end_time, sc.location, sc.semester,
    sc.created_at, sc.updated_at
FROM sc
JOIN courses c ON c.id = sc.course_id
JOIN classes cl ON cl.id = sc.class_id
LEFT JOIN teachers t ON t.id = sc.teacher_id"#;

fn select_from_table() -> String {
    format!("WITH sc AS (SELECT * FROM schedules) {}", SCHEDULE_SELECT)
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ScheduleFilterParams) {
    qb.push(" WHERE 1=1");
    if let Some(class_id) = filter.class_id {
        qb.push(" AND sc.class_id = ").push_bind(class_id);
    }
    if let Some(course_id) = filter.course_id {
        qb.push(" AND sc.course_id = ").push_bind(course_id);
    }
    if let Some(teacher_id) = filter.teacher_id {
        qb.push(" AND sc.teacher_id = ").push_bind(teacher_id);
    }
    if let Some(semester) = filter.semester.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND sc.semester = ").push_bind(semester.to_owned());
    }
}

fn write_error(err: sqlx::Error) -> AppError {
    if !is_foreign_key_violation(&err) {
        return AppError::from(err);
    }
    let missing = match violated_constraint(&err) {
        Some("schedules_course_id_fkey") => "Course",
        Some("schedules_class_id_fkey") => "Class",
        Some("schedules_teacher_id_fkey") => "Teacher",
        _ => "Referenced record",
    };
    AppError::bad_request(anyhow!("{} does not exist", missing))
}

fn not_found(id: ScheduleId) -> AppError {
    AppError::not_found(anyhow!("Schedule {} not found", id))
}

pub struct ScheduleService;

impl ScheduleService {
    /// Slots ordered by weekday, then start time.
    #[instrument(skip(db))]
    pub async fn list_schedules(
        db: &PgPool,
        filter: ScheduleFilterParams,
        pagination: PaginationParams,
    ) -> Result<Paginated<Schedule>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(select_from_table());
        push_filters(&mut qb, &filter);
        qb.push(" ORDER BY sc.day_of_week, sc.start_time, sc.id LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let schedules = qb.build_query_as::<Schedule>().fetch_all(db).await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM schedules sc");
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        Ok(Paginated::new(schedules, total, &pagination))
    }

    #[instrument(skip(db))]
    pub async fn get_schedule(db: &PgPool, id: ScheduleId) -> Result<Schedule, AppError> {
        sqlx::query_as::<_, Schedule>(&format!("{} WHERE sc.id = $1", select_from_table()))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| not_found(id))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_schedule(db: &PgPool, dto: CreateScheduleDto) -> Result<Schedule, AppError> {
        let schedule = sqlx::query_as::<_, Schedule>(&format!(
            r#"WITH sc AS (
                INSERT INTO schedules
                    (course_id, class_id, teacher_id, day_of_week, start_time, end_time, location, semester)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            ) {}"#,
            SCHEDULE_SELECT
        ))
        .bind(dto.course_id)
        .bind(dto.class_id)
        .bind(dto.teacher_id)
        .bind(dto.day_of_week)
        .bind(&dto.start_time)
        .bind(&dto.end_time)
        .bind(&dto.location)
        .bind(&dto.semester)
        .fetch_one(db)
        .await
        .map_err(write_error)?;

        info!(schedule_id = %schedule.id, course_id = %schedule.course_id, class_id = %schedule.class_id, "Schedule created");
        Ok(schedule)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_schedule(
        db: &PgPool,
        id: ScheduleId,
        dto: UpdateScheduleDto,
    ) -> Result<Schedule, AppError> {
        sqlx::query_as::<_, Schedule>(&format!(
            r#"WITH sc AS (
                UPDATE schedules SET
                    course_id = COALESCE($2, course_id),
                    class_id = COALESCE($3, class_id),
                    teacher_id = COALESCE($4, teacher_id),
                    day_of_week = COALESCE($5, day_of_week),
                    start_time = COALESCE($6, start_time),
                    end_time = COALESCE($7, end_time),
                    location = COALESCE($8, location),
                    semester = COALESCE($9, semester),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            ) {}"#,
            SCHEDULE_SELECT
        ))
        .bind(id)
        .bind(dto.course_id)
        .bind(dto.class_id)
        .bind(dto.teacher_id)
        .bind(dto.day_of_week)
        .bind(&dto.start_time)
        .bind(&dto.end_time)
        .bind(&dto.location)
        .bind(&dto.semester)
        .fetch_optional(db)
        .await
        .map_err(write_error)?
        .ok_or_else(|| not_found(id))
    }

    #[instrument(skip(db))]
    pub async fn delete_schedule(db: &PgPool, id: ScheduleId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        info!(schedule_id = %id, "Schedule deleted");
        Ok(())
    }
}
