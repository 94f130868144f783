use rollbook_core::AppError;
use rollbook_models::stats::{
    AttendanceSummary, CoursePopularity, DashboardStats, GenderSplit, GradeBucket, GradeSummary,
    OverviewStats,
};
use sqlx::PgPool;
use tracing::instrument;

const POPULAR_COURSES: i64 = 5;

#[instrument(skip(db))]
pub async fn overview(db: &PgPool) -> Result<OverviewStats, AppError> {
    let stats = sqlx::query_as::<_, OverviewStats>(
        r#"SELECT
            (SELECT COUNT(*) FROM users) AS users_total,
            (SELECT COUNT(*) FROM users WHERE is_active) AS users_active,
            (SELECT COUNT(*) FROM students) AS students_total,
            (SELECT COUNT(*) FROM teachers) AS teachers_total,
            (SELECT COUNT(*) FROM classes) AS classes_total,
            (SELECT COUNT(*) FROM courses) AS courses_total,
            (SELECT COUNT(*) FROM enrollments) AS enrollments_total,
            (SELECT COUNT(*) FROM grades) AS grades_total"#,
    )
    .fetch_one(db)
    .await?;

    Ok(stats)
}

/// Gender is matched case-insensitively; blank counts as unspecified.
async fn student_gender(db: &PgPool) -> Result<GenderSplit, AppError> {
    let split = sqlx::query_as::<_, GenderSplit>(
        r#"SELECT
            COUNT(*) FILTER (WHERE LOWER(TRIM(gender)) = 'male') AS male,
            COUNT(*) FILTER (WHERE LOWER(TRIM(gender)) = 'female') AS female,
            COUNT(*) FILTER (
                WHERE LOWER(TRIM(gender)) NOT IN ('male', 'female', '')
            ) AS other,
            COUNT(*) FILTER (WHERE gender IS NULL OR TRIM(gender) = '') AS unspecified
        FROM students"#,
    )
    .fetch_one(db)
    .await?;

    Ok(split)
}

async fn attendance_summary(db: &PgPool) -> Result<AttendanceSummary, AppError> {
    let (present, absent, leave, late): (i64, i64, i64, i64) = sqlx::query_as(
        r#"SELECT
            COUNT(*) FILTER (WHERE status = 'present'),
            COUNT(*) FILTER (WHERE status = 'absent'),
            COUNT(*) FILTER (WHERE status = 'leave'),
            COUNT(*) FILTER (WHERE status = 'late')
        FROM attendance"#,
    )
    .fetch_one(db)
    .await?;

    Ok(AttendanceSummary {
        present,
        absent,
        leave,
        late,
        attendance_rate: 0.0,
    }
    .with_rate())
}

async fn grade_summary(db: &PgPool) -> Result<GradeSummary, AppError> {
    let (average_score, total_grades): (Option<f64>, i64) =
        sqlx::query_as("SELECT AVG(score), COUNT(*) FROM grades")
            .fetch_one(db)
            .await?;

    // Lower bound inclusive, upper bound exclusive.
    let distribution = sqlx::query_as::<_, GradeBucket>(
        r#"SELECT b.label, COUNT(g.id) AS count
        FROM (VALUES
            (1, '<60', NULL::float8, 60::float8),
            (2, '60-69', 60::float8, 70::float8),
            (3, '70-79', 70::float8, 80::float8),
            (4, '80-89', 80::float8, 90::float8),
            (5, '>=90', 90::float8, NULL::float8)
        ) AS b(ord, label, lo, hi)
        LEFT JOIN grades g
            ON (b.lo IS NULL OR g.score >= b.lo) AND (b.hi IS NULL OR g.score < b.hi)
        GROUP BY b.ord, b.label
        ORDER BY b.ord"#,
    )
    .fetch_all(db)
    .await?;

    Ok(GradeSummary {
        average_score,
        total_grades,
        distribution,
    })
}

async fn course_popularity(db: &PgPool) -> Result<Vec<CoursePopularity>, AppError> {
    let courses = sqlx::query_as::<_, CoursePopularity>(
        r#"SELECT c.id AS course_id, c.name AS course_name, COUNT(e.id) AS enrollments
        FROM courses c
        LEFT JOIN enrollments e ON e.course_id = c.id
        GROUP BY c.id, c.name
        ORDER BY enrollments DESC, c.name, c.id
        LIMIT $1"#,
    )
    .bind(POPULAR_COURSES)
    .fetch_all(db)
    .await?;

    Ok(courses)
}

#[instrument(skip(db))]
pub async fn dashboard(db: &PgPool) -> Result<DashboardStats, AppError> {
    let (classes_total, courses_total): (i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM classes), (SELECT COUNT(*) FROM courses)",
    )
    .fetch_one(db)
    .await?;

    Ok(DashboardStats {
        student_gender: student_gender(db).await?,
        attendance: attendance_summary(db).await?,
        grades: grade_summary(db).await?,
        classes_total,
        courses_total,
        course_popularity: course_popularity(db).await?,
    })
}
