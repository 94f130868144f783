//! Demo dataset seeding.
//!
//! Rows are generated in parallel ([`generate`]) and written in batches inside
//! a single transaction, so a failed run leaves nothing behind.

pub mod generate;
pub mod models;

use std::time::Instant;

use rollbook_models::{CourseId, StudentId, TeacherId};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

pub use models::DemoConfig;
use models::{CourseSeed, StudentSeed, TeacherSeed};

/// Rows per INSERT statement, below Postgres' bind parameter limit.
const BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoReport {
    pub teachers: usize,
    pub courses: usize,
    pub students: usize,
    pub enrollments: usize,
}

pub async fn seed_demo(db: &PgPool, config: DemoConfig) -> anyhow::Result<DemoReport> {
    let start_time = Instant::now();
    let run = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    println!("🌱 Seeding demo data (run {})...", run);

    let teachers = generate::generate_teachers(&run, config.teachers);
    let students = generate::generate_students(&run, config.students);

    let mut tx = db.begin().await?;

    let teacher_ids = insert_teachers(&mut tx, &teachers).await?;
    println!("   ✓ {} teachers", teacher_ids.len());

    let courses = generate::generate_courses(config.courses, &teacher_ids);
    let course_ids = insert_courses(&mut tx, &courses).await?;
    println!("   ✓ {} courses", course_ids.len());

    let student_ids = insert_students(&mut tx, &students).await?;
    println!("   ✓ {} students", student_ids.len());

    let pairs: Vec<(StudentId, CourseId)> = generate::enrollment_pairs(
        student_ids.len(),
        course_ids.len(),
        config.enrollments_per_student,
    )
    .into_iter()
    .map(|(s, c)| (student_ids[s], course_ids[c]))
    .collect();
    let enrollments = insert_enrollments(&mut tx, &pairs).await?;
    println!("   ✓ {} enrollments", enrollments);

    tx.commit().await?;

    println!("✅ Demo data ready in {:?}", start_time.elapsed());
    Ok(DemoReport {
        teachers: teacher_ids.len(),
        courses: course_ids.len(),
        students: student_ids.len(),
        enrollments,
    })
}

async fn insert_teachers(
    tx: &mut Transaction<'_, Postgres>,
    teachers: &[TeacherSeed],
) -> Result<Vec<TeacherId>, sqlx::Error> {
    let mut ids = Vec::with_capacity(teachers.len());
    for chunk in teachers.chunks(BATCH_SIZE) {
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO teachers (name, teacher_code, email) ");
        qb.push_values(chunk, |mut row, t| {
            row.push_bind(&t.name)
                .push_bind(&t.teacher_code)
                .push_bind(&t.email);
        });
        qb.push(" RETURNING id");
        ids.extend(qb.build_query_scalar::<TeacherId>().fetch_all(&mut **tx).await?);
    }
    Ok(ids)
}

async fn insert_courses(
    tx: &mut Transaction<'_, Postgres>,
    courses: &[CourseSeed],
) -> Result<Vec<CourseId>, sqlx::Error> {
    let mut ids = Vec::with_capacity(courses.len());
    for chunk in courses.chunks(BATCH_SIZE) {
        let mut qb =
            QueryBuilder::<Postgres>::new("INSERT INTO courses (name, teacher_id, credits, capacity) ");
        qb.push_values(chunk, |mut row, c| {
            row.push_bind(&c.name)
                .push_bind(c.teacher_id)
                .push_bind(c.credits)
                .push_bind(c.capacity);
        });
        qb.push(" RETURNING id");
        ids.extend(qb.build_query_scalar::<CourseId>().fetch_all(&mut **tx).await?);
    }
    Ok(ids)
}

async fn insert_students(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentSeed],
) -> Result<Vec<StudentId>, sqlx::Error> {
    let mut ids = Vec::with_capacity(students.len());
    for chunk in students.chunks(BATCH_SIZE) {
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO students (name, student_code, gender, age, email) ",
        );
        qb.push_values(chunk, |mut row, s| {
            row.push_bind(&s.name)
                .push_bind(&s.student_code)
                .push_bind(s.gender)
                .push_bind(s.age)
                .push_bind(&s.email);
        });
        qb.push(" RETURNING id");
        ids.extend(qb.build_query_scalar::<StudentId>().fetch_all(&mut **tx).await?);
    }
    Ok(ids)
}

async fn insert_enrollments(
    tx: &mut Transaction<'_, Postgres>,
    pairs: &[(StudentId, CourseId)],
) -> Result<usize, sqlx::Error> {
    let mut inserted = 0;
    for chunk in pairs.chunks(BATCH_SIZE) {
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO enrollments (student_id, course_id) ");
        qb.push_values(chunk, |mut row, (student_id, course_id)| {
            row.push_bind(*student_id).push_bind(*course_id);
        });
        qb.push(" ON CONFLICT DO NOTHING");
        inserted += qb.build().execute(&mut **tx).await?.rows_affected() as usize;
    }
    Ok(inserted)
}
