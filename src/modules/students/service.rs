use anyhow::anyhow;
use rollbook_core::{AppError, Paginated, PaginationParams};
use rollbook_models::StudentId;
use rollbook_models::students::{
    CreateStudentDto, Student, StudentDeletion, StudentFilterParams, UpdateStudentDto,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::utils::db::{is_foreign_key_violation, is_unique_violation};

const STUDENT_COLUMNS: &str = "id, name, student_code, gender, age, email, phone, address, class_id, created_at, updated_at";

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &StudentFilterParams) {
    qb.push(" WHERE 1=1");
    if let Some(name) = filter.name.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND name ILIKE ").push_bind(format!("%{}%", name));
    }
    if let Some(code) = filter.student_code.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND student_code ILIKE ").push_bind(format!("%{}%", code));
    }
    if let Some(class_id) = filter.class_id {
        qb.push(" AND class_id = ").push_bind(class_id);
    }
}

fn write_error(err: sqlx::Error, student_code: Option<&str>) -> AppError {
    if is_unique_violation(&err) {
        return AppError::conflict(anyhow!(
            "Student code '{}' is already in use",
            student_code.unwrap_or_default()
        ));
    }
    if is_foreign_key_violation(&err) {
        return AppError::bad_request(anyhow!("Class does not exist"));
    }
    AppError::from(err)
}

fn not_found(id: StudentId) -> AppError {
    AppError::not_found(anyhow!("Student {} not found", id))
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn list_students(
        db: &PgPool,
        filter: StudentFilterParams,
        pagination: PaginationParams,
    ) -> Result<Paginated<Student>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM students", STUDENT_COLUMNS));
        push_filters(&mut qb, &filter);
        qb.push(" ORDER BY student_code LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let students = qb.build_query_as::<Student>().fetch_all(db).await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM students");
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        Ok(Paginated::new(students, total, &pagination))
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: StudentId) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!("SELECT {} FROM students WHERE id = $1", STUDENT_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| not_found(id))
    }

    #[instrument(skip(db, dto), fields(student_code = %dto.student_code))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students (name, student_code, gender, age, email, phone, address, class_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}"#,
            STUDENT_COLUMNS
        ))
        .bind(&dto.name)
        .bind(&dto.student_code)
        .bind(&dto.gender)
        .bind(dto.age)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(dto.class_id)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, Some(&dto.student_code)))?;

        info!(student_id = %student.id, "Student created");
        Ok(student)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            r#"UPDATE students SET
                name = COALESCE($2, name),
                gender = COALESCE($3, gender),
                age = COALESCE($4, age),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                address = COALESCE($7, address),
                class_id = COALESCE($8, class_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}"#,
            STUDENT_COLUMNS
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.gender)
        .bind(dto.age)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(dto.class_id)
        .fetch_optional(db)
        .await
        .map_err(|e| write_error(e, None))?
        .ok_or_else(|| not_found(id))
    }

    /// Deletes a student with everything that references it: grades first,
    /// then enrollments, then the per-student records, then the student row.
    /// User accounts linked to the removed profiles are unlinked. All or
    /// nothing.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: StudentId) -> Result<StudentDeletion, AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM students WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found(id))?;

        let grades_removed = sqlx::query(
            r#"DELETE FROM grades
            WHERE enrollment_id IN (SELECT id FROM enrollments WHERE student_id = $1)"#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let enrollments_removed = sqlx::query("DELETE FROM enrollments WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM attendance WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM rewards WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let parent_ids: Vec<Uuid> =
            sqlx::query_scalar("DELETE FROM parents WHERE student_id = $1 RETURNING id")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"UPDATE users SET profile_type = '', profile_id = NULL, updated_at = NOW()
            WHERE (profile_type = 'student' AND profile_id = $1)
               OR (profile_type = 'parent' AND profile_id = ANY($2))"#,
        )
        .bind(id)
        .bind(&parent_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            student_id = %id,
            grades_removed,
            enrollments_removed,
            parents_removed = parent_ids.len(),
            "Student deleted"
        );

        Ok(StudentDeletion {
            student_id: id,
            enrollments_removed,
            grades_removed,
        })
    }
}
