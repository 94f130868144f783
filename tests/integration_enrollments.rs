mod common;

use axum::http::StatusCode;
use common::{
    create_admin, create_course, create_enrollment, create_grade, create_student,
    get_auth_token, send, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

async fn admin_token(app: &axum::Router, pool: &PgPool) -> String {
    let admin = create_admin(pool).await;
    get_auth_token(app, &admin.username, &admin.password).await
}

async fn count(pool: &PgPool, sql: &str, id: Uuid) -> i64 {
    sqlx::query_scalar(sql).bind(id).fetch_one(pool).await.unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enroll_by_student_code(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;
    let (student_id, code) = create_student(&pool).await;
    let course_id = create_course(&pool, 30).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/enrollments",
        Some(&token),
        Some(json!({ "student_code": code, "course_id": course_id })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], 201);
    assert_eq!(body["data"]["student"]["id"], student_id.to_string());
    assert_eq!(body["data"]["student"]["student_code"], code);
    assert_eq!(body["data"]["course"]["id"], course_id.to_string());
    assert_eq!(body["data"]["grades"], json!([]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_enrollment_conflicts(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;
    let (student_id, code) = create_student(&pool).await;
    let course_id = create_course(&pool, 30).await;
    let payload = json!({ "student_code": code, "course_id": course_id });

    let (status, _) = send(&app, "POST", "/api/v1/enrollments", Some(&token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/v1/enrollments", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Student is already enrolled in this course");

    let rows = count(
        &pool,
        "SELECT COUNT(*) FROM enrollments WHERE student_id = $1",
        student_id,
    )
    .await;
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enroll_unknown_student_or_course(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;
    let (_, code) = create_student(&pool).await;
    let course_id = create_course(&pool, 30).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/enrollments",
        Some(&token),
        Some(json!({ "student_code": "NOPE-404", "course_id": course_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student 'NOPE-404' not found");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/enrollments",
        Some(&token),
        Some(json!({ "student_code": code, "course_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_full_course_rejects_enrollment(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;
    let course_id = create_course(&pool, 1).await;
    let (first, _) = create_student(&pool).await;
    create_enrollment(&pool, first, course_id).await;
    let (second, code) = create_student(&pool).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/enrollments",
        Some(&token),
        Some(json!({ "student_code": code, "course_id": course_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Course is full (1 seats)");

    let rows = count(
        &pool,
        "SELECT COUNT(*) FROM enrollments WHERE student_id = $1",
        second,
    )
    .await;
    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unenroll_removes_grades_first(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;
    let (student_id, _) = create_student(&pool).await;
    let course_id = create_course(&pool, 30).await;
    let enrollment_id = create_enrollment(&pool, student_id, course_id).await;
    create_grade(&pool, enrollment_id, "midterm", 72.0).await;
    create_grade(&pool, enrollment_id, "final", 88.5).await;

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/enrollments/{}", enrollment_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["enrollment_id"], enrollment_id.to_string());
    assert_eq!(body["data"]["grades_removed"], 2);

    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM grades WHERE enrollment_id = $1", enrollment_id).await,
        0
    );
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM enrollments WHERE id = $1", enrollment_id).await,
        0
    );

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/enrollments/{}", enrollment_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_unenroll_keeps_grades(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;
    let (student_id, _) = create_student(&pool).await;
    let course_id = create_course(&pool, 30).await;
    let enrollment_id = create_enrollment(&pool, student_id, course_id).await;
    create_grade(&pool, enrollment_id, "quiz", 10.0).await;

    sqlx::query(
        r#"CREATE FUNCTION block_enrollment_delete() RETURNS TRIGGER AS $$
        BEGIN
            RAISE EXCEPTION 'enrollment delete blocked';
        END;
        $$ LANGUAGE plpgsql"#,
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        r#"CREATE TRIGGER trg_block_enrollment_delete
        BEFORE DELETE ON enrollments
        FOR EACH ROW EXECUTE FUNCTION block_enrollment_delete()"#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/enrollments/{}", enrollment_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "internal server error");

    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM grades WHERE enrollment_id = $1", enrollment_id).await,
        1
    );
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM enrollments WHERE id = $1", enrollment_id).await,
        1
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_enrollments_includes_grades(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;
    let course_id = create_course(&pool, 30).await;
    let other_course = create_course(&pool, 30).await;
    let (student_id, _) = create_student(&pool).await;
    let (other_student, _) = create_student(&pool).await;

    let enrollment_id = create_enrollment(&pool, student_id, course_id).await;
    create_enrollment(&pool, other_student, course_id).await;
    create_enrollment(&pool, student_id, other_course).await;
    create_grade(&pool, enrollment_id, "final", 91.0).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/enrollments?course_id={}", course_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);

    let (_, body) = send(
        &app,
        "GET",
        &format!(
            "/api/v1/enrollments?course_id={}&student_id={}",
            course_id, student_id
        ),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["total"], 1);
    let entry = &body["data"]["list"][0];
    assert_eq!(entry["id"], enrollment_id.to_string());
    assert_eq!(entry["grades"].as_array().unwrap().len(), 1);
    assert_eq!(entry["grades"][0]["score"], 91.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enroll_requires_permission(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let student_role = common::role_id(&pool, "student").await;
    let user = common::create_test_user(&pool, student_role).await;
    let token = get_auth_token(&app, &user.username, &user.password).await;
    let (_, code) = create_student(&pool).await;
    let course_id = create_course(&pool, 30).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/enrollments",
        Some(&token),
        Some(json!({ "student_code": code, "course_id": course_id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/v1/enrollments", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_enrollment_of_same_pair(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;
    let (student_id, code) = create_student(&pool).await;
    let course_id = create_course(&pool, 30).await;
    let payload = json!({ "student_code": code, "course_id": course_id });

    let ((first, _), (second, _)) = tokio::join!(
        send(&app, "POST", "/api/v1/enrollments", Some(&token), Some(payload.clone())),
        send(&app, "POST", "/api/v1/enrollments", Some(&token), Some(payload.clone())),
    );

    let mut statuses = [first, second];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM enrollments WHERE student_id = $1", student_id).await,
        1
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_enrollment_respects_last_seat(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;
    let course_id = create_course(&pool, 1).await;
    let (_, first_code) = create_student(&pool).await;
    let (_, second_code) = create_student(&pool).await;

    let ((first, _), (second, _)) = tokio::join!(
        send(
            &app,
            "POST",
            "/api/v1/enrollments",
            Some(&token),
            Some(json!({ "student_code": first_code, "course_id": course_id })),
        ),
        send(
            &app,
            "POST",
            "/api/v1/enrollments",
            Some(&token),
            Some(json!({ "student_code": second_code, "course_id": course_id })),
        ),
    );

    let mut statuses = [first, second];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM enrollments WHERE course_id = $1", course_id).await,
        1
    );
}
