mod common;

use axum::http::StatusCode;
use common::{
    create_admin, create_class, create_course, create_enrollment, create_grade, create_student,
    create_test_user, get_auth_token, role_id, send, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;

async fn admin_token(app: &axum::Router, pool: &PgPool) -> String {
    let admin = create_admin(pool).await;
    get_auth_token(app, &admin.username, &admin.password).await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_crud(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(&token),
        Some(json!({ "name": "Chidi Okeke", "student_code": "STU-0001", "age": 15 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(&token),
        Some(json!({ "name": "Someone Else", "student_code": "STU-0001" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Student code 'STU-0001' is already in use");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(&token),
        Some(json!({ "name": "Bad Email", "student_code": "STU-0002", "email": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/students/{}", id),
        Some(&token),
        Some(json!({ "name": "Chidi O. Okeke" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Chidi O. Okeke");
    assert_eq!(body["data"]["age"], 15);

    let (status, body) =
        send(&app, "GET", "/api/v1/students?student_code=0001", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_student_cascades(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;
    let (student_id, _) = create_student(&pool).await;
    let first_course = create_course(&pool, 30).await;
    let second_course = create_course(&pool, 30).await;
    let first = create_enrollment(&pool, student_id, first_course).await;
    let second = create_enrollment(&pool, student_id, second_course).await;
    create_grade(&pool, first, "final", 70.0).await;
    create_grade(&pool, second, "final", 80.0).await;
    create_grade(&pool, second, "quiz", 8.0).await;

    let linked = create_test_user(&pool, role_id(&pool, "student").await).await;
    sqlx::query("UPDATE users SET profile_type = 'student', profile_id = $2 WHERE id = $1")
        .bind(linked.id)
        .bind(student_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/students/{}", student_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["enrollments_removed"], 2);
    assert_eq!(body["data"]["grades_removed"], 3);

    let (profile_type, profile_id): (String, Option<uuid::Uuid>) =
        sqlx::query_as("SELECT profile_type, profile_id FROM users WHERE id = $1")
            .bind(linked.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(profile_type, "");
    assert!(profile_id.is_none());

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/students/{}", student_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_crud_and_cascade(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/courses",
        Some(&token),
        Some(json!({ "name": "Further Mathematics", "credits": 3.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["capacity"], 50);
    let course_id: uuid::Uuid = body["data"]["id"].as_str().unwrap().parse().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/courses",
        Some(&token),
        Some(json!({ "name": "Orphan", "teacher_id": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (student_id, _) = create_student(&pool).await;
    let enrollment = create_enrollment(&pool, student_id, course_id).await;
    create_grade(&pool, enrollment, "final", 64.0).await;

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/courses/{}", course_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["enrollments_removed"], 1);
    assert_eq!(body["data"]["grades_removed"], 1);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/courses/{}", course_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_overview_stats(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;
    let (student_id, _) = create_student(&pool).await;
    let course_id = create_course(&pool, 30).await;
    let enrollment = create_enrollment(&pool, student_id, course_id).await;
    create_grade(&pool, enrollment, "final", 99.0).await;
    common::create_user_with(&pool, role_id(&pool, "parent").await, false).await;

    let (status, body) =
        send(&app, "GET", "/api/v1/admin/stats/overview", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["users_total"], 2);
    assert_eq!(body["data"]["users_active"], 1);
    assert_eq!(body["data"]["students_total"], 1);
    assert_eq!(body["data"]["courses_total"], 1);
    assert_eq!(body["data"]["enrollments_total"], 1);
    assert_eq!(body["data"]["grades_total"], 1);

    let teacher = create_test_user(&pool, role_id(&pool, "teacher").await).await;
    let teacher_token = get_auth_token(&app, &teacher.username, &teacher.password).await;
    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/admin/stats/overview",
        Some(&teacher_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_with_enormous_page_number(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;
    create_student(&pool).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/students?page={}&page_size=100", i64::MAX),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["list"], json!([]));
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["has_more"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dashboard_on_empty_school(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;

    let (status, body) =
        send(&app, "GET", "/api/v1/admin/stats/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["attendance"]["attendance_rate"], 0.0);
    assert!(data["grades"]["average_score"].is_null());
    assert_eq!(data["grades"]["total_grades"], 0);
    let counts: Vec<i64> = data["grades"]["distribution"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["count"].as_i64().unwrap())
        .collect();
    assert_eq!(counts, vec![0, 0, 0, 0, 0]);
    assert_eq!(data["course_popularity"], json!([]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dashboard_aggregates(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;

    let mut students = Vec::new();
    for gender in [Some("Male"), Some("female"), Some("x"), None] {
        let (id, _) = create_student(&pool).await;
        sqlx::query("UPDATE students SET gender = $1 WHERE id = $2")
            .bind(gender)
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();
        students.push(id);
    }

    for (date, status) in [
        ("2025-03-03", "present"),
        ("2025-03-04", "present"),
        ("2025-03-05", "late"),
        ("2025-03-06", "absent"),
    ] {
        sqlx::query("INSERT INTO attendance (student_id, date, status) VALUES ($1, $2::date, $3)")
            .bind(students[0])
            .bind(date)
            .bind(status)
            .execute(&pool)
            .await
            .unwrap();
    }

    let popular = create_course(&pool, 30).await;
    let quiet = create_course(&pool, 30).await;
    let a = create_enrollment(&pool, students[0], popular).await;
    let b = create_enrollment(&pool, students[1], popular).await;
    let c = create_enrollment(&pool, students[2], quiet).await;
    create_grade(&pool, a, "final", 55.0).await;
    create_grade(&pool, b, "final", 65.0).await;
    create_grade(&pool, c, "final", 90.0).await;
    create_grade(&pool, c, "midterm", 100.0).await;
    create_class(&pool, None).await;

    let (status, body) =
        send(&app, "GET", "/api/v1/admin/stats/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];

    assert_eq!(
        data["student_gender"],
        json!({ "male": 1, "female": 1, "other": 1, "unspecified": 1 })
    );

    assert_eq!(data["attendance"]["present"], 2);
    assert_eq!(data["attendance"]["late"], 1);
    assert_eq!(data["attendance"]["absent"], 1);
    assert_eq!(data["attendance"]["attendance_rate"], 0.75);

    assert_eq!(data["grades"]["average_score"], 77.5);
    assert_eq!(data["grades"]["total_grades"], 4);
    assert_eq!(
        data["grades"]["distribution"],
        json!([
            { "label": "<60", "count": 1 },
            { "label": "60-69", "count": 1 },
            { "label": "70-79", "count": 0 },
            { "label": "80-89", "count": 0 },
            { "label": ">=90", "count": 2 }
        ])
    );

    assert_eq!(data["classes_total"], 1);
    assert_eq!(data["courses_total"], 2);
    let popularity = data["course_popularity"].as_array().unwrap();
    assert_eq!(popularity.len(), 2);
    assert_eq!(popularity[0]["course_id"], popular.to_string());
    assert_eq!(popularity[0]["enrollments"], 2);
    assert_eq!(popularity[1]["enrollments"], 1);

    let teacher = create_test_user(&pool, role_id(&pool, "teacher").await).await;
    let teacher_token = get_auth_token(&app, &teacher.username, &teacher.password).await;
    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/admin/stats/dashboard",
        Some(&teacher_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
