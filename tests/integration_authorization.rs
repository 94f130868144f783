mod common;

use axum::http::StatusCode;
use common::{
    create_admin, create_role_with, create_student, create_test_user, get_auth_token, send,
    setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_read_allowed_delete_forbidden(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let role = create_role_with(&pool, &["student:read"]).await;
    let user = create_test_user(&pool, role).await;
    let token = get_auth_token(&app, &user.username, &user.password).await;
    let (student_id, _) = create_student(&pool).await;

    let uri = format!("/api/v1/students/{}", student_id);

    let (status, body) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);
    assert_eq!(
        body["message"],
        "Access denied. Missing required permission: student:delete"
    );

    let (status, body) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], student_id.to_string());

    let still_there: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM students WHERE id = $1)")
            .bind(student_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(still_there);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_permission_change_applies_to_next_request(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let role = create_role_with(&pool, &["course:read"]).await;
    let user = create_test_user(&pool, role).await;
    let token = get_auth_token(&app, &user.username, &user.password).await;

    let admin = create_admin(&pool).await;
    let admin_token = get_auth_token(&app, &admin.username, &admin.password).await;

    let (status, _) = send(&app, "GET", "/api/v1/courses", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/admin/roles/{}/permissions", role),
        Some(&admin_token),
        Some(json!({ "permissions": ["student:read"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Same token, no re-login.
    let (status, _) = send(&app, "GET", "/api/v1/courses", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/v1/students", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleted_role_authenticates_without_permissions(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let role = create_role_with(&pool, &["student:read"]).await;
    let user = create_test_user(&pool, role).await;
    let token = get_auth_token(&app, &user.username, &user.password).await;

    sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(role)
        .execute(&pool)
        .await
        .unwrap();

    // Stage one still passes.
    let (status, body) = send(&app, "GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["permissions"], json!([]));
    assert!(body["data"]["user"]["role_name"].is_null());

    // Stage two denies.
    let (status, _) = send(&app, "GET", "/api/v1/students", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_guarded_route_without_token(pool: PgPool) {
    let app = setup_test_app(pool).await;

    for uri in [
        "/api/v1/students",
        "/api/v1/courses",
        "/api/v1/enrollments",
        "/api/v1/grades",
        "/api/v1/admin/roles",
        "/api/v1/admin/stats/overview",
    ] {
        let (status, body) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["error"], "missing", "{}", uri);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_authentication_runs_before_validation(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some("not-a-token"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_forbidden_write_has_no_effect(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let role = create_role_with(&pool, &["course:read"]).await;
    let user = create_test_user(&pool, role).await;
    let token = get_auth_token(&app, &user.username, &user.password).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/courses",
        Some(&token),
        Some(json!({ "name": "Forbidden Course" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_builtin_student_role_is_read_only(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let student_role = common::role_id(&pool, "student").await;
    let user = create_test_user(&pool, student_role).await;
    let token = get_auth_token(&app, &user.username, &user.password).await;

    let (status, _) = send(&app, "GET", "/api/v1/grades", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/grades",
        Some(&token),
        Some(json!({
            "student_id": uuid::Uuid::new_v4(),
            "course_id": uuid::Uuid::new_v4(),
            "score_type": "final",
            "score": 100.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/v1/admin/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
