mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    TEST_PASSWORD, call, create_admin, create_role_with, create_test_user, create_user_with,
    get_auth_token, role_id, send, setup_test_app, test_jwt_config,
};
use rollbook_auth::TokenService;
use serde_json::json;
use sqlx::PgPool;
use std::time::Instant;

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success_returns_verifiable_token(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let teacher = role_id(&pool, "teacher").await;
    let user = create_test_user(&pool, teacher).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": user.username, "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["expires_in"], 86_400);
    assert_eq!(body["data"]["user"]["username"], user.username);
    assert_eq!(body["data"]["user"]["role_name"], "teacher");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let permissions = body["data"]["permissions"].as_array().unwrap();
    assert!(permissions.iter().any(|p| p == "grade:create"));

    let token = body["data"]["token"].as_str().unwrap();
    let claims = TokenService::new(&test_jwt_config()).verify(token).unwrap();
    assert_eq!(claims.user_id, user.id);
    assert_eq!(claims.role_id, teacher);
    assert_eq!(claims.username, user.username);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let user = create_admin(&pool).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": user.username, "password": "wrong-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
    assert_eq!(body["message"], "invalid username or password");
    assert!(body.get("data").is_none());
    assert!(body.get("token").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_user_matches_wrong_password(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let user = create_test_user(&pool, role_id(&pool, "teacher").await).await;

    // Warm up the throwaway hash so neither timing below includes it.
    send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "warmup", "password": "whatever" })),
    )
    .await;

    let started = Instant::now();
    let (wrong_status, wrong_body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": user.username, "password": "whatever" })),
    )
    .await;
    let wrong_password_took = started.elapsed();

    let started = Instant::now();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": "whatever" })),
    )
    .await;
    let unknown_user_took = started.elapsed();

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(status, wrong_status);
    assert_eq!(body, wrong_body);
    // Both paths run one bcrypt verification; allow generous scheduling noise.
    assert!(
        unknown_user_took * 4 >= wrong_password_took,
        "unknown user answered in {:?}, wrong password in {:?}",
        unknown_user_took,
        wrong_password_took
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_disabled_account(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let student = role_id(&pool, "student").await;
    let user = create_user_with(&pool, student, false).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": user.username, "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);
    assert!(body.get("data").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_missing_field(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "someone" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_returns_user_and_permissions(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let role = create_role_with(&pool, &["student:read", "course:read"]).await;
    let user = create_test_user(&pool, role).await;
    let token = get_auth_token(&app, &user.username, &user.password).await;

    let (status, body) = send(&app, "GET", "/api/v1/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"], user.id.to_string());
    assert_eq!(body["data"]["permissions"], json!(["course:read", "student:read"]));
    assert!(body["data"]["profile"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_and_malformed_headers_are_distinguished(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let (status, body) = send(&app, "GET", "/api/v1/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing");

    let request = Request::builder()
        .uri("/api/v1/auth/me")
        .header("authorization", "Token abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "malformed");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_token_signed_with_other_secret_is_rejected(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let user = create_admin(&pool).await;

    let foreign = TokenService::new(&rollbook::config::JwtConfig::new("another-secret"))
        .issue(user.id, &user.username, user.role_id)
        .unwrap();

    let (status, body) = send(&app, "GET", "/api/v1/auth/me", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_signature");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_token_is_rejected(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let user = create_admin(&pool).await;

    let expired = TokenService::new(&test_jwt_config().with_ttl(-3600))
        .issue(user.id, &user.username, user.role_id)
        .unwrap();

    let (status, body) = send(&app, "GET", "/api/v1/auth/me", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "expired");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_change_password_keeps_existing_token(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let user = create_admin(&pool).await;
    let token = get_auth_token(&app, &user.username, &user.password).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/auth/password",
        Some(&token),
        Some(json!({ "old_password": "not-it", "new_password": "newpass456" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/auth/password",
        Some(&token),
        Some(json!({ "old_password": user.password, "new_password": "newpass456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": user.username, "password": "newpass456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deactivated_user_token_stays_valid(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let user = create_admin(&pool).await;
    let token = get_auth_token(&app, &user.username, &user.password).await;

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = send(&app, "GET", "/api/v1/admin/roles", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_is_public(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let (status, body) = send(&app, "POST", "/api/v1/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out");
}
