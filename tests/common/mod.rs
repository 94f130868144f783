use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rollbook::config::{CorsConfig, JwtConfig};
use rollbook::router::init_router;
use rollbook::state::AppState;
use rollbook_core::hash_password;
use rollbook_db::seed::seed_defaults;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "rollbook-test-secret";
pub const TEST_PASSWORD: &str = "testpass123";

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub role_id: Uuid,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET)
}

/// Seeds the built-in roles and builds the full router.
pub async fn setup_test_app(pool: PgPool) -> axum::Router {
    seed_defaults(&pool).await.unwrap();
    let state = AppState::new(pool, &test_jwt_config(), CorsConfig::from_env());
    init_router(state)
}

pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

#[allow(dead_code)]
pub async fn role_id(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Creates a role holding exactly `keys`.
#[allow(dead_code)]
pub async fn create_role_with(pool: &PgPool, keys: &[&str]) -> Uuid {
    let id: Uuid = sqlx::query_scalar("INSERT INTO roles (name) VALUES ($1) RETURNING id")
        .bind(unique("role"))
        .fetch_one(pool)
        .await
        .unwrap();

    let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    sqlx::query(
        r#"INSERT INTO role_permissions (role_id, permission_id)
        SELECT $1, id FROM permissions WHERE key = ANY($2)"#,
    )
    .bind(id)
    .bind(&keys)
    .execute(pool)
    .await
    .unwrap();

    id
}

#[allow(dead_code)]
pub async fn create_test_user(pool: &PgPool, role_id: Uuid) -> TestUser {
    create_user_with(pool, role_id, true).await
}

#[allow(dead_code)]
pub async fn create_user_with(pool: &PgPool, role_id: Uuid, is_active: bool) -> TestUser {
    let username = unique("user");
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id: Uuid = sqlx::query_scalar(
        r#"INSERT INTO users (username, password_hash, role_id, is_active)
        VALUES ($1, $2, $3, $4)
        RETURNING id"#,
    )
    .bind(&username)
    .bind(&hashed)
    .bind(role_id)
    .bind(is_active)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        username,
        password: TEST_PASSWORD.to_string(),
        role_id,
    }
}

/// A user with the built-in `admin` role.
#[allow(dead_code)]
pub async fn create_admin(pool: &PgPool) -> TestUser {
    let admin = role_id(pool, "admin").await;
    create_test_user(pool, admin).await
}

#[allow(dead_code)]
pub async fn create_student(pool: &PgPool) -> (Uuid, String) {
    let code = unique("S");
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO students (name, student_code) VALUES ($1, $2) RETURNING id",
    )
    .bind("Test Student")
    .bind(&code)
    .fetch_one(pool)
    .await
    .unwrap();
    (id, code)
}

#[allow(dead_code)]
pub async fn create_course(pool: &PgPool, capacity: i32) -> Uuid {
    sqlx::query_scalar("INSERT INTO courses (name, capacity) VALUES ($1, $2) RETURNING id")
        .bind(unique("Course"))
        .bind(capacity)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn create_enrollment(pool: &PgPool, student_id: Uuid, course_id: Uuid) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_grade(pool: &PgPool, enrollment_id: Uuid, score_type: &str, score: f64) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO grades (enrollment_id, score_type, score) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(enrollment_id)
    .bind(score_type)
    .bind(score)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_teacher(pool: &PgPool) -> Uuid {
    sqlx::query_scalar("INSERT INTO teachers (name, teacher_code) VALUES ($1, $2) RETURNING id")
        .bind("Test Teacher")
        .bind(unique("T"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn create_class(pool: &PgPool, teacher_id: Option<Uuid>) -> Uuid {
    sqlx::query_scalar("INSERT INTO classes (name, teacher_id) VALUES ($1, $2) RETURNING id")
        .bind(unique("Class"))
        .bind(teacher_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Sends one request and returns the status with the parsed JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    call(app, request).await
}

pub async fn call(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "Non-JSON response. Status: {}, Body: {:?}",
                status,
                String::from_utf8_lossy(&bytes)
            )
        })
    };
    (status, body)
}

pub async fn get_auth_token(app: &axum::Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;

    body["data"]["token"]
        .as_str()
        .unwrap_or_else(|| panic!("No token in response. Status: {}, Body: {}", status, body))
        .to_string()
}
