use rollbook_core::permissions::{BuiltinRole, CATALOG};
use rollbook_db::seed::{
    BOOTSTRAP_ADMIN_PASSWORD, BOOTSTRAP_ADMIN_USERNAME, BootstrapAdmin, SeedError,
    create_bootstrap_admin, seed_defaults,
};
use sqlx::PgPool;

async fn grant_counts(pool: &PgPool) -> Vec<(String, i64)> {
    sqlx::query_as(
        r#"SELECT r.name, COUNT(rp.permission_id)
        FROM roles r
        LEFT JOIN role_permissions rp ON rp.role_id = r.id
        GROUP BY r.name
        ORDER BY r.name"#,
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_seed_defaults_is_idempotent(pool: PgPool) {
    let first = seed_defaults(&pool).await.unwrap();
    assert_eq!(first.roles_created, 4);
    assert_eq!(first.permissions_created, CATALOG.len() as u64);
    assert_eq!(first.roles_granted.len(), 4);

    let counts_after_first = grant_counts(&pool).await;

    let second = seed_defaults(&pool).await.unwrap();
    assert_eq!(second.roles_created, 0);
    assert_eq!(second.permissions_created, 0);
    assert!(second.roles_granted.is_empty());

    let permissions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM permissions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(permissions, CATALOG.len() as i64);
    assert_eq!(grant_counts(&pool).await, counts_after_first);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_default_grants_match_builtin_roles(pool: PgPool) {
    seed_defaults(&pool).await.unwrap();

    for role in BuiltinRole::ALL {
        let mut stored: Vec<String> = sqlx::query_scalar(
            r#"SELECT p.key FROM role_permissions rp
            JOIN permissions p ON p.id = rp.permission_id
            JOIN roles r ON r.id = rp.role_id
            WHERE r.name = $1"#,
        )
        .bind(role.name())
        .fetch_all(&pool)
        .await
        .unwrap();
        stored.sort();

        let mut expected: Vec<String> =
            role.default_grants().into_iter().map(str::to_string).collect();
        expected.sort();
        expected.dedup();

        assert_eq!(stored, expected, "grants for {}", role.name());
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_configured_role_keeps_its_grants_on_reseed(pool: PgPool) {
    seed_defaults(&pool).await.unwrap();

    sqlx::query(
        r#"DELETE FROM role_permissions
        WHERE role_id = (SELECT id FROM roles WHERE name = 'parent')
          AND permission_id <> (SELECT id FROM permissions WHERE key = 'grade:read')"#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let report = seed_defaults(&pool).await.unwrap();
    assert!(report.roles_granted.is_empty());

    let parent: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM role_permissions
        WHERE role_id = (SELECT id FROM roles WHERE name = 'parent')"#,
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(parent, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bootstrap_admin_is_created_once(pool: PgPool) {
    seed_defaults(&pool).await.unwrap();

    let first = create_bootstrap_admin(&pool, BOOTSTRAP_ADMIN_USERNAME, BOOTSTRAP_ADMIN_PASSWORD)
        .await
        .unwrap();
    let BootstrapAdmin::Created { user_id } = first else {
        panic!("expected the admin to be created, got {:?}", first);
    };

    let second = create_bootstrap_admin(&pool, BOOTSTRAP_ADMIN_USERNAME, "something-else")
        .await
        .unwrap();
    assert_eq!(second, BootstrapAdmin::AlreadyExists);

    let (role_name, profile_type): (String, String) = sqlx::query_as(
        r#"SELECT r.name, u.profile_type FROM users u
        JOIN roles r ON r.id = u.role_id
        WHERE u.id = $1"#,
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(role_name, "admin");
    assert_eq!(profile_type, "admin");

    let hash: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(rollbook_core::verify_password(BOOTSTRAP_ADMIN_PASSWORD, &hash).unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bootstrap_admin_requires_seeded_roles(pool: PgPool) {
    let result = create_bootstrap_admin(&pool, "admin", "admin123").await;
    assert!(matches!(result, Err(SeedError::MissingAdminRole)));
}
