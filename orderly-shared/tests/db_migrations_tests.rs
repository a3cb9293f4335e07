/// Integration tests for database migrations
///
/// These tests require a running PostgreSQL database and are skipped when
/// DATABASE_URL is not set.

use orderly_shared::db::migrations::{ensure_database_exists, get_migration_status, run_migrations};
use orderly_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
use std::env;

#[tokio::test]
async fn test_run_migrations_is_idempotent() {
    let Ok(db_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    ensure_database_exists(&db_url)
        .await
        .expect("Failed to create database");

    let pool = create_pool(DatabaseConfig {
        url: db_url,
        ..Default::default()
    })
    .await
    .expect("Failed to create pool");

    run_migrations(&pool).await.expect("First run failed");
    let first = get_migration_status(&pool).await.expect("Failed to read status");

    run_migrations(&pool).await.expect("Second run failed");
    let second = get_migration_status(&pool).await.expect("Failed to read status");

    assert!(first.applied_migrations >= 4, "Expected every table migration");
    assert_eq!(first, second);
    assert!(second.latest_version.is_some());

    close_pool(pool).await;
}

#[tokio::test]
async fn test_tables_exist_after_migrations() {
    let Ok(db_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let pool = create_pool(DatabaseConfig {
        url: db_url,
        ..Default::default()
    })
    .await
    .expect("Failed to create pool");

    run_migrations(&pool).await.expect("Migrations failed");

    for table in ["users", "items", "orders", "companies"] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .expect("Query failed");

        assert!(exists, "table {} should exist", table);
    }

    close_pool(pool).await;
}
