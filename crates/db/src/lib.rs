//! Storage layer for the Placemark catalog.
//!
//! Exposes the entity models, the [`CatalogStore`](store::CatalogStore)
//! trait, and its two adapters: [`MemoryStore`](store::MemoryStore) and the
//! PostgreSQL-backed [`SqlStore`](store::SqlStore). Which adapter serves a
//! running process is a configuration decision made by the API binary.

pub mod models;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
