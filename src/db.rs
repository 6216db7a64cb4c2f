use anyhow::{Context, Result};
use sqlx::MySqlPool;
use tracing::info;

pub async fn init_db(database_url: &str) -> Result<MySqlPool> {
    MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Applies the embedded schema migrations in `migrations/`.
pub async fn run_migrations(pool: &MySqlPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");
    Ok(())
}
