//! Database migration utilities

use sqlx::{Sqlite, migrate::MigrateDatabase};

use crate::config::Config;

/// Create the database if needed and apply pending migrations
pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    if !Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        Sqlite::create_database(&config.database.url).await?;
    }

    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    car_doctor_db::migrate(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

/// Drop the database if it exists and run migrations
pub async fn reset(config: &Config) -> anyhow::Result<()> {
    if Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}
