//! Schema for the `services` and `checkout` document collections.

use sqlx_migrator::Migrator;

mod m0001;
pub mod table;

pub use sqlx_migrator::migrator::{Migrate, Plan};

pub fn migrator() -> Result<Migrator<sqlx::Sqlite>, sqlx_migrator::Error> {
    let mut migrator = Migrator::<sqlx::Sqlite>::default();
    migrator.add_migrations(vec![Box::new(m0001::Migration)])?;

    Ok(migrator)
}

/// Applies every pending migration on the given pool.
pub async fn migrate(pool: &sqlx::SqlitePool) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;
    migrator()?.run(&mut conn, &Plan::apply_all()).await?;

    Ok(())
}
