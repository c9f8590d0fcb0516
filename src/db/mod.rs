pub mod models;

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::{DatabaseConfig, DatabaseTarget};

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let options = match &config.target {
        DatabaseTarget::Url(url) => url
            .parse::<PgConnectOptions>()
            .context("DATABASE_URL is not a valid Postgres connection string")?,
        DatabaseTarget::Parts {
            host,
            user,
            password,
            database,
            port,
        } => PgConnectOptions::new()
            .host(host)
            .username(user)
            .password(password)
            .database(database)
            .port(*port),
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .context("failed to connect to Postgres")?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
