use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::AppError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS jobs (
    id               TEXT PRIMARY KEY,
    title            TEXT NOT NULL,
    company          TEXT NOT NULL,
    location         TEXT NOT NULL DEFAULT 'Not specified',
    description      TEXT NOT NULL DEFAULT 'Not specified',
    required_skills  TEXT NOT NULL DEFAULT '[]',
    experience_level TEXT NOT NULL DEFAULT 'Not specified',
    salary           TEXT NOT NULL DEFAULT 'Not specified',
    source           TEXT NOT NULL,
    url              TEXT NOT NULL DEFAULT 'Not specified',
    scraped_at       TEXT NOT NULL
)";

/// Open (and create if missing) the sqlite cache at `database_url`.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(AppError::Storage)?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Create the jobs table if it does not exist yet. Run once at startup by
/// the process entry point; no implicit init-on-first-use.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(SCHEMA).execute(pool).await?;
    Ok(())
}
