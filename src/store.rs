//! Deduplicating listing cache.
//!
//! Every public method degrades on storage failure: the error is logged here
//! and the caller sees an empty result / zero count / false, never an error.
//! "No rows" and "storage unavailable" are indistinguishable by design -- the
//! pipeline must keep moving either way.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::job::JobListing;

#[derive(Clone)]
pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    pub fn new(pool: SqlitePool) -> Self {
        JobStore { pool }
    }

    /// Insert a listing. Returns true if a new row was written, false if the
    /// id already existed (or the write failed). Existing rows are never
    /// updated: listings are immutable once cached.
    pub async fn insert(&self, listing: &JobListing) -> bool {
        match self.try_insert(listing).await {
            Ok(inserted) => inserted,
            Err(e) => {
                tracing::error!("failed to insert listing '{}': {e}", listing.id);
                false
            }
        }
    }

    /// Insert many listings; one bad row does not block the rest.
    /// Returns the count of newly inserted rows.
    pub async fn insert_batch(&self, listings: &[JobListing]) -> usize {
        let mut inserted = 0;
        for listing in listings {
            if self.insert(listing).await {
                inserted += 1;
            }
        }
        inserted
    }

    pub async fn all(&self, limit: i64) -> Vec<JobListing> {
        self.degrade(
            sqlx::query_as::<_, JobListing>("SELECT * FROM jobs LIMIT ?")
                .bind(limit)
                .fetch_all(&self.pool)
                .await,
            "fetch listings",
        )
    }

    /// Listings whose stored skill set intersects `skills` (case-insensitive).
    /// Sqlite has no native set-intersection query, so this over-fetches and
    /// filters in process.
    #[allow(dead_code)]
    pub async fn by_skills(&self, skills: &[String], limit: i64) -> Vec<JobListing> {
        let rows = self.degrade(
            sqlx::query_as::<_, JobListing>("SELECT * FROM jobs LIMIT ?")
                .bind(limit * 3)
                .fetch_all(&self.pool)
                .await,
            "fetch listings for skill search",
        );

        let wanted: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();
        rows.into_iter()
            .filter(|job| {
                job.required_skills
                    .iter()
                    .any(|s| wanted.contains(&s.to_lowercase()))
            })
            .take(limit as usize)
            .collect()
    }

    pub async fn by_source(&self, source: &str, limit: i64) -> Vec<JobListing> {
        self.degrade(
            sqlx::query_as::<_, JobListing>("SELECT * FROM jobs WHERE source = ? LIMIT ?")
                .bind(source)
                .bind(limit)
                .fetch_all(&self.pool)
                .await,
            "fetch listings by source",
        )
    }

    pub async fn count(&self) -> i64 {
        let result: Result<(i64,), _> = sqlx::query_as("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await;
        match result {
            Ok((n,)) => n,
            Err(e) => {
                tracing::error!("failed to count listings: {e}");
                0
            }
        }
    }

    /// Delete all rows, or only those from one source.
    pub async fn clear(&self, source: Option<&str>) {
        let result = match source {
            Some(src) => {
                sqlx::query("DELETE FROM jobs WHERE source = ?")
                    .bind(src)
                    .execute(&self.pool)
                    .await
            }
            None => sqlx::query("DELETE FROM jobs").execute(&self.pool).await,
        };
        if let Err(e) = result {
            tracing::error!("failed to clear listings: {e}");
        }
    }

    async fn try_insert(&self, listing: &JobListing) -> Result<bool, AppError> {
        let skills_json = serde_json::to_string(&listing.required_skills)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let result = sqlx::query(
            "INSERT OR IGNORE INTO jobs (id, title, company, location, description, required_skills, experience_level, salary, source, url, scraped_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&listing.id)
        .bind(&listing.title)
        .bind(&listing.company)
        .bind(&listing.location)
        .bind(&listing.description)
        .bind(&skills_json)
        .bind(listing.experience_level.as_str())
        .bind(&listing.salary)
        .bind(&listing.source)
        .bind(&listing.url)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    fn degrade(&self, result: Result<Vec<JobListing>, sqlx::Error>, what: &str) -> Vec<JobListing> {
        match result {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("failed to {what}: {e}");
                Vec::new()
            }
        }
    }
}
