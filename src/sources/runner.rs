//! Acquisition orchestrator: runs every source adapter, merges and
//! deduplicates their output, and persists the batch.
//!
//! Adapters run concurrently (one task per source) under an overall deadline.
//! A failing adapter contributes zero listings; a deadline hit returns
//! whatever was already collected; a cache-write failure still hands the
//! in-memory batch back to the caller. Nothing here propagates an error.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::models::job::JobListing;
use crate::sources::JobSource;
use crate::store::JobStore;

pub const DEFAULT_MAX_JOBS: usize = 50;

pub async fn acquire(
    store: &JobStore,
    sources: &[Arc<dyn JobSource>],
    keywords: &str,
    location: &str,
    max_jobs: usize,
    timeout: Duration,
) -> Vec<JobListing> {
    let deadline = Instant::now() + timeout;
    let mut tasks = JoinSet::new();

    for source in sources {
        let source = Arc::clone(source);
        let keywords = keywords.to_string();
        let location = location.to_string();
        tasks.spawn(async move {
            let name = source.name();
            let pages = source.default_pages();
            match source.fetch(&keywords, &location, pages).await {
                Ok(jobs) => {
                    tracing::info!("{name}: {} listings", jobs.len());
                    jobs
                }
                Err(e) => {
                    tracing::warn!("{name} unavailable, contributing zero listings: {e}");
                    Vec::new()
                }
            }
        });
    }

    let mut collected = Vec::new();
    loop {
        match tokio::time::timeout_at(deadline, tasks.join_next()).await {
            Ok(Some(Ok(jobs))) => collected.extend(jobs),
            Ok(Some(Err(e))) => tracing::warn!("source task panicked: {e}"),
            Ok(None) => break,
            Err(_) => {
                tracing::warn!(
                    "acquisition deadline hit, returning {} listings collected so far",
                    collected.len()
                );
                tasks.abort_all();
                break;
            }
        }
    }

    let mut merged = dedup_by_id(collected);
    merged.truncate(max_jobs);

    let inserted = store.insert_batch(&merged).await;
    tracing::info!(
        "acquired {} listings ({inserted} newly cached)",
        merged.len()
    );

    merged
}

/// Ids are stable and listing content is immutable across a run, so
/// first-seen wins.
fn dedup_by_id(jobs: Vec<JobListing>) -> Vec<JobListing> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert(job.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::db;
    use crate::error::AppError;
    use crate::models::job::ExperienceLevel;

    const TEST_TIMEOUT: Duration = Duration::from_secs(30);

    fn listing(id: &str) -> JobListing {
        JobListing {
            id: id.to_string(),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: "Not specified".to_string(),
            required_skills: vec![],
            experience_level: ExperienceLevel::NotSpecified,
            salary: "Not specified".to_string(),
            source: "Test".to_string(),
            url: "Not specified".to_string(),
            scraped_at: None,
        }
    }

    struct Yields(Vec<JobListing>);

    #[async_trait]
    impl JobSource for Yields {
        fn name(&self) -> &'static str {
            "yields"
        }
        async fn fetch(&self, _: &str, _: &str, _: u32) -> Result<Vec<JobListing>, AppError> {
            Ok(self.0.clone())
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl JobSource for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }
        async fn fetch(&self, _: &str, _: &str, _: u32) -> Result<Vec<JobListing>, AppError> {
            Err(AppError::SourceUnavailable("connection refused".to_string()))
        }
    }

    /// Yields one listing per page it is asked for.
    struct PagedSource(u32);

    #[async_trait]
    impl JobSource for PagedSource {
        fn name(&self) -> &'static str {
            "paged"
        }
        fn default_pages(&self) -> u32 {
            self.0
        }
        async fn fetch(&self, _: &str, _: &str, pages: u32) -> Result<Vec<JobListing>, AppError> {
            Ok((0..pages).map(|i| listing(&format!("p{i}"))).collect())
        }
    }

    struct Hangs;

    #[async_trait]
    impl JobSource for Hangs {
        fn name(&self) -> &'static str {
            "hangs"
        }
        async fn fetch(&self, _: &str, _: &str, _: u32) -> Result<Vec<JobListing>, AppError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![listing("late")])
        }
    }

    async fn temp_store() -> (JobStore, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}/jobs.db", dir.path().display());
        let pool = db::create_pool(&url).await.unwrap();
        db::init_schema(&pool).await.unwrap();
        (JobStore::new(pool), dir)
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let jobs = vec![listing("a"), listing("b"), listing("a")];
        let deduped = dedup_by_id(jobs);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].id, "a");
        assert_eq!(deduped[1].id, "b");
    }

    #[tokio::test]
    async fn failing_source_does_not_block_others() {
        let (store, _dir) = temp_store().await;
        let sources: Vec<Arc<dyn JobSource>> = vec![
            Arc::new(AlwaysFails),
            Arc::new(Yields(vec![listing("a"), listing("b")])),
        ];

        let jobs = acquire(&store, &sources, "rust", "Remote", 50, TEST_TIMEOUT).await;
        assert_eq!(jobs.len(), 2);
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn merges_and_dedups_across_sources() {
        let (store, _dir) = temp_store().await;
        let sources: Vec<Arc<dyn JobSource>> = vec![
            Arc::new(Yields(vec![listing("a"), listing("shared")])),
            Arc::new(Yields(vec![listing("shared"), listing("b")])),
        ];

        let jobs = acquire(&store, &sources, "rust", "Remote", 50, TEST_TIMEOUT).await;
        assert_eq!(jobs.len(), 3);
        assert_eq!(store.count().await, 3);
    }

    #[tokio::test]
    async fn honors_each_sources_page_count() {
        let (store, _dir) = temp_store().await;
        let sources: Vec<Arc<dyn JobSource>> = vec![Arc::new(PagedSource(3))];

        let jobs = acquire(&store, &sources, "rust", "Remote", 50, TEST_TIMEOUT).await;
        assert_eq!(jobs.len(), 3);
    }

    #[tokio::test]
    async fn truncates_to_max_jobs() {
        let (store, _dir) = temp_store().await;
        let many: Vec<JobListing> = (0..10).map(|i| listing(&format!("j{i}"))).collect();
        let sources: Vec<Arc<dyn JobSource>> = vec![Arc::new(Yields(many))];

        let jobs = acquire(&store, &sources, "rust", "Remote", 4, TEST_TIMEOUT).await;
        assert_eq!(jobs.len(), 4);
        assert_eq!(store.count().await, 4);
    }

    #[tokio::test]
    async fn deadline_returns_partial_results() {
        let (store, _dir) = temp_store().await;
        let sources: Vec<Arc<dyn JobSource>> = vec![
            Arc::new(Yields(vec![listing("fast")])),
            Arc::new(Hangs),
        ];

        let jobs = acquire(
            &store,
            &sources,
            "rust",
            "Remote",
            50,
            Duration::from_millis(200),
        )
        .await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "fast");
    }
}
