//! Source adapters: one per external job board, unified behind `JobSource`.

pub mod github;
pub mod html;
pub mod identity;
pub mod indeed;
pub mod linkedin;
pub mod renderer;
pub mod runner;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::extract;
use crate::models::job::{JobListing, NOT_SPECIFIED};
use crate::sources::identity::ClientIdentity;
use crate::sources::renderer::PageRenderer;

/// One external provider of listings. `fetch` re-fetches on every call:
/// page requests are sequential within an adapter and honor the inter-page
/// politeness delay, so adapters are parallelized across sources only.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Provider tag stored on every listing (e.g. "Indeed").
    fn name(&self) -> &'static str;

    /// Pages fetched per acquisition run. Most sources give enough per page
    /// that one is plenty; adapters with thinner pages override this.
    fn default_pages(&self) -> u32 {
        1
    }

    async fn fetch(
        &self,
        keywords: &str,
        location: &str,
        pages: u32,
    ) -> Result<Vec<JobListing>, AppError>;
}

/// One parsed listing card before annotation. Adapters reject cards missing
/// title or company at parse time, so both are required here.
#[derive(Debug)]
pub struct RawListing {
    /// Natural id from the source, if it provides one.
    pub source_id: Option<String>,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub salary: Option<String>,
    pub url: Option<String>,
}

/// Tag a raw listing with its source and run it through the skill/level
/// extractor. The id is the source's natural one when present, otherwise
/// derived deterministically from (source, title, company).
pub fn annotate(raw: RawListing, source: &str) -> JobListing {
    let id = raw
        .source_id
        .unwrap_or_else(|| derive_id(source, &raw.title, &raw.company));
    let description = raw.description.unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let required_skills = extract::extract_skills(&description);
    let experience_level = extract::infer_level(&raw.title);

    JobListing {
        id,
        experience_level,
        required_skills,
        title: raw.title,
        company: raw.company,
        location: raw.location.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        description,
        salary: raw.salary.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        source: source.to_string(),
        url: raw.url.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        scraped_at: None,
    }
}

/// Stable listing id for sources without a natural one. Repeated acquisition
/// of the same posting must map to the same id, so this is a real digest, not
/// a process-local hash.
pub fn derive_id(source: &str, title: &str, company: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    hasher.update(company.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}_{}", source.to_lowercase().replace(' ', "_"), &digest[..12])
}

/// Politeness delay between pages of the same source. A contract toward the
/// target site, not a tunable.
pub async fn inter_page_delay(min_secs: f64, max_secs: f64) {
    let secs = rand::rng().random_range(min_secs..max_secs);
    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
}

/// Fetch a page of content: rendered through the scripted browser when one is
/// available, raw HTTP otherwise. A render failure degrades to the raw path
/// rather than failing the page.
pub async fn fetch_page(
    client: &reqwest::Client,
    identity: &Arc<dyn ClientIdentity>,
    renderer: &Option<Arc<dyn PageRenderer>>,
    url: &str,
) -> Result<String, AppError> {
    if let Some(renderer) = renderer {
        match renderer.render(url).await {
            Ok(body) => return Ok(body),
            Err(e) => {
                tracing::warn!("render failed for {url}: {e}; falling back to raw fetch");
            }
        }
    }

    let resp = client
        .get(url)
        .header("User-Agent", identity.next())
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Referer", "https://www.google.com/")
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(AppError::SourceUnavailable(format!(
            "{url} returned {}",
            resp.status()
        )));
    }
    Ok(resp.text().await?)
}

pub fn http_client() -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?)
}
