use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::AppError;
use crate::models::job::JobListing;
use crate::sources::identity::ClientIdentity;
use crate::sources::renderer::PageRenderer;
use crate::sources::{JobSource, RawListing, annotate, fetch_page, html, http_client, inter_page_delay};

const BASE_URL: &str = "https://www.indeed.com/jobs";
const SOURCE: &str = "Indeed";
const RESULTS_PER_PAGE: u32 = 10;

pub struct Indeed {
    client: reqwest::Client,
    identity: Arc<dyn ClientIdentity>,
    renderer: Option<Arc<dyn PageRenderer>>,
}

impl Indeed {
    pub fn new(
        identity: Arc<dyn ClientIdentity>,
        renderer: Option<Arc<dyn PageRenderer>>,
    ) -> Result<Self, AppError> {
        Ok(Indeed {
            client: http_client()?,
            identity,
            renderer,
        })
    }
}

#[async_trait]
impl JobSource for Indeed {
    fn name(&self) -> &'static str {
        SOURCE
    }

    /// Indeed paginates ten results at a time, so a run walks two pages.
    fn default_pages(&self) -> u32 {
        2
    }

    async fn fetch(
        &self,
        keywords: &str,
        location: &str,
        pages: u32,
    ) -> Result<Vec<JobListing>, AppError> {
        let location = if location.is_empty() { "Remote" } else { location };
        let mut jobs = Vec::new();

        for page in 0..pages {
            let url = format!(
                "{BASE_URL}?q={}&l={}&start={}",
                utf8_percent_encode(keywords, NON_ALPHANUMERIC),
                utf8_percent_encode(location, NON_ALPHANUMERIC),
                page * RESULTS_PER_PAGE
            );

            let body = match fetch_page(&self.client, &self.identity, &self.renderer, &url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("indeed page {}: {e}", page + 1);
                    continue;
                }
            };

            let cards = parse_cards(&body, location);
            tracing::info!("indeed page {}: {} cards", page + 1, cards.len());
            if cards.is_empty() {
                break;
            }
            jobs.extend(cards.into_iter().map(|raw| annotate(raw, SOURCE)));

            if page + 1 < pages {
                inter_page_delay(2.0, 4.0).await;
            }
        }

        Ok(jobs)
    }
}

/// Parse `job_seen_beacon` cards out of a result page. A card missing title
/// or company is dropped; one bad card never aborts the page.
fn parse_cards(body: &str, default_location: &str) -> Vec<RawListing> {
    html::card_segments(body, "job_seen_beacon")
        .into_iter()
        .filter_map(|card| parse_card(card, default_location))
        .collect()
}

fn parse_card(card: &str, default_location: &str) -> Option<RawListing> {
    let title = html::tag_text(card, r#"class="jobTitle"#, "</h2>")?;
    let company = html::tag_text(card, r#"class="companyName"#, "</span>")?;

    let location = html::tag_text(card, r#"class="companyLocation"#, "</div>")
        .or_else(|| Some(default_location.to_string()).filter(|l| !l.is_empty()));
    let description = html::tag_text(card, r#"class="job-snippet"#, "</div>");
    let salary = html::tag_text(card, r#"class="salary-snippet"#, "</div>");
    let url = html::href_after(card, "<a").map(|href| {
        if href.starts_with("http") {
            href
        } else {
            format!("https://www.indeed.com{href}")
        }
    });

    Some(RawListing {
        source_id: None,
        title,
        company,
        location,
        description,
        salary,
        url,
    })
}
