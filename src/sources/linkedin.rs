use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::AppError;
use crate::models::job::JobListing;
use crate::sources::identity::ClientIdentity;
use crate::sources::renderer::PageRenderer;
use crate::sources::{JobSource, RawListing, annotate, fetch_page, html, http_client, inter_page_delay};

const BASE_URL: &str = "https://www.linkedin.com/jobs/search/";
const SOURCE: &str = "LinkedIn";
const RESULTS_PER_PAGE: u32 = 25;

/// LinkedIn guest search. Heavily script-driven, so this adapter benefits the
/// most from the scripted-browser path when one is available.
pub struct LinkedIn {
    client: reqwest::Client,
    identity: Arc<dyn ClientIdentity>,
    renderer: Option<Arc<dyn PageRenderer>>,
}

impl LinkedIn {
    pub fn new(
        identity: Arc<dyn ClientIdentity>,
        renderer: Option<Arc<dyn PageRenderer>>,
    ) -> Result<Self, AppError> {
        Ok(LinkedIn {
            client: http_client()?,
            identity,
            renderer,
        })
    }
}

#[async_trait]
impl JobSource for LinkedIn {
    fn name(&self) -> &'static str {
        SOURCE
    }

    async fn fetch(
        &self,
        keywords: &str,
        _location: &str,
        pages: u32,
    ) -> Result<Vec<JobListing>, AppError> {
        let mut jobs = Vec::new();

        for page in 0..pages {
            let url = format!(
                "{BASE_URL}?keywords={}&start={}",
                utf8_percent_encode(keywords, NON_ALPHANUMERIC),
                page * RESULTS_PER_PAGE
            );

            let body = match fetch_page(&self.client, &self.identity, &self.renderer, &url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("linkedin page {}: {e}", page + 1);
                    continue;
                }
            };

            let cards = parse_cards(&body);
            tracing::info!("linkedin page {}: {} cards", page + 1, cards.len());
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

fn parse_cards(body: &str) -> Vec<RawListing> {
    // Anchored to the opening tag: a bare "base-card" marker would also split
    // on the card's own "base-card__full-link" anchor class.
    html::card_segments(body, r#"<div class="base-card"#)
        .into_iter()
        .filter_map(parse_card)
        .collect()
}

/// Guest cards carry no snippet, so the title doubles as the description
/// (which is what the skill extractor gets to work with).
fn parse_card(card: &str) -> Option<RawListing> {
    let title = html::tag_text(card, "<h3", "</h3>")?;
    let company = html::tag_text(card, "<h4", "</h4>")?;
    let location = html::tag_text(card, r#"class="job-search-card__location"#, "</span>");
    let url = html::href_after(card, "base-card__full-link");

    Some(RawListing {
        source_id: None,
        description: Some(title.clone()),
        title,
        company,
        location,
        salary: None,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div class="base-card">
          <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/99">x</a>
          <h3 class="base-search-card__title">Python Engineer</h3>
          <h4 class="base-search-card__subtitle">Initech</h4>
          <span class="job-search-card__location">Remote</span>
        </div>
        <div class="base-card">
          <h3>Card without a company</h3>
        </div>
    "#;

    #[test]
    fn parses_guest_card() {
        let cards = parse_cards(PAGE);
        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.title, "Python Engineer");
        assert_eq!(card.company, "Initech");
        assert_eq!(card.location.as_deref(), Some("Remote"));
        assert_eq!(
            card.url.as_deref(),
            Some("https://www.linkedin.com/jobs/view/99")
        );
    }

    #[test]
    fn description_falls_back_to_title() {
        let cards = parse_cards(PAGE);
        assert_eq!(cards[0].description.as_deref(), Some("Python Engineer"));
    }
}
