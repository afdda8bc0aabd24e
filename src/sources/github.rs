use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;
use crate::models::job::JobListing;
use crate::sources::identity::ClientIdentity;
use crate::sources::{JobSource, RawListing, annotate, http_client, inter_page_delay};

const API_URL: &str = "https://jobs.github.com/api/positions.json";
const SOURCE: &str = "GitHub Jobs";

/// JSON positions API. The only source with natural listing ids; no browser
/// rendering needed.
pub struct GithubJobs {
    client: reqwest::Client,
    identity: Arc<dyn ClientIdentity>,
    api_url: String,
}

impl GithubJobs {
    pub fn new(identity: Arc<dyn ClientIdentity>) -> Result<Self, AppError> {
        Ok(GithubJobs {
            client: http_client()?,
            identity,
            api_url: API_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_api_url(identity: Arc<dyn ClientIdentity>, api_url: String) -> Result<Self, AppError> {
        Ok(GithubJobs {
            client: http_client()?,
            identity,
            api_url,
        })
    }
}

#[async_trait]
impl JobSource for GithubJobs {
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
            let page_param = page.to_string();
            let response = self
                .client
                .get(&self.api_url)
                .query(&[("description", keywords), ("page", page_param.as_str())])
                .header("User-Agent", self.identity.next())
                .send()
                .await
                .and_then(reqwest::Response::error_for_status);

            // One bad page keeps what earlier pages yielded.
            let data: Value = match response {
                Ok(resp) => match resp.json().await {
                    Ok(data) => data,
                    Err(e) => {
                        tracing::warn!("github jobs page {}: {e}", page + 1);
                        continue;
                    }
                },
                Err(e) => {
                    tracing::warn!("github jobs page {}: {e}", page + 1);
                    continue;
                }
            };

            let positions = parse_positions(&data);
            tracing::info!("github jobs page {}: {} positions", page + 1, positions.len());
            if positions.is_empty() {
                break;
            }
            jobs.extend(positions.into_iter().map(|raw| annotate(raw, SOURCE)));

            if page + 1 < pages {
                inter_page_delay(1.0, 2.0).await;
            }
        }

        Ok(jobs)
    }
}

fn parse_positions(data: &Value) -> Vec<RawListing> {
    data.as_array()
        .map(|positions| positions.iter().filter_map(parse_position).collect())
        .unwrap_or_default()
}

fn parse_position(position: &Value) -> Option<RawListing> {
    let text = |key: &str| {
        position
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    Some(RawListing {
        source_id: text("id").map(|id| format!("github_{id}")),
        title: text("title")?,
        company: text("company")?,
        location: text("location").or_else(|| Some("Remote".to_string())),
        description: text("description"),
        salary: None,
        url: text("url"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::sources::identity::FixedIdentity;

    #[test]
    fn parses_positions_array() {
        let data = json!([
            {
                "id": "abc-123",
                "title": "Rust Engineer",
                "company": "Ferrous",
                "location": "Berlin",
                "description": "Systems work in Rust and Linux",
                "url": "https://jobs.github.com/positions/abc-123"
            },
            {
                "id": "no-title",
                "company": "Nameless"
            }
        ]);

        let positions = parse_positions(&data);
        assert_eq!(positions.len(), 1);
        let pos = &positions[0];
        assert_eq!(pos.source_id.as_deref(), Some("github_abc-123"));
        assert_eq!(pos.title, "Rust Engineer");
        assert_eq!(pos.company, "Ferrous");
        assert_eq!(pos.location.as_deref(), Some("Berlin"));
    }

    #[test]
    fn missing_location_defaults_to_remote() {
        let data = json!([{ "id": "1", "title": "Dev", "company": "Acme" }]);
        let positions = parse_positions(&data);
        assert_eq!(positions[0].location.as_deref(), Some("Remote"));
    }

    #[test]
    fn non_array_payload_is_empty() {
        assert!(parse_positions(&json!({"error": "rate limited"})).is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_logs_and_returns_empty() {
        let source = GithubJobs::with_api_url(
            Arc::new(FixedIdentity("test-agent")),
            "http://127.0.0.1:1/positions.json".to_string(),
        )
        .unwrap();

        // Every page request fails; the run must still complete cleanly.
        let jobs = source.fetch("rust", "", 2).await.unwrap();
        assert!(jobs.is_empty());
    }
}
