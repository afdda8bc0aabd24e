//! Optional scripted-browser rendering via a W3C WebDriver endpoint.
//!
//! Some boards only reveal listing cards after script execution. When a
//! WebDriver server (chromedriver, geckodriver, selenium grid) is reachable,
//! adapters render pages through it; otherwise they use the raw-fetch path.
//! The capability is probed once at startup and passed in explicitly -- no
//! per-call detection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::AppError;

#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Fetch `url` through the browser and return the rendered page source.
    async fn render(&self, url: &str) -> Result<String, AppError>;
}

/// Time given to the page's scripts before the source is read.
const RENDER_SETTLE: Duration = Duration::from_secs(2);

pub struct WebDriverRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl WebDriverRenderer {
    /// Probe `endpoint` and return a renderer only if the server reports
    /// itself ready. Callers treat `Err` as "capability absent".
    pub async fn connect(endpoint: &str) -> Result<Arc<dyn PageRenderer>, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let status: Value = client
            .get(format!("{endpoint}/status"))
            .send()
            .await?
            .json()
            .await?;
        let ready = status
            .pointer("/value/ready")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !ready {
            return Err(AppError::SourceUnavailable(format!(
                "webdriver at {endpoint} is not ready"
            )));
        }

        Ok(Arc::new(WebDriverRenderer {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }))
    }

    async fn new_session(&self) -> Result<String, AppError> {
        let caps = json!({
            "capabilities": {
                "alwaysMatch": {
                    "goog:chromeOptions": {
                        "args": ["--headless=new", "--disable-gpu", "--no-sandbox", "--window-size=1920,1080"]
                    }
                }
            }
        });
        let resp: Value = self
            .client
            .post(format!("{}/session", self.endpoint))
            .json(&caps)
            .send()
            .await?
            .json()
            .await?;
        resp.pointer("/value/sessionId")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| AppError::MalformedResponse("webdriver session response".to_string()))
    }

    async fn drop_session(&self, session_id: &str) {
        let _ = self
            .client
            .delete(format!("{}/session/{session_id}", self.endpoint))
            .send()
            .await;
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn render(&self, url: &str) -> Result<String, AppError> {
        let session_id = self.new_session().await?;

        let result: Result<String, AppError> = async {
            self.client
                .post(format!("{}/session/{session_id}/url", self.endpoint))
                .json(&json!({ "url": url }))
                .send()
                .await?
                .error_for_status()?;

            tokio::time::sleep(RENDER_SETTLE).await;

            let resp: Value = self
                .client
                .get(format!("{}/session/{session_id}/source", self.endpoint))
                .send()
                .await?
                .json()
                .await?;
            resp.get("value")
                .and_then(Value::as_str)
                .map(String::from)
                .ok_or_else(|| AppError::MalformedResponse("webdriver page source".to_string()))
        }
        .await;

        self.drop_session(&session_id).await;
        result
    }
}
