mod config;
mod db;
mod error;
mod extract;
mod matching;
mod models;
mod sources;
mod store;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::config::{Command, Config};
use crate::matching::discover;
use crate::models::candidate::CandidateProfile;
use crate::sources::JobSource;
use crate::sources::github::GithubJobs;
use crate::sources::identity::{ClientIdentity, RotatingIdentity};
use crate::sources::indeed::Indeed;
use crate::sources::linkedin::LinkedIn;
use crate::sources::renderer::{PageRenderer, WebDriverRenderer};
use crate::sources::runner;
use crate::store::JobStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobscout=info")),
        )
        .init();

    let config = Config::parse();

    let pool = db::create_pool(&config.database_url).await?;
    db::init_schema(&pool).await?;
    let store = JobStore::new(pool);

    let renderer = match &config.webdriver_url {
        Some(endpoint) => match WebDriverRenderer::connect(endpoint).await {
            Ok(renderer) => {
                tracing::info!("scripted-browser rendering enabled via {endpoint}");
                Some(renderer)
            }
            Err(e) => {
                tracing::warn!("webdriver unavailable ({e}), using raw fetches");
                None
            }
        },
        None => None,
    };
    let sources = build_sources(renderer)?;

    match config.command {
        Command::Scrape {
            keywords,
            location,
            max_jobs,
            timeout_secs,
        } => {
            let jobs = runner::acquire(
                &store,
                &sources,
                &keywords,
                &location,
                max_jobs,
                Duration::from_secs(timeout_secs),
            )
            .await;
            println!("{}", serde_json::to_string_pretty(&jobs)?);
        }
        Command::Discover {
            skills,
            years,
            min_score,
            timeout_secs,
        } => {
            let profile = CandidateProfile {
                skills,
                experience_years: years,
            };
            let report = discover::discover(
                &store,
                &sources,
                &profile,
                min_score,
                Duration::from_secs(timeout_secs),
            )
            .await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Stats => {
            let total = store.count().await;
            let mut per_source = serde_json::Map::new();
            for name in sources.iter().map(|s| s.name()).chain(["Mock Data"]) {
                let n = store.by_source(name, i64::MAX).await.len();
                per_source.insert(name.to_string(), json!(n));
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "total": total,
                    "per_source": per_source,
                }))?
            );
        }
        Command::Clear { source } => {
            store.clear(source.as_deref()).await;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "remaining": store.count().await }))?
            );
        }
    }

    Ok(())
}

fn build_sources(
    renderer: Option<Arc<dyn PageRenderer>>,
) -> anyhow::Result<Vec<Arc<dyn JobSource>>> {
    let identity: Arc<dyn ClientIdentity> = Arc::new(RotatingIdentity);
    Ok(vec![
        Arc::new(Indeed::new(identity.clone(), renderer.clone())?),
        Arc::new(LinkedIn::new(identity.clone(), renderer)?),
        Arc::new(GithubJobs::new(identity)?),
    ])
}
