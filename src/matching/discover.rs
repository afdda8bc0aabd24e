//! Discovery service: the top-level entry point of the pipeline.
//!
//! Obtains a candidate listing set (cache first, live acquisition second,
//! built-in fallback last), scores everything against the profile, filters by
//! threshold and returns a ranked report. Never returns an error: every
//! internal failure degrades toward the fallback set.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::matching::score::{self, CompatibilityResult};
use crate::models::candidate::CandidateProfile;
use crate::models::job::{ExperienceLevel, JobListing};
use crate::sources::{JobSource, runner};
use crate::store::JobStore;

/// Cached rows below this count are considered too thin to rank against, and
/// a live acquisition is triggered instead.
const MIN_CACHED_JOBS: i64 = 5;
const MAX_CANDIDATE_JOBS: i64 = 100;

/// One ranked entry, shaped for the presentation collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct RankedJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub experience_level: ExperienceLevel,
    pub description: String,
    pub source: String,
    pub url: String,
    pub compatibility_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub justification: String,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryReport {
    pub total_found: usize,
    pub matched_count: usize,
    pub ranked_jobs: Vec<RankedJob>,
}

pub async fn discover(
    store: &JobStore,
    sources: &[Arc<dyn JobSource>],
    profile: &CandidateProfile,
    min_score_threshold: f64,
    timeout: Duration,
) -> DiscoveryReport {
    let listings = candidate_listings(store, sources, &profile.skills, timeout).await;
    let ranked = rank(profile, &listings, min_score_threshold);

    DiscoveryReport {
        total_found: listings.len(),
        matched_count: ranked.len(),
        ranked_jobs: ranked,
    }
}

/// Score, filter and sort a listing set against a profile. Pure; the sort is
/// stable, so equal scores keep the candidate set's relative order.
pub fn rank(
    profile: &CandidateProfile,
    listings: &[JobListing],
    min_score_threshold: f64,
) -> Vec<RankedJob> {
    let mut ranked: Vec<RankedJob> = listings
        .iter()
        .filter_map(|job| {
            let result = score::score(
                &profile.skills,
                profile.experience_years,
                &job.required_skills,
                job.experience_level,
            );
            (result.total_score >= min_score_threshold).then(|| ranked_entry(job, result))
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.compatibility_score
            .partial_cmp(&a.compatibility_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

fn ranked_entry(job: &JobListing, result: CompatibilityResult) -> RankedJob {
    let justification = score::justification(&result);
    RankedJob {
        title: job.title.clone(),
        company: job.company.clone(),
        location: job.location.clone(),
        salary: job.salary.clone(),
        experience_level: job.experience_level,
        description: job.description.clone(),
        source: job.source.clone(),
        url: job.url.clone(),
        compatibility_score: result.total_score,
        matched_skills: result.matched_skills,
        missing_skills: result.missing_skills,
        justification,
    }
}

async fn candidate_listings(
    store: &JobStore,
    sources: &[Arc<dyn JobSource>],
    skills: &[String],
    timeout: Duration,
) -> Vec<JobListing> {
    let cached = store.count().await;
    if cached > MIN_CACHED_JOBS {
        tracing::info!("using {cached} cached listings");
        return store.all(MAX_CANDIDATE_JOBS).await;
    }

    tracing::info!("cache too thin ({cached} rows), triggering live acquisition");
    let keywords = if skills.is_empty() {
        "software developer".to_string()
    } else {
        skills.join(" ")
    };
    let acquired = runner::acquire(
        store,
        sources,
        &keywords,
        "Remote",
        runner::DEFAULT_MAX_JOBS,
        timeout,
    )
    .await;

    if acquired.is_empty() {
        tracing::warn!("acquisition yielded nothing, using built-in fallback listings");
        fallback_listings()
    } else {
        acquired
    }
}

/// Small static listing set returned when both the cache and every source
/// come up empty, so the caller always gets a usable (if degraded) result.
pub fn fallback_listings() -> Vec<JobListing> {
    let listing = |id: &str,
                   title: &str,
                   company: &str,
                   location: &str,
                   description: &str,
                   skills: &[&str],
                   level: ExperienceLevel,
                   salary: &str| JobListing {
        id: id.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        description: description.to_string(),
        required_skills: skills.iter().map(|s| s.to_string()).collect(),
        experience_level: level,
        salary: salary.to_string(),
        source: "Mock Data".to_string(),
        url: "Not specified".to_string(),
        scraped_at: None,
    };

    vec![
        listing(
            "job_1",
            "Senior Python Developer",
            "TechCorp",
            "Remote",
            "We are looking for a Python expert with 5+ years experience in Django and FastAPI. Must know SQL, Docker, and AWS.",
            &["Python", "Django", "FastAPI", "SQL", "Docker", "AWS"],
            ExperienceLevel::Senior,
            "$120,000 - $150,000",
        ),
        listing(
            "job_2",
            "Full Stack JavaScript Developer",
            "WebSolutions",
            "New York, NY",
            "React and Node.js expert needed. Experience with TypeScript, MongoDB, and REST APIs required.",
            &["JavaScript", "React", "Node.js", "TypeScript", "MongoDB", "REST APIs"],
            ExperienceLevel::MidLevel,
            "$90,000 - $120,000",
        ),
        listing(
            "job_3",
            "Data Scientist",
            "DataDriven Inc",
            "San Francisco, CA",
            "Seeking a data scientist with expertise in Python, pandas, numpy, scikit-learn, and deep learning frameworks.",
            &["Python", "pandas", "numpy", "scikit-learn", "Deep Learning", "SQL"],
            ExperienceLevel::MidLevel,
            "$110,000 - $140,000",
        ),
        listing(
            "job_4",
            "DevOps Engineer",
            "CloudOps",
            "Remote",
            "Docker, Kubernetes, CI/CD pipelines, AWS/GCP experience. Must have 3+ years in DevOps.",
            &["Docker", "Kubernetes", "AWS", "CI/CD", "Linux"],
            ExperienceLevel::MidLevel,
            "$100,000 - $130,000",
        ),
        listing(
            "job_5",
            "Junior Web Developer",
            "StartupXYZ",
            "Remote",
            "Looking for enthusiastic junior developers. HTML, CSS, JavaScript, and Git knowledge required.",
            &["JavaScript", "HTML", "CSS", "Git"],
            ExperienceLevel::Junior,
            "$50,000 - $70,000",
        ),
    ]
}
