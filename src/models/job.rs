use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Sentinel for optional listing fields a source did not provide.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Seniority band attached to a listing, inferred from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Junior,
    #[serde(rename = "Mid-level")]
    MidLevel,
    Senior,
    Lead,
    #[serde(rename = "Not specified")]
    NotSpecified,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::MidLevel => "Mid-level",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Lead => "Lead",
            ExperienceLevel::NotSpecified => NOT_SPECIFIED,
        }
    }

    /// Parse a stored label. Unknown labels fold into `NotSpecified` so a
    /// schema drift in old rows never aborts a read.
    pub fn parse(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "junior" => ExperienceLevel::Junior,
            "mid-level" => ExperienceLevel::MidLevel,
            "senior" => ExperienceLevel::Senior,
            "lead" => ExperienceLevel::Lead,
            _ => ExperienceLevel::NotSpecified,
        }
    }

    /// Expected years-of-experience band (min, max) for this level.
    pub fn expected_years(&self) -> (f64, f64) {
        match self {
            ExperienceLevel::Junior => (0.0, 2.0),
            ExperienceLevel::MidLevel => (2.0, 5.0),
            ExperienceLevel::Senior => (5.0, 20.0),
            ExperienceLevel::Lead => (7.0, 20.0),
            ExperienceLevel::NotSpecified => (0.0, 20.0),
        }
    }
}

/// One job posting. Immutable once cached: re-scraping the same posting is a
/// no-op on the stored row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub salary: String,
    pub source: String,
    pub url: String,
    /// Set by the store at insertion; `None` for freshly scraped listings
    /// that have not been persisted yet.
    pub scraped_at: Option<DateTime<Utc>>,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for JobListing {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let skills_json: String = row.try_get("required_skills")?;
        let level: String = row.try_get("experience_level")?;
        Ok(JobListing {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            company: row.try_get("company")?,
            location: row.try_get("location")?,
            description: row.try_get("description")?,
            required_skills: serde_json::from_str(&skills_json).unwrap_or_default(),
            experience_level: ExperienceLevel::parse(&level),
            salary: row.try_get("salary")?,
            source: row.try_get("source")?,
            url: row.try_get("url")?,
            scraped_at: row.try_get("scraped_at")?,
        })
    }
}
