use serde::{Deserialize, Serialize};

/// What the resume-parsing collaborator hands us: a flat skill list and a
/// years-of-experience estimate. No pipeline logic of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub skills: Vec<String>,
    pub experience_years: u32,
}
