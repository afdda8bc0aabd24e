//! Skill and seniority extraction from free text.
//!
//! Matching is deliberately dumb: a case-insensitive substring hit against a
//! fixed vocabulary is enough ("node.js" inside a longer phrase matches).
//! No tokenization, no longest-match resolution.

use crate::models::job::ExperienceLevel;

/// (lowercase match key, canonical display form)
const SKILL_VOCABULARY: &[(&str, &str)] = &[
    ("python", "Python"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("java", "Java"),
    ("c++", "C++"),
    ("c#", "C#"),
    ("go", "Go"),
    ("rust", "Rust"),
    ("react", "React"),
    ("vue", "Vue"),
    ("angular", "Angular"),
    ("node.js", "Node.js"),
    ("django", "Django"),
    ("flask", "Flask"),
    ("fastapi", "FastAPI"),
    ("sql", "SQL"),
    ("mysql", "MySQL"),
    ("postgresql", "PostgreSQL"),
    ("mongodb", "MongoDB"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("aws", "AWS"),
    ("gcp", "GCP"),
    ("git", "Git"),
    ("ci/cd", "CI/CD"),
    ("devops", "DevOps"),
    ("linux", "Linux"),
    ("machine learning", "Machine Learning"),
    ("tensorflow", "TensorFlow"),
    ("pandas", "pandas"),
    ("numpy", "numpy"),
    ("scikit-learn", "scikit-learn"),
    ("rest api", "REST API"),
    ("graphql", "GraphQL"),
    ("html", "HTML"),
    ("css", "CSS"),
];

/// Extract known skills from free text. Returns canonical display forms,
/// deduplicated, in vocabulary order (so output is deterministic).
pub fn extract_skills(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    SKILL_VOCABULARY
        .iter()
        .filter(|(key, _)| text_lower.contains(key))
        .map(|(_, canonical)| (*canonical).to_string())
        .collect()
}

/// Infer a seniority band from a job title. Bands are checked in priority
/// order; the first hit wins.
pub fn infer_level(title: &str) -> ExperienceLevel {
    let title_lower = title.to_lowercase();
    let hit = |words: &[&str]| words.iter().any(|w| title_lower.contains(w));

    if hit(&["senior", "lead", "principal", "architect"]) {
        ExperienceLevel::Senior
    } else if hit(&["mid", "intermediate"]) {
        ExperienceLevel::MidLevel
    } else if hit(&["junior", "entry", "graduate"]) {
        ExperienceLevel::Junior
    } else {
        ExperienceLevel::NotSpecified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_skills_case_insensitively() {
        // "go" hits inside "django" and "sql" inside "postgresql" -- substring
        // matching is the contract, not a bug
        let skills = extract_skills("Expert in PYTHON, Django and postgresql.");
        assert_eq!(skills, vec!["Python", "Go", "Django", "SQL", "PostgreSQL"]);
    }

    #[test]
    fn substring_hit_is_sufficient() {
        // "java" inside "javascript" counts, by design
        let skills = extract_skills("We use JavaScript everywhere");
        assert!(skills.contains(&"JavaScript".to_string()));
        assert!(skills.contains(&"Java".to_string()));
    }

    #[test]
    fn node_js_matches_inside_phrase() {
        let skills = extract_skills("3 years of node.js backend work");
        assert!(skills.contains(&"Node.js".to_string()));
    }

    #[test]
    fn no_vocabulary_hit_yields_empty() {
        assert!(extract_skills("shepherding alpacas in the Andes").is_empty());
    }

    #[test]
    fn repeated_mentions_dedup() {
        let skills = extract_skills("Docker docker DOCKER");
        assert_eq!(skills, vec!["Docker"]);
    }

    #[test]
    fn senior_band_beats_junior_keywords() {
        // First band wins even when a later band's keyword is present
        assert_eq!(
            infer_level("Senior Junior-Mentoring Engineer"),
            ExperienceLevel::Senior
        );
    }

    #[test]
    fn level_keyword_bands() {
        assert_eq!(infer_level("Lead Developer"), ExperienceLevel::Senior);
        assert_eq!(infer_level("Principal Architect"), ExperienceLevel::Senior);
        assert_eq!(infer_level("Mid-level Backend Dev"), ExperienceLevel::MidLevel);
        assert_eq!(infer_level("Intermediate QA"), ExperienceLevel::MidLevel);
        assert_eq!(infer_level("Junior Web Developer"), ExperienceLevel::Junior);
        assert_eq!(infer_level("Graduate Trainee"), ExperienceLevel::Junior);
        assert_eq!(infer_level("Software Engineer"), ExperienceLevel::NotSpecified);
    }
}
