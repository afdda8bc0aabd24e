//! Compatibility scoring between a candidate profile and one listing.
//!
//! Pure and synchronous; results are ephemeral and never persisted.

use serde::Serialize;

use crate::models::job::ExperienceLevel;

const SKILL_OVERLAP_WEIGHT: f64 = 0.4;
const EXPERIENCE_WEIGHT: f64 = 0.3;
const COVERAGE_WEIGHT: f64 = 0.3;

/// Score breakdown for one (candidate, listing) pair. Matched and missing
/// partition the listing's normalized required-skill set; both are kept
/// sorted so identical inputs always produce identical output.
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityResult {
    pub total_score: f64,
    pub skill_match_pct: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub experience_aligned: bool,
}

/// Weighted sum of skill overlap (0.4), experience alignment (0.3) and
/// required-skill coverage (0.3), each 0-100 before weighting. Overlap and
/// coverage measure the same ratio; the duplication is inherited from the
/// scoring design and kept until product intent says otherwise.
pub fn score(
    candidate_skills: &[String],
    candidate_years: u32,
    required_skills: &[String],
    level: ExperienceLevel,
) -> CompatibilityResult {
    let candidate: Vec<String> = candidate_skills.iter().map(|s| normalize(s)).collect();
    let required: Vec<String> = {
        let mut r: Vec<String> = required_skills.iter().map(|s| normalize(s)).collect();
        r.sort();
        r.dedup();
        r
    };

    let (matched, missing): (Vec<String>, Vec<String>) = required
        .iter()
        .cloned()
        .partition(|skill| candidate.contains(skill));

    // Empty requirement set scores zero on both skill components rather than
    // dividing by zero.
    let overlap_pct = if required.is_empty() {
        0.0
    } else {
        matched.len() as f64 / required.len() as f64 * 100.0
    };

    let (expected_min, expected_max) = level.expected_years();
    let years = candidate_years as f64;
    // A zero floor (Junior / unknown band) can never be under-shot, so it is
    // always the aligned branch; dividing by the zero minimum is what the
    // below-expectations branch would otherwise do.
    let aligned = expected_min == 0.0 || years >= expected_min;
    let exp_pct = if aligned {
        (years / expected_max * 100.0).min(100.0)
    } else {
        (years / expected_min * 100.0).max(0.0)
    };

    let total = overlap_pct * SKILL_OVERLAP_WEIGHT
        + exp_pct * EXPERIENCE_WEIGHT
        + overlap_pct * COVERAGE_WEIGHT;

    CompatibilityResult {
        total_score: round1(total),
        skill_match_pct: round1(overlap_pct),
        matched_skills: matched,
        missing_skills: missing,
        experience_aligned: aligned,
    }
}

/// Tiered human-readable verdict: score tier, up to 3 matched skills, up to
/// 2 missing, and an alignment sentence.
pub fn justification(result: &CompatibilityResult) -> String {
    let score = result.total_score;
    let tier = if score >= 80.0 {
        "Excellent"
    } else if score >= 60.0 {
        "Good"
    } else if score >= 40.0 {
        "Fair"
    } else {
        "Low"
    };

    let mut parts = vec![format!("{tier} match ({score}%).")];

    let required_total = result.matched_skills.len() + result.missing_skills.len();
    if !result.matched_skills.is_empty() {
        let shown: Vec<&str> = result
            .matched_skills
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        let ellipsis = if result.matched_skills.len() > 3 { "..." } else { "" };
        parts.push(format!(
            "You have {} of {required_total} required skills: {}{ellipsis}.",
            result.matched_skills.len(),
            shown.join(", ")
        ));
    }

    if !result.missing_skills.is_empty() {
        let shown: Vec<&str> = result
            .missing_skills
            .iter()
            .take(2)
            .map(String::as_str)
            .collect();
        parts.push(format!("You may want to develop: {}.", shown.join(", ")));
    }

    if result.experience_aligned {
        parts.push("Your experience level aligns well with the role.".to_string());
    } else {
        parts.push("Your experience level may be below expectations for this role.".to_string());
    }

    parts.join(" ")
}

fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn worked_scenario_senior_band() {
        // {Python, SQL} at 5y vs {Python, Django, SQL} Senior:
        // overlap 66.7 * 0.4 = 26.7, exp min(100, 5/20*100) * 0.3 = 7.5,
        // coverage 66.7 * 0.3 = 20.0 -> 54.2
        let result = score(
            &skills(&["Python", "SQL"]),
            5,
            &skills(&["Python", "Django", "SQL"]),
            ExperienceLevel::Senior,
        );
        assert_eq!(result.total_score, 54.2);
        assert_eq!(result.matched_skills, vec!["python", "sql"]);
        assert_eq!(result.missing_skills, vec!["django"]);
        assert!(result.experience_aligned);
    }

    #[test]
    fn empty_required_skills_does_not_divide_by_zero() {
        let result = score(&skills(&["Python"]), 3, &[], ExperienceLevel::MidLevel);
        assert!(result.total_score >= 0.0 && result.total_score <= 100.0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn empty_candidate_skills_scores_in_range() {
        let result = score(&[], 0, &skills(&["Rust", "Go"]), ExperienceLevel::Senior);
        assert!(result.total_score >= 0.0 && result.total_score <= 100.0);
        assert_eq!(result.matched_skills.len(), 0);
        assert_eq!(result.missing_skills.len(), 2);
    }

    #[test]
    fn matched_and_missing_partition_required_set() {
        let required = skills(&["Python", "Rust", "Go", "SQL"]);
        let result = score(&skills(&["rust", "SQL"]), 4, &required, ExperienceLevel::MidLevel);

        let mut union: Vec<String> = result
            .matched_skills
            .iter()
            .chain(result.missing_skills.iter())
            .cloned()
            .collect();
        union.sort();
        assert_eq!(union, vec!["go", "python", "rust", "sql"]);
        assert!(
            result
                .matched_skills
                .iter()
                .all(|s| !result.missing_skills.contains(s))
        );
    }

    #[test]
    fn zero_floor_band_is_always_aligned() {
        // Junior band min is 0: zero-years candidate takes the aligned branch
        // instead of dividing by the zero minimum.
        let result = score(&skills(&["HTML"]), 0, &skills(&["HTML"]), ExperienceLevel::Junior);
        assert!(result.experience_aligned);
        assert!(result.total_score >= 0.0 && result.total_score <= 100.0);

        let unknown = score(&[], 0, &[], ExperienceLevel::NotSpecified);
        assert!(unknown.experience_aligned);
        assert_eq!(unknown.total_score, 0.0);
    }

    #[test]
    fn below_band_minimum_is_not_aligned() {
        let result = score(&skills(&["Rust"]), 2, &skills(&["Rust"]), ExperienceLevel::Senior);
        assert!(!result.experience_aligned);
        // 100 * 0.7 + (2/5 * 100) * 0.3 = 82.0
        assert_eq!(result.total_score, 82.0);
    }

    #[test]
    fn experience_component_caps_at_100() {
        let result = score(&skills(&["Rust"]), 50, &skills(&["Rust"]), ExperienceLevel::Junior);
        // Full overlap + capped experience = 100
        assert_eq!(result.total_score, 100.0);
    }

    #[test]
    fn required_skills_dedup_case_insensitively() {
        let result = score(
            &skills(&["Python"]),
            3,
            &skills(&["Python", "PYTHON", "python "]),
            ExperienceLevel::MidLevel,
        );
        assert_eq!(result.matched_skills, vec!["python"]);
        assert_eq!(result.skill_match_pct, 100.0);
    }

    #[test]
    fn justification_tiers() {
        let mut result = score(&skills(&["Rust"]), 10, &skills(&["Rust"]), ExperienceLevel::MidLevel);
        assert!(justification(&result).starts_with("Excellent match"));

        result.total_score = 65.0;
        assert!(justification(&result).starts_with("Good match"));
        result.total_score = 45.0;
        assert!(justification(&result).starts_with("Fair match"));
        result.total_score = 10.0;
        assert!(justification(&result).starts_with("Low match"));
    }

    #[test]
    fn justification_lists_capped_skills_and_is_deterministic() {
        let result = score(
            &skills(&["a", "b", "c", "d"]),
            3,
            &skills(&["a", "b", "c", "d", "e", "f", "g"]),
            ExperienceLevel::MidLevel,
        );
        let text = justification(&result);
        assert!(text.contains("You have 4 of 7 required skills: a, b, c..."));
        assert!(text.contains("You may want to develop: e, f."));
        assert_eq!(text, justification(&result));
    }
}
