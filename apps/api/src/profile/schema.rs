//! Portfolio schema: the display-ready view of a profile that the renderer consumes.

use serde::{Deserialize, Serialize};

use crate::profile::models::{Profile, ProfileError, Project};

/// Skills listed in the one-line summary before it switches to "and N more".
const SUMMARY_SKILL_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSchema {
    pub name: String,
    pub headline: String,
    pub profile_summary: String,
    pub experience_years: u32,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
}

pub fn build_schema(profile: &Profile) -> Result<PortfolioSchema, ProfileError> {
    let experience_years = profile.experience_years()?;
    let skills: Vec<String> = profile
        .skills()
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect();
    let name = profile.display_name().to_string();
    let role = profile.display_role();

    Ok(PortfolioSchema {
        headline: format!("{name} · {role}"),
        profile_summary: summarize(&name, role, experience_years, &skills),
        name,
        experience_years,
        skills,
        projects: profile.projects(),
    })
}

fn summarize(name: &str, role: &str, years: u32, skills: &[String]) -> String {
    let mut summary = format!("{name}, {role}");
    match years {
        0 => {}
        1 => summary.push_str(" with 1 year of experience"),
        n => summary.push_str(&format!(" with {n} years of experience")),
    }

    if !skills.is_empty() {
        let shown = skills
            .iter()
            .take(SUMMARY_SKILL_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        summary.push_str(&format!(" in {shown}"));
        if skills.len() > SUMMARY_SKILL_LIMIT {
            summary.push_str(&format!(" and {} more", skills.len() - SUMMARY_SKILL_LIMIT));
        }
    }

    summary.push('.');
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: serde_json::Value) -> Profile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_summary_for_sample_profile() {
        let schema = build_schema(&profile(json!({
            "name": "Arjun Sharma",
            "role": "Full Stack Developer",
            "skills": "Python, React, Docker, AWS",
            "experience_years": 5
        })))
        .unwrap();

        assert_eq!(
            schema.profile_summary,
            "Arjun Sharma, Full Stack Developer with 5 years of experience in Python, React, Docker and 1 more."
        );
        assert_eq!(schema.headline, "Arjun Sharma · Full Stack Developer");
        assert_eq!(schema.skills.len(), 4);
    }

    #[test]
    fn test_summary_defaults_for_sparse_profile() {
        let schema = build_schema(&Profile::default()).unwrap();
        assert_eq!(schema.profile_summary, "User, Professional.");
        assert_eq!(schema.experience_years, 0);
    }

    #[test]
    fn test_blank_skills_not_displayed() {
        let schema = build_schema(&profile(json!({"skills": "Go, ,Rust,"}))).unwrap();
        assert_eq!(schema.skills, vec!["Go", "Rust"]);
        assert_eq!(schema.profile_summary, "User, Professional in Go, Rust.");
    }

    #[test]
    fn test_singular_year() {
        let schema = build_schema(&profile(json!({"experience_years": 1}))).unwrap();
        assert!(schema.profile_summary.contains("1 year of experience"));
    }

    #[test]
    fn test_invalid_experience_propagates() {
        let result = build_schema(&profile(json!({"experience_years": "lots"})));
        assert!(result.is_err());
    }
}
