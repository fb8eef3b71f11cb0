use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("experience_years must be a non-negative integer, got {0}")]
    InvalidExperience(String),
}

/// `skills` as it arrives from extraction: either a list or one comma-delimited string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillsField {
    List(Vec<String>),
    Delimited(String),
}

impl SkillsField {
    /// Canonical sequence form. Lists are used as-is; strings are split on commas
    /// and trimmed. Empty pieces are kept, so `"a,b,"` is three skills.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            SkillsField::List(items) => items.clone(),
            SkillsField::Delimited(text) => split_delimited(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectsField {
    List(Vec<Project>),
    Delimited(String),
}

impl ProjectsField {
    pub fn normalize(&self) -> Vec<Project> {
        match self {
            ProjectsField::List(items) => items.clone(),
            ProjectsField::Delimited(text) => split_delimited(text)
                .into_iter()
                .filter(|title| !title.is_empty())
                .map(|title| Project {
                    title,
                    description: String::new(),
                })
                .collect(),
        }
    }
}

/// Structured profile produced by the extraction step. Read-only once received.
///
/// `experience_years` is kept as the raw JSON value so that a bad value surfaces
/// as a validation error at selection time rather than failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub skills: Option<SkillsField>,
    #[serde(default)]
    pub experience_years: Option<Value>,
    #[serde(default)]
    pub projects: Option<ProjectsField>,
}

impl Profile {
    pub fn skills(&self) -> Vec<String> {
        self.skills
            .as_ref()
            .map(SkillsField::normalize)
            .unwrap_or_default()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.projects
            .as_ref()
            .map(ProjectsField::normalize)
            .unwrap_or_default()
    }

    /// Absent or null → 0.
    pub fn experience_years(&self) -> Result<u32, ProfileError> {
        match &self.experience_years {
            None => Ok(0),
            Some(value) => coerce_years(value),
        }
    }

    pub fn display_name(&self) -> &str {
        non_blank(self.name.as_deref()).unwrap_or("User")
    }

    pub fn display_role(&self) -> &str {
        non_blank(self.role.as_deref()).unwrap_or("Professional")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn split_delimited(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .map(String::from)
        .collect()
}

fn coerce_years(value: &Value) -> Result<u32, ProfileError> {
    let invalid = || ProfileError::InvalidExperience(value.to_string());
    match value {
        Value::Null => Ok(0),
        Value::Number(n) => {
            if let Some(whole) = n.as_u64() {
                return u32::try_from(whole).map_err(|_| invalid());
            }
            match n.as_f64() {
                // fractional years truncate
                Some(f) if f.is_finite() && f >= 0.0 && f <= u32::MAX as f64 => Ok(f.trunc() as u32),
                _ => Err(invalid()),
            }
        }
        Value::String(s) => s.trim().parse::<u32>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
