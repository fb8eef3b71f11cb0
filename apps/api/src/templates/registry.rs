//! Template Registry: the immutable catalog of portfolio templates.
//!
//! Loaded once at startup from a JSON document shaped like
//! `{"templates": [{"id": "...", ...}, ...]}` and shared read-only afterwards.
//! A registry value always holds at least one template, and ids are unique.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("template registry not found at {0}")]
    Missing(PathBuf),

    #[error("failed to read template registry {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template registry is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("template registry has no top-level `templates` list")]
    MissingTemplates,

    #[error("template at index {0} has a blank id")]
    BlankId(usize),

    #[error("duplicate template id '{0}'")]
    DuplicateId(String),

    #[error("template registry contains no templates")]
    Empty,
}

/// One visual layout option. Everything besides `id` is display metadata
/// and is never inspected by the selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl TemplateDescriptor {
    /// String-valued metadata field, if present.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    templates: Vec<TemplateDescriptor>,
}

impl Registry {
    /// Reads and validates a registry document from disk.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        if !path.exists() {
            return Err(RegistryError::Missing(path.to_path_buf()));
        }

        let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let registry = Self::from_json_str(&raw)?;
        info!(
            "Loaded {} templates from {}",
            registry.templates.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Parses and validates an in-memory registry document.
    pub fn from_json_str(raw: &str) -> Result<Self, RegistryError> {
        let document: Value = serde_json::from_str(raw)?;
        let list = document
            .get("templates")
            .filter(|v| v.is_array())
            .cloned()
            .ok_or(RegistryError::MissingTemplates)?;

        let templates: Vec<TemplateDescriptor> = serde_json::from_value(list)?;
        Self::new(templates)
    }

    pub fn new(templates: Vec<TemplateDescriptor>) -> Result<Self, RegistryError> {
        if templates.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, template) in templates.iter().enumerate() {
            if template.id.trim().is_empty() {
                return Err(RegistryError::BlankId(index));
            }
            if !seen.insert(template.id.as_str()) {
                return Err(RegistryError::DuplicateId(template.id.clone()));
            }
        }

        Ok(Self { templates })
    }

    /// All templates in stored order.
    pub fn templates(&self) -> &[TemplateDescriptor] {
        &self.templates
    }

    /// First template with `id`, scanning in stored order.
    pub fn get(&self, id: &str) -> Option<&TemplateDescriptor> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// The fallback template: the first entry.
    pub fn default_template(&self) -> &TemplateDescriptor {
        // non-empty is checked in `new`
        &self.templates[0]
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn descriptor(id: &str) -> TemplateDescriptor {
        TemplateDescriptor {
            id: id.to_string(),
            name: Some(id.replace('-', " ")),
            metadata: Map::new(),
        }
    }

    pub fn registry_of(ids: &[&str]) -> Registry {
        Registry::new(ids.iter().map(|id| descriptor(id)).collect()).unwrap()
    }

    pub fn standard_registry() -> Registry {
        registry_of(&["modern-minimal", "tech-developer", "business-executive"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = r##"{
        "templates": [
            {"id": "modern-minimal", "name": "Modern Minimal", "layout": "single-column"},
            {"id": "tech-developer", "name": "Tech Developer", "accent_color": "#0f766e"}
        ]
    }"##;

    #[test]
    fn test_valid_document_loads_in_order() {
        let registry = Registry::from_json_str(VALID).unwrap();
        let ids: Vec<_> = registry.templates().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["modern-minimal", "tech-developer"]);
        assert_eq!(registry.default_template().id, "modern-minimal");
    }

    #[test]
    fn test_metadata_is_kept_opaque() {
        let registry = Registry::from_json_str(VALID).unwrap();
        let tech = registry.get("tech-developer").unwrap();
        assert_eq!(tech.meta_str("accent_color"), Some("#0f766e"));
        assert_eq!(tech.display_name(), "Tech Developer");
        assert!(!tech.metadata.contains_key("id"));
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        let registry = Registry::from_json_str(VALID).unwrap();
        assert!(registry.get("business-executive").is_none());
    }

    #[test]
    fn test_not_json_is_malformed() {
        assert!(matches!(
            Registry::from_json_str("templates: []"),
            Err(RegistryError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_templates_field() {
        assert!(matches!(
            Registry::from_json_str(r#"{"layouts": []}"#),
            Err(RegistryError::MissingTemplates)
        ));
        assert!(matches!(
            Registry::from_json_str(r#"{"templates": {"id": "x"}}"#),
            Err(RegistryError::MissingTemplates)
        ));
        assert!(matches!(
            Registry::from_json_str("[]"),
            Err(RegistryError::MissingTemplates)
        ));
    }

    #[test]
    fn test_descriptor_without_id_is_malformed() {
        assert!(matches!(
            Registry::from_json_str(r#"{"templates": [{"name": "No Id"}]}"#),
            Err(RegistryError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            Registry::from_json_str(r#"{"templates": []}"#),
            Err(RegistryError::Empty)
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let raw = r#"{"templates": [{"id": "a"}, {"id": "b"}, {"id": "a"}]}"#;
        match Registry::from_json_str(raw) {
            Err(RegistryError::DuplicateId(id)) => assert_eq!(id, "a"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_id_rejected() {
        assert!(matches!(
            Registry::from_json_str(r#"{"templates": [{"id": "ok"}, {"id": "  "}]}"#),
            Err(RegistryError::BlankId(1))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        assert!(matches!(Registry::load(&path), Err(RegistryError::Missing(_))));
    }

    #[test]
    fn test_load_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Registry::load(dir.path()),
            Err(RegistryError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();
        let registry = Registry::load(file.path()).unwrap();
        assert_eq!(registry.templates().len(), 2);
    }

    #[test]
    fn test_shipped_registry_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/registry.json");
        let registry = Registry::load(&path).unwrap();
        for id in ["tech-developer", "business-executive", "modern-minimal"] {
            assert!(registry.get(id).is_some(), "shipped registry lacks {id}");
        }
    }
}
