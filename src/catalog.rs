// src/catalog.rs
//! Skill-badge catalog: the curated set of badge names eligible for the
//! `skill` category when no stronger lexical/structural signal applies.
//!
//! Sourced from a JSON file. Two shapes are accepted:
//! - `[ { "name": "..." }, ... ]` (the published catalog format)
//! - `[ "...", ... ]` (plain list, handy in tests)
//!
//! Lookup is by normalized name (lowercased, whitespace collapsed).

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::normalize_title;

pub const DEFAULT_SKILL_CATALOG_PATH: &str = "config/skill_badges.json";
pub const ENV_SKILL_CATALOG_PATH: &str = "SKILL_CATALOG_PATH";

#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    names: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
}

impl SkillCatalog {
    /// Load using `SKILL_CATALOG_PATH`, falling back to the default path.
    /// A missing or unreadable catalog yields an empty set (no badge can
    /// classify as `skill`) and a warning, not an error.
    pub fn load_default() -> Self {
        let path = std::env::var(ENV_SKILL_CATALOG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SKILL_CATALOG_PATH));
        Self::load_from_file(&path)
    }

    pub fn load_from_file(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match Self::from_json_str(&content) {
                Ok(catalog) => catalog,
                Err(e) => {
                    tracing::warn!(error = ?e, path = %path.display(), "invalid skill catalog, treating as empty");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::warn!(path = %path.display(), "skill catalog not found, treating as empty");
                Self::default()
            }
        }
    }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        // Published format first, plain string list second.
        let raw: Vec<String> = match serde_json::from_str::<Vec<CatalogEntry>>(s) {
            Ok(entries) => entries.into_iter().map(|e| e.name).collect(),
            Err(_) => serde_json::from_str::<Vec<String>>(s)?,
        };
        Ok(Self::from_names(raw))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| normalize_title(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    /// Membership test by normalized title.
    pub fn contains_normalized(&self, normalized: &str) -> bool {
        self.names.contains(normalized)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Sorted catalog names, as served by `GET /skill-badges`.
    pub fn sorted_names(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_published_format() {
        let json = r#"[
            { "name": "Implement Load Balancing on Compute Engine" },
            { "name": "  Build a Secure   Google Cloud Network " }
        ]"#;
        let c = SkillCatalog::from_json_str(json).unwrap();
        assert_eq!(c.len(), 2);
        assert!(c.contains_normalized("implement load balancing on compute engine"));
        assert!(c.contains_normalized("build a secure google cloud network"));
    }

    #[test]
    fn parses_plain_list_and_dedups() {
        let json = r#"["Set Up an App Dev Environment", "set up an app dev environment", ""]"#;
        let c = SkillCatalog::from_json_str(json).unwrap();
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn missing_file_is_empty() {
        let c = SkillCatalog::load_from_file(Path::new("does/not/exist.json"));
        assert!(c.is_empty());
        assert!(!c.contains_normalized("anything"));
    }

    #[serial_test::serial]
    #[test]
    fn env_var_overrides_the_default_path() {
        let path = std::env::temp_dir().join("skill_badges_catalog_test.json");
        std::fs::write(&path, r#"["Custom Env Badge"]"#).unwrap();

        std::env::set_var(ENV_SKILL_CATALOG_PATH, &path);
        let c = SkillCatalog::load_default();
        std::env::remove_var(ENV_SKILL_CATALOG_PATH);

        assert_eq!(c.len(), 1);
        assert!(c.contains_normalized("custom env badge"));
    }
}
