//! Persisted strategy store.
//!
//! One `<role>.json` file per role, shaped `{"rules": ["...", ...]}`.
//! Rules are free text: the engine loads them once, hands them to the
//! decision provider unmodified, and never reads them itself.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::Role;

/// Failure reading one strategy file.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed strategy file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct StrategyFile {
    #[serde(default)]
    rules: Vec<serde_json::Value>,
}

/// Role → directive strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyStore {
    rules: FxHashMap<Role, Vec<String>>,
}

impl StrategyStore {
    /// Empty store: no role has directives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `<role>.json` for every role from `dir`.
    ///
    /// Missing or malformed files leave that role without rules.
    pub fn load_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut store = Self::new();

        for role in Role::ALL {
            let path = dir.join(format!("{}.json", role.name()));
            if !path.exists() {
                debug!(path = %path.display(), "no strategy file");
                continue;
            }
            match Self::load_file(&path) {
                Ok(rules) => {
                    debug!(role = %role, count = rules.len(), "strategy loaded");
                    store.rules.insert(role, rules);
                }
                Err(err) => warn!(role = %role, error = %err, "ignoring strategy file"),
            }
        }

        store
    }

    /// Read one strategy file. Non-string rules are dropped.
    pub fn load_file(path: &Path) -> Result<Vec<String>, StrategyError> {
        let text = fs::read_to_string(path).map_err(|source| StrategyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| StrategyError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse the `{"rules": [...]}` document.
    pub fn parse(text: &str) -> Result<Vec<String>, serde_json::Error> {
        let file: StrategyFile = serde_json::from_str(text)?;
        Ok(file
            .rules
            .into_iter()
            .filter_map(|rule| match rule {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect())
    }

    /// Set the rules for `role` (builder pattern).
    #[must_use]
    pub fn with_rules<I, S>(mut self, role: Role, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules
            .insert(role, rules.into_iter().map(Into::into).collect());
        self
    }

    /// Directives for `role`, empty if none were loaded.
    #[must_use]
    pub fn rules_for(&self, role: Role) -> &[String] {
        self.rules.get(&role).map_or(&[], Vec::as_slice)
    }

    /// True if no role has any directive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("seer.json"),
            r#"{"rules": ["Check quiet players first", 42, "Reveal late"]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("witch.json"), "{not json").unwrap();

        let store = StrategyStore::load_dir(dir.path());

        assert_eq!(
            store.rules_for(Role::Seer),
            ["Check quiet players first", "Reveal late"]
        );
        assert!(store.rules_for(Role::Witch).is_empty());
        assert!(store.rules_for(Role::Hunter).is_empty());
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let store = StrategyStore::load_dir("/definitely/not/here");
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guardian.json");
        fs::write(&path, r#"{"rules": "oops"}"#).unwrap();

        let err = StrategyStore::load_file(&path).unwrap_err();
        assert!(matches!(err, StrategyError::Json { .. }));
        assert!(err.to_string().contains("guardian.json"));
    }

    #[test]
    fn test_with_rules() {
        let store = StrategyStore::new().with_rules(Role::Werewolf, ["Blend in"]);
        assert_eq!(store.rules_for(Role::Werewolf), ["Blend in"]);
        assert!(!store.is_empty());
    }
}
