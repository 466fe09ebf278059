use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reconcile::LocalState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

// ============================================================================
// State Structures
// ============================================================================

/// Everything catval knows about resources it manages
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatvalState {
    /// Last time the state was updated
    pub last_updated: DateTime<Utc>,

    /// Last read-back state per declaration label
    #[serde(default)]
    pub resources: BTreeMap<String, LocalState>,
}

impl Default for CatvalState {
    fn default() -> Self {
        Self {
            resources: BTreeMap::new(),
            last_updated: Utc::now(),
        }
    }
}

// ============================================================================
// CatvalState Implementation
// ============================================================================

impl CatvalState {
    /// Get the default state file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(paths::state_dir()?.join(paths::STATE_FILE))
    }

    /// Load state from disk, or return default if file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("State file does not exist, using default state");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        let state: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        log::debug!("Loaded state from {}", path.display());
        Ok(state)
    }

    /// Save state to disk, stamping `last_updated`
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
        }

        self.last_updated = Utc::now();
        let content = toml::to_string_pretty(&self).context("Failed to serialize state to TOML")?;

        fs::write(path, &content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        log::debug!("Saved state to {}", path.display());
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<&LocalState> {
        self.resources.get(label)
    }

    /// Store the state of a resource that exists remotely
    pub fn record(&mut self, label: &str, state: LocalState) {
        self.resources.insert(label.to_string(), state);
    }

    /// Drop a resource that no longer exists remotely
    pub fn forget(&mut self, label: &str) -> Option<LocalState> {
        self.resources.remove(label)
    }

    /// Labels in state, optionally narrowed to `target`
    pub fn labels(&self, target: Option<&str>) -> Vec<String> {
        self.resources
            .keys()
            .filter(|label| target.is_none_or(|t| t == label.as_str()))
            .cloned()
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use reconcile::Identifier;
    use tempfile::TempDir;

    fn sample(name: &str) -> LocalState {
        LocalState {
            id: Identifier::from(name),
            name: name.to_string(),
            value: "prod".to_string(),
            description: "production".to_string(),
            api_version: "3.1".to_string(),
            system_defined: false,
        }
    }

    #[test]
    fn test_default_state() {
        let state = CatvalState::default();
        assert!(state.resources.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let state = CatvalState::load_from(&dir.path().join("state.toml")).unwrap();
        assert!(state.resources.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.toml");

        let mut state = CatvalState::default();
        state.record("env_prod", sample("env"));
        state.save_to(&path).unwrap();

        let loaded = CatvalState::load_from(&path).unwrap();
        assert_eq!(loaded.get("env_prod"), Some(&sample("env")));
        assert_eq!(loaded.last_updated, state.last_updated);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "resources = 3").unwrap();
        assert!(CatvalState::load_from(&path).is_err());
    }

    #[test]
    fn test_record_and_forget() {
        let mut state = CatvalState::default();
        state.record("env_prod", sample("env"));
        state.record("tier", sample("tier"));

        assert_eq!(state.labels(None), vec!["env_prod", "tier"]);
        assert_eq!(state.labels(Some("tier")), vec!["tier"]);
        assert!(state.labels(Some("missing")).is_empty());

        assert!(state.forget("env_prod").is_some());
        assert!(state.get("env_prod").is_none());
        assert!(state.forget("env_prod").is_none());
    }
}
