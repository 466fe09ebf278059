//! Declaration file: labelled category values the user wants to exist
//!
//! ```toml
//! [resources.env_prod]
//! name = "env"
//! value = "prod"
//! description = "production"
//! ```

use anyhow::{Context, Result, bail};
use reconcile::DesiredConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declarations {
    /// Desired configs keyed by a stable local label
    #[serde(default)]
    pub resources: BTreeMap<String, DesiredConfig>,
}

impl Declarations {
    /// Load and parse a declaration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read declarations: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid declarations: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resources to act on: all of them, or only `target`
    pub fn select(&self, target: Option<&str>) -> Result<Vec<(&str, &DesiredConfig)>> {
        match target {
            Some(label) => match self.resources.get_key_value(label) {
                Some((label, desired)) => Ok(vec![(label.as_str(), desired)]),
                None => bail!("No declared resource named '{label}'"),
            },
            None => Ok(self
                .resources
                .iter()
                .map(|(label, desired)| (label.as_str(), desired))
                .collect()),
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.resources.contains_key(label)
    }
}
