//! Core types for category value reconciliation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared intent for a single category value.
///
/// Every field is optional so that "absent" and "present" stay distinct.
/// An absent optional field lets the remote system apply its own default;
/// a present one (even an empty string) is sent as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesiredConfig {
    /// Category name, used as the lookup key. Immutable after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Category value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// API version; echoed from the server when absent.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "apiVersion")]
    pub api_version: Option<String>,
}

impl DesiredConfig {
    /// Create a config with the two required fields set.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// The name, if present and non-empty.
    pub fn name(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }

    /// The value, if present and non-empty.
    pub fn value(&self) -> Option<&str> {
        non_empty(self.value.as_deref())
    }
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.filter(|s| !s.is_empty())
}

/// Body of a create-or-update call.
///
/// Absent fields are left out of the serialized body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

/// Canonical server-side record of a category value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResource {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    /// Computed by the server; never settable by the caller.
    #[serde(default)]
    pub system_defined: Option<bool>,
}

/// Locally persisted handle of a remote resource.
///
/// Equals the resource name while the resource exists, empty otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Forget the remote resource this handle pointed at.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// State returned to the caller after an operation.
///
/// Always built from a read, so it reflects what the server holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalState {
    pub id: Identifier,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub system_defined: bool,
}

impl LocalState {
    /// Whether the state still points at a remote resource.
    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }
}
