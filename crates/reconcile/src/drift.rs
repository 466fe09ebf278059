//! Drift detection between a declaration and what the server holds

use crate::types::{DesiredConfig, LocalState};

/// A single field whose declared value differs from the server's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDrift {
    pub field: &'static str,
    pub desired: String,
    pub actual: String,
}

/// Compare a declaration with freshly read state.
///
/// Only fields present in `desired` are compared; absent optional fields
/// are server-computed and never count as drift. `system_defined` is
/// read-only and never compared.
pub fn detect(desired: &DesiredConfig, actual: &LocalState) -> Vec<FieldDrift> {
    [
        ("name", &desired.name, &actual.name),
        ("value", &desired.value, &actual.value),
        ("description", &desired.description, &actual.description),
        ("api_version", &desired.api_version, &actual.api_version),
    ]
    .into_iter()
    .filter_map(|(field, desired, actual)| match desired {
        Some(want) if want != actual => Some(FieldDrift {
            field,
            desired: want.clone(),
            actual: actual.clone(),
        }),
        _ => None,
    })
    .collect()
}

/// What applying a declaration would do to one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Not in local state yet
    Create,
    /// Exists and matches the declaration
    NoChange,
    /// Exists and differs in place
    Update(Vec<FieldDrift>),
    /// The immutable name changed; the old resource must go first
    Replace(Vec<FieldDrift>),
    /// In local state but no longer declared
    Delete,
}

impl Change {
    /// Classify drift for a resource that exists.
    pub fn from_drift(drift: Vec<FieldDrift>) -> Self {
        if drift.is_empty() {
            Self::NoChange
        } else if drift.iter().any(|d| d.field == "name") {
            Self::Replace(drift)
        } else {
            Self::Update(drift)
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// Marker used in plan output.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::NoChange => "=",
            Self::Update(_) => "~",
            Self::Replace(_) => "-/+",
            Self::Delete => "-",
        }
    }
}

/// Plan summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub replace: usize,
    pub delete: usize,
    pub no_change: usize,
}

impl PlanSummary {
    /// Create a summary from a list of changes
    pub fn from_changes<'a>(changes: impl IntoIterator<Item = &'a Change>) -> Self {
        let mut summary = Self::default();
        for change in changes {
            match change {
                Change::Create => summary.create += 1,
                Change::NoChange => summary.no_change += 1,
                Change::Update(_) => summary.update += 1,
                Change::Replace(_) => summary.replace += 1,
                Change::Delete => summary.delete += 1,
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.create + self.update + self.replace + self.delete
    }

    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}
