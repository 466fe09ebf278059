pub mod apply;
pub mod destroy;
pub mod plan;
pub mod refresh;
pub mod show;

use reconcile::{Error, LocalState};

use crate::Context;
use crate::ui;

/// Result of reconciling one declared resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Replaced,
    Unchanged,
    Deleted,
}

impl Outcome {
    /// Classify an upsert by comparing read-back state with what was stored
    pub fn of_upsert(previous: Option<&LocalState>, current: &LocalState) -> Self {
        match previous {
            None => Self::Created,
            Some(prev) if prev == current => Self::Unchanged,
            Some(_) => Self::Updated,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Replaced => "replaced",
            Self::Unchanged => "unchanged",
            Self::Deleted => "deleted",
        }
    }
}

/// Counts of outcomes across one command run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub created: usize,
    pub updated: usize,
    pub replaced: usize,
    pub unchanged: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl Summary {
    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Replaced => self.replaced += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Deleted => self.deleted += 1,
        }
    }

    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.updated + self.replaced + self.deleted
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn print(&self, ctx: &Context) {
        if ctx.quiet && self.is_success() {
            return;
        }
        if self.is_success() && self.total_changes() == 0 {
            ui::success(&format!("Everything up to date ({} unchanged)", self.unchanged));
            return;
        }
        let line = format!(
            "{} created, {} updated, {} replaced, {} deleted, {} unchanged, {} failed",
            self.created, self.updated, self.replaced, self.deleted, self.unchanged, self.failed
        );
        if self.is_success() {
            ui::success(&line);
        } else {
            ui::error(&line);
        }
    }
}

/// Report a per-resource failure and keep going
pub fn report_failure(label: &str, err: &Error) {
    log::warn!("{label}: {err}");
    ui::error(&format!("{label}: {err}"));
    ui::dim(err.category().advice());
}
