//! `catval refresh` - re-read managed resources into local state
//!
//! Entries whose resource is gone remotely are dropped from state.

use anyhow::{Result, bail};
use reconcile::Reconciler;
use std::path::Path;

use super::{Summary, report_failure};
use crate::Context;
use crate::cli::RefreshArgs;
use crate::config::ProviderConfig;
use crate::state::CatvalState;
use crate::ui;

pub fn run(ctx: &Context, args: RefreshArgs) -> Result<()> {
    let state_path = CatvalState::default_path()?;
    let mut state = CatvalState::load_from(&state_path)?;
    let reconciler = ProviderConfig::load()?.reconciler()?;

    let summary = refresh(ctx, &reconciler, &mut state, &state_path, args.target.as_deref())?;
    summary.print(ctx);

    if !summary.is_success() {
        bail!("{} resource(s) could not be refreshed", summary.failed);
    }
    Ok(())
}

pub fn refresh(
    ctx: &Context,
    reconciler: &Reconciler,
    state: &mut CatvalState,
    state_path: &Path,
    target: Option<&str>,
) -> Result<Summary> {
    let mut summary = Summary::default();

    for label in state.labels(target) {
        let Some(entry) = state.get(&label).cloned() else {
            continue;
        };

        match reconciler.read(Some(&entry.name), &entry.id) {
            Ok(current) => {
                if current == entry {
                    summary.unchanged += 1;
                } else {
                    summary.updated += 1;
                    if !ctx.quiet {
                        ui::info(&format!("{label}: refreshed"));
                    }
                }
                state.record(&label, current);
            }
            Err(err) if err.is_not_found() => {
                log::warn!("{label}: no longer exists remotely, dropping from state");
                if !ctx.quiet {
                    ui::warn(&format!("{label}: gone remotely, removed from state"));
                }
                state.forget(&label);
                summary.deleted += 1;
            }
            Err(err) => {
                summary.failed += 1;
                report_failure(&label, &err);
            }
        }
    }

    state.save_to(state_path)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use reconcile::{DesiredConfig, Identifier, RemoteError};
    use tempfile::TempDir;

    fn managed(reconciler: &Reconciler) -> CatvalState {
        let mut state = CatvalState::default();
        state.record("env", reconciler.upsert(&DesiredConfig::new("env", "prod")).unwrap());
        state.record("tier", reconciler.upsert(&DesiredConfig::new("tier", "gold")).unwrap());
        state
    }

    #[test]
    fn test_refresh_picks_up_remote_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        let (reconciler, mock) = testing::reconciler();
        let mut state = managed(&reconciler);

        let mut remote = mock.get("env").unwrap();
        remote.description = Some("edited in the UI".to_string());
        mock.insert(remote);

        let summary = refresh(&testing::quiet(), &reconciler, &mut state, &path, None).unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(state.get("env").unwrap().description, "edited in the UI");
        assert!(path.exists());
    }

    #[test]
    fn test_refresh_drops_missing_resources() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        let (reconciler, _) = testing::reconciler();
        let mut state = managed(&reconciler);

        let mut id = Identifier::from("tier");
        reconciler.delete(Some("tier"), &mut id).unwrap();

        let summary = refresh(&testing::quiet(), &reconciler, &mut state, &path, None).unwrap();
        assert_eq!(summary.deleted, 1);
        assert!(state.get("tier").is_none());
        assert!(state.get("env").is_some());
    }

    #[test]
    fn test_refresh_keeps_entry_on_other_failures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        let (reconciler, mock) = testing::reconciler();
        let mut state = managed(&reconciler);

        mock.fail_next(RemoteError::Transport("timed out".to_string()));
        let summary =
            refresh(&testing::quiet(), &reconciler, &mut state, &path, Some("env")).unwrap();

        assert_eq!(summary.failed, 1);
        assert!(state.get("env").is_some());
    }
}
