//! `catval apply` - make the remote match the declarations
//!
//! Each declared resource is upserted and its read-back state stored under
//! its label. State is saved after every resource so a failure part way
//! through keeps what already succeeded.

use anyhow::{Result, bail};
use reconcile::{DesiredConfig, Reconciler};
use std::path::Path;

use super::{Outcome, Summary, report_failure};
use crate::Context;
use crate::cli::ApplyArgs;
use crate::config::ProviderConfig;
use crate::declarations::Declarations;
use crate::paths;
use crate::state::CatvalState;
use crate::ui;

pub struct ApplyOptions<'a> {
    pub target: Option<&'a str>,
    pub prune: bool,
}

pub fn run(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let decls = Declarations::load(&paths::declarations_file(args.file.as_deref())?)?;
    let state_path = CatvalState::default_path()?;
    let mut state = CatvalState::load_from(&state_path)?;
    let reconciler = ProviderConfig::load()?.reconciler()?;

    let options = ApplyOptions {
        target: args.target.as_deref(),
        prune: args.prune,
    };
    let summary = apply(ctx, &reconciler, &decls, &mut state, &state_path, &options)?;
    summary.print(ctx);

    if !summary.is_success() {
        bail!("{} resource(s) failed to apply", summary.failed);
    }
    Ok(())
}

pub fn apply(
    ctx: &Context,
    reconciler: &Reconciler,
    decls: &Declarations,
    state: &mut CatvalState,
    state_path: &Path,
    options: &ApplyOptions,
) -> Result<Summary> {
    let mut summary = Summary::default();

    for (label, desired) in decls.select(options.target)? {
        let result = apply_one(reconciler, label, desired, state);
        state.save_to(state_path)?;

        match result {
            Ok(outcome) => {
                summary.add(outcome);
                if !ctx.quiet && outcome != Outcome::Unchanged {
                    ui::success(&format!("{label}: {}", outcome.verb()));
                }
            }
            Err(err) => {
                summary.failed += 1;
                report_failure(label, &err);
            }
        }
    }

    if options.prune {
        for label in state.labels(options.target) {
            if decls.contains(&label) {
                continue;
            }
            let result = delete_or_forget(reconciler, &label, state);
            state.save_to(state_path)?;

            match result {
                Ok(()) => {
                    summary.add(Outcome::Deleted);
                    if !ctx.quiet {
                        ui::success(&format!("{label}: deleted"));
                    }
                }
                Err(err) => {
                    summary.failed += 1;
                    report_failure(&label, &err);
                }
            }
        }
    }

    Ok(summary)
}

/// Upsert one declaration, replacing the old resource if its name changed.
fn apply_one(
    reconciler: &Reconciler,
    label: &str,
    desired: &DesiredConfig,
    state: &mut CatvalState,
) -> reconcile::Result<Outcome> {
    let previous = state.get(label).cloned();

    let renamed = previous
        .as_ref()
        .is_some_and(|prev| desired.name().is_some_and(|name| name != prev.name));
    if renamed && desired.value().is_some() {
        log::info!("{label}: name changed, deleting the old resource first");
        delete_or_forget(reconciler, label, state)?;
    }

    let current = reconciler.upsert(desired)?;
    let outcome = if renamed {
        Outcome::Replaced
    } else {
        Outcome::of_upsert(previous.as_ref(), &current)
    };
    state.record(label, current);
    Ok(outcome)
}

/// Delete the resource stored under `label` and drop it from state.
fn delete_one(
    reconciler: &Reconciler,
    label: &str,
    state: &mut CatvalState,
) -> reconcile::Result<()> {
    let Some(mut entry) = state.get(label).cloned() else {
        return Ok(());
    };
    reconciler.delete(Some(&entry.name), &mut entry.id)?;
    state.forget(label);
    Ok(())
}

/// Like [`delete_one`], but a resource already gone remotely is just
/// dropped from state.
pub fn delete_or_forget(
    reconciler: &Reconciler,
    label: &str,
    state: &mut CatvalState,
) -> reconcile::Result<()> {
    match delete_one(reconciler, label, state) {
        Err(err) if err.is_not_found() => {
            log::warn!("{label}: already gone remotely, dropping from state");
            state.forget(label);
            Ok(())
        }
        other => other,
    }
}
