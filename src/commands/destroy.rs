//! `catval destroy` - delete managed resources

use anyhow::{Context as AnyhowContext, Result, bail};
use dialoguer::Confirm;
use reconcile::Reconciler;
use std::path::Path;

use super::apply::delete_or_forget;
use super::{Outcome, Summary, report_failure};
use crate::Context;
use crate::cli::DestroyArgs;
use crate::config::ProviderConfig;
use crate::state::CatvalState;
use crate::ui;

pub fn run(ctx: &Context, args: DestroyArgs) -> Result<()> {
    let state_path = CatvalState::default_path()?;
    let mut state = CatvalState::load_from(&state_path)?;

    let labels = state.labels(args.target.as_deref());
    if labels.is_empty() {
        ui::info("Nothing to destroy");
        return Ok(());
    }

    if !args.yes {
        ui::header("Will delete");
        for label in &labels {
            ui::dim(label);
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {} category value(s)?", labels.len()))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            ui::info("Aborted");
            return Ok(());
        }
    }

    let reconciler = ProviderConfig::load()?.reconciler()?;
    let summary = destroy(ctx, &reconciler, &mut state, &state_path, &labels)?;
    summary.print(ctx);

    if !summary.is_success() {
        bail!("{} resource(s) could not be deleted", summary.failed);
    }
    Ok(())
}

/// Delete each labelled resource; failed ones stay in state for a retry.
///
/// A resource that is already gone remotely counts as deleted.
pub fn destroy(
    ctx: &Context,
    reconciler: &Reconciler,
    state: &mut CatvalState,
    state_path: &Path,
    labels: &[String],
) -> Result<Summary> {
    let mut summary = Summary::default();

    for label in labels {
        match delete_or_forget(reconciler, label, state) {
            Ok(()) => {
                summary.add(Outcome::Deleted);
                if !ctx.quiet {
                    ui::success(&format!("{label}: deleted"));
                }
            }
            Err(err) => {
                summary.failed += 1;
                report_failure(label, &err);
            }
        }
        state.save_to(state_path)?;
    }

    Ok(summary)
}
