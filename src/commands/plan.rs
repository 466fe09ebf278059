//! `catval plan` - preview what apply would change
//!
//! Managed resources are read back and compared field by field with their
//! declaration. Nothing is written, remotely or locally.

use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use reconcile::drift;
use reconcile::{Change, PlanSummary, Reconciler};

use crate::Context;
use crate::cli::PlanArgs;
use crate::config::ProviderConfig;
use crate::declarations::Declarations;
use crate::paths;
use crate::state::CatvalState;
use crate::ui;

pub fn run(ctx: &Context, args: PlanArgs) -> Result<()> {
    let decls = Declarations::load(&paths::declarations_file(args.file.as_deref())?)?;
    let state = CatvalState::load_from(&CatvalState::default_path()?)?;
    let reconciler = ProviderConfig::load()?.reconciler()?;

    let changes = plan(&reconciler, &decls, &state, args.target.as_deref())?;
    let summary = PlanSummary::from_changes(changes.iter().map(|(_, c)| c));

    for (label, change) in &changes {
        print_change(ctx, label, change);
    }

    if summary.has_changes() {
        ui::info(&format!(
            "Plan: {} to create, {} to update, {} to replace, {} to delete",
            summary.create, summary.update, summary.replace, summary.delete
        ));
    } else {
        ui::success("No changes. Remote matches the declarations.");
    }
    Ok(())
}

/// Compute the change apply would make for every selected resource.
///
/// A resource whose read comes back not-found is planned for creation; any
/// other read failure aborts the plan.
pub fn plan(
    reconciler: &Reconciler,
    decls: &Declarations,
    state: &CatvalState,
    target: Option<&str>,
) -> Result<Vec<(String, Change)>> {
    let mut changes = Vec::new();

    for (label, desired) in decls.select(target)? {
        let change = match state.get(label) {
            None => Change::Create,
            Some(entry) => match reconciler.read(Some(&entry.name), &entry.id) {
                Ok(actual) => Change::from_drift(drift::detect(desired, &actual)),
                Err(err) if err.is_not_found() => {
                    log::warn!("{label}: deleted outside catval, will be recreated");
                    Change::Create
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("Failed to read {label}"));
                }
            },
        };
        changes.push((label.to_string(), change));
    }

    for label in state.labels(target) {
        if !decls.contains(&label) {
            changes.push((label, Change::Delete));
        }
    }

    Ok(changes)
}

fn print_change(ctx: &Context, label: &str, change: &Change) {
    let symbol = match change {
        Change::Create => change.symbol().green(),
        Change::Delete => change.symbol().red(),
        Change::NoChange => change.symbol().dimmed(),
        Change::Update(_) | Change::Replace(_) => change.symbol().yellow(),
    };

    match change {
        Change::NoChange if ctx.verbose == 0 => {}
        Change::Update(fields) | Change::Replace(fields) => {
            println!("{symbol} {label}");
            for field in fields {
                ui::kv(field.field, &format!("{:?} -> {:?}", field.actual, field.desired));
            }
        }
        _ => println!("{symbol} {label}"),
    }
}
