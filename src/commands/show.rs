use anyhow::{Result, bail};
use reconcile::LocalState;

use crate::Context;
use crate::cli::ShowArgs;
use crate::state::CatvalState;
use crate::ui;

pub fn run(ctx: &Context, args: ShowArgs) -> Result<()> {
    let state = CatvalState::load_from(&CatvalState::default_path()?)?;

    if let Some(label) = args.label.as_deref() {
        let Some(entry) = state.get(label) else {
            bail!("'{label}' is not managed by catval");
        };
        print_entry(ctx, label, entry);
        return Ok(());
    }

    if state.resources.is_empty() {
        ui::info("No managed category values");
        return Ok(());
    }

    for (label, entry) in &state.resources {
        print_entry(ctx, label, entry);
    }
    if ctx.verbose > 0 {
        ui::dim(&format!("last updated {}", state.last_updated.to_rfc3339()));
    }
    Ok(())
}

fn print_entry(ctx: &Context, label: &str, entry: &LocalState) {
    ui::header(label);
    ui::kv("id", entry.id.as_str());
    ui::kv("name", &entry.name);
    ui::kv("value", &entry.value);
    if !entry.description.is_empty() || ctx.verbose > 0 {
        ui::kv("description", &entry.description);
    }
    if ctx.verbose > 0 {
        ui::kv("api_version", &entry.api_version);
        ui::kv("system_defined", &entry.system_defined.to_string());
    }
}
