use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "catval")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Reconcile declared category values with a management API", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create or update every declared category value
    Apply(ApplyArgs),

    /// Show what apply would change, without writing anything
    Plan(PlanArgs),

    /// Re-read managed category values into local state
    Refresh(RefreshArgs),

    /// Delete managed category values
    Destroy(DestroyArgs),

    /// Print local state
    Show(ShowArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Declaration file (default: <config dir>/category_values.toml)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Only act on this declaration label
    #[arg(short, long)]
    pub target: Option<String>,

    /// Delete managed values that are no longer declared
    #[arg(long)]
    pub prune: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Declaration file (default: <config dir>/category_values.toml)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Only act on this declaration label
    #[arg(short, long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct RefreshArgs {
    /// Only refresh this label
    #[arg(short, long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct DestroyArgs {
    /// Only destroy this label
    #[arg(short, long)]
    pub target: Option<String>,

    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Label to show (default: all)
    pub label: Option<String>,
}
