use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Find the application entry type, its modules and keeper fields.
    Discover(DiscoverArgs),
    /// Print the effective capability set and registry constructors.
    Capabilities,
}

#[derive(Clone, Debug, Args)]
pub struct DiscoverArgs {
    /// Project root to scan.
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Narrow the search to a directory or file under the root.
    #[arg(long)]
    pub hint: Option<PathBuf>,

    /// Abort after this many seconds (overrides `general.timeout_secs`).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}
