pub mod capabilities;
pub mod discover;

use appscan_config::AppScanConfig;

use crate::cli::{Commands, GlobalFlags};

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: &Commands, config: &AppScanConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Discover(args) => discover::handle(args, config, flags),
        Commands::Capabilities => capabilities::handle(config, flags),
    }
}
