use clap::Parser;

use crate::cmd::Commands;
use crate::config::ConfigArgs;

/// Delivery statistics for engineering teams.
/// Combines Linear issues, BambooHR time off and public holidays.
#[derive(Parser)]
#[command(name = "emtoolkit", version, about = "Engineering management toolkit")]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}
