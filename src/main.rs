//! # emtoolkit - Engineering Management Toolkit
//!
//! A command-line tool that turns a Linear work bucket (a team cycle or a
//! project) into delivery statistics per engineer.
//!
//! ## Key Features
//!
//! - **Points per working day**: estimated points delivered, divided by the
//!   days each person was actually available
//! - **Working-day calendar**: weekends, BambooHR time off and public holidays
//!   of each employee's country are excluded
//! - **Identity matching**: the same person under different email domains is
//!   counted once (`--email-matching`)
//! - **Exports**: console table, JSON on stdout, or CSV files
//!
//! ## Quick Start
//!
//! ```bash
//! export LINEAR_APIKEY=lin_api_...
//! export BAMBOOHR_APIKEY=...
//! export BAMBOOHR_COMPANYDOMAIN=acme
//!
//! # Current cycle of the ENG team
//! emtoolkit stats --work-bucket-uri "team/ENG/cycle/Cycle 12"
//!
//! # A project over the last two weeks, written as CSV
//! emtoolkit --export csv --out-dir ./reports \
//!     stats --work-bucket-uri team/ENG/project/Billing --start-date "2w ago" --end-date today
//! ```
//!
//! Settings can also be placed in a `.env` file in the working directory.
//! Progress is logged to stderr; set `RUST_LOG` or pass `--verbose` for more.

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod calendar;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod effort;
pub mod email;
pub mod employee;
pub mod error;
pub mod fields;
pub mod integrations;
pub mod output;
pub mod progress;
pub mod stats;
pub mod task;

use cli::Cli;
use cmd::*;
use config::Config;
use effort::AggregatorOptions;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,emtoolkit={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn report_error(err: &dyn std::error::Error) -> ! {
    eprintln!("Error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.config.verbose);

    match cli.command {
        Commands::Completions { shell } => cmd_completions(shell),

        Commands::Stats {
            work_bucket_uri,
            start_date,
            end_date,
            bucket_unestimated_points,
            employee_unestimated_points,
        } => {
            let config = match Config::from_args(&cli.config) {
                Ok(config) => config,
                Err(e) => report_error(&e),
            };
            let options = AggregatorOptions {
                bucket_unestimated_points,
                employee_unestimated_points,
            };
            if let Err(e) = cmd_stats(&config, work_bucket_uri, start_date, end_date, options).await {
                report_error(&e);
            }
        }
    }
}
