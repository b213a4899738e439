//! Runtime configuration.
//!
//! Every setting can come from a command line flag or from an environment
//! variable (a `.env` file in the working directory is loaded first).

use std::path::PathBuf;

use clap::Args;

use crate::error::{Error, Result};
use crate::fields::{EmailMatching, ExportFormat};

/// Global options shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Linear personal API key.
    #[arg(long, global = true, env = "LINEAR_APIKEY", hide_env_values = true)]
    pub linear_api_key: Option<String>,

    /// BambooHR API key.
    #[arg(long = "bamboohr-api-key", global = true, env = "BAMBOOHR_APIKEY", hide_env_values = true)]
    pub bamboohr_api_key: Option<String>,

    /// BambooHR company subdomain (`<company>.bamboohr.com`).
    #[arg(long = "bamboohr-company-domain", global = true, env = "BAMBOOHR_COMPANYDOMAIN")]
    pub bamboohr_company_domain: Option<String>,

    /// Base directory for file exports (default: current directory).
    #[arg(long, global = true, env = "OUTPUT_BASEPATH")]
    pub out_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = ExportFormat::Console)]
    pub export: ExportFormat,

    /// How emails from different systems are matched to one person.
    #[arg(long, global = true, value_enum, default_value_t = EmailMatching::IgnoreDomain)]
    pub email_matching: EmailMatching,

    /// Log debug output, including every integration request.
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Validated configuration for a statistics run.
#[derive(Debug, Clone)]
pub struct Config {
    pub linear_api_key: String,
    pub bamboohr_api_key: String,
    pub bamboohr_company_domain: String,
    pub output_base_path: PathBuf,
    pub export: ExportFormat,
    pub email_matching: EmailMatching,
}

fn required(value: &Option<String>, flag: &str, env: &str) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or_else(|| Error::invalid_input(format!("Missing configuration: pass --{flag} or set {env}")))
}

impl Config {
    pub fn from_args(args: &ConfigArgs) -> Result<Self> {
        let output_base_path = match &args.out_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        Ok(Config {
            linear_api_key: required(&args.linear_api_key, "linear-api-key", "LINEAR_APIKEY")?,
            bamboohr_api_key: required(&args.bamboohr_api_key, "bamboohr-api-key", "BAMBOOHR_APIKEY")?,
            bamboohr_company_domain: required(
                &args.bamboohr_company_domain,
                "bamboohr-company-domain",
                "BAMBOOHR_COMPANYDOMAIN",
            )?,
            output_base_path,
            export: args.export,
            email_matching: args.email_matching,
        })
    }
}
