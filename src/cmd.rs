use std::sync::Arc;

use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::{info, info_span, warn, Instrument};

use crate::calendar::{parse_date_input, start_of_day};
use crate::config::Config;
use crate::effort::{AggregatorOptions, StatsAggregator};
use crate::email::SharedMatcher;
use crate::error::Result;
use crate::integrations::bamboohr::BambooHr;
use crate::integrations::linear::Linear;
use crate::integrations::openholidays::OpenHolidays;
use crate::output;

#[derive(Subcommand)]
pub enum Commands {
    /// Points, working days and points per working day for a work bucket.
    Stats {
        /// Linear work bucket: `team/<team>/cycle/<cycle>` or `team/<team>/project/<project>[/milestone/<milestone>]`.
        #[arg(long, visible_alias = "uri")]
        work_bucket_uri: String,
        /// First day of the period (YYYY-MM-DD, today, yesterday, sow, som, eom, 3d ago, 2w ago, 1m ago).
        #[arg(long)]
        start_date: Option<String>,
        /// Last day of the period (same formats as --start-date).
        #[arg(long)]
        end_date: Option<String>,
        /// Points counted for unestimated tasks in the bucket total.
        #[arg(long, default_value_t = 1.0)]
        bucket_unestimated_points: f64,
        /// Points credited to the assignee of an unestimated task.
        #[arg(long, default_value_t = 0.0)]
        employee_unestimated_points: f64,
    },
    /// Generate shell completions.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Wire the HTTP integrations into an aggregator.
pub fn build_aggregator(config: &Config) -> Result<StatsAggregator> {
    let matcher = SharedMatcher::from(config.email_matching);
    let bamboohr = Arc::new(BambooHr::new(
        &config.bamboohr_company_domain,
        config.bamboohr_api_key.clone(),
        matcher.clone(),
    )?);

    Ok(StatsAggregator::new(
        Arc::new(Linear::new(config.linear_api_key.clone())),
        bamboohr.clone(),
        Arc::new(OpenHolidays::new()),
        bamboohr,
        matcher,
    ))
}

/// Compute and print statistics for a work bucket.
pub async fn cmd_stats(
    config: &Config,
    work_bucket_uri: String,
    start_date: Option<String>,
    end_date: Option<String>,
    options: AggregatorOptions,
) -> Result<()> {
    let start = start_date
        .as_deref()
        .map(|s| parse_date_input(s, "startDate"))
        .transpose()?;
    let end = end_date
        .as_deref()
        .map(|s| parse_date_input(s, "endDate"))
        .transpose()?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            warn!(%start, %end, "start date is after end date; no working days will be counted");
        }
    }

    let aggregator = build_aggregator(config)?.with_options(options);
    let span = info_span!("stats", uri = %work_bucket_uri);
    let stats = aggregator
        .calculate_stats(&work_bucket_uri, start.map(start_of_day), end.map(start_of_day))
        .instrument(span)
        .await?;

    info!(
        points = stats.stats.points,
        working_days = stats.stats.working_days,
        employees = stats.employee_stats.len(),
        "work bucket statistics ready"
    );

    output::for_format(config.export, config.output_base_path.clone())
        .work_bucket_stats(&stats)
        .await
}

/// Generate shell completions for the specified shell.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
