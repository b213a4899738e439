//! Rendering of computed statistics.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::fields::ExportFormat;
use crate::stats::WorkBucketStats;

pub mod console;
pub mod csv;

pub use self::console::ConsoleOutput;
pub use self::csv::CsvOutput;

/// A destination for work bucket statistics.
#[async_trait]
pub trait Output: Send + Sync {
    async fn work_bucket_stats(&self, stats: &WorkBucketStats) -> Result<()>;
}

/// Pretty JSON on stdout.
pub struct JsonOutput;

impl JsonOutput {
    pub fn render(stats: &WorkBucketStats) -> Result<String> {
        Ok(serde_json::to_string_pretty(stats)?)
    }
}

#[async_trait]
impl Output for JsonOutput {
    async fn work_bucket_stats(&self, stats: &WorkBucketStats) -> Result<()> {
        println!("{}", Self::render(stats)?);
        Ok(())
    }
}

/// Build the output for `format`. `base_path` only matters for CSV.
pub fn for_format(format: ExportFormat, base_path: PathBuf) -> Box<dyn Output> {
    match format {
        ExportFormat::Console => Box::new(ConsoleOutput),
        ExportFormat::Csv => Box::new(CsvOutput::new(base_path)),
        ExportFormat::Json => Box::new(JsonOutput),
    }
}

/// Number formatting shared by the text outputs: integers without a
/// fractional part, everything else with two decimals.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{}", n as i64)
    } else if n.is_finite() {
        format!("{n:.2}")
    } else {
        "-".into()
    }
}
