//! Plain-text table on stdout.

use async_trait::async_trait;

use super::{format_number, Output};
use crate::error::Result;
use crate::stats::{DateRange, WorkBucketStats};

pub struct ConsoleOutput;

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

fn format_range(range: &DateRange) -> String {
    if range.is_empty() {
        "-".into()
    } else {
        format!("{} to {}", range.start.date_naive(), range.end.date_naive())
    }
}

fn row(name: &str, email: &str, country: &str, days: u32, points: f64, avg: f64) -> String {
    format!(
        "{:<24} {:<28} {:<7} {:>6} {:>8} {:>9}\n",
        truncate(name, 24),
        truncate(email, 28),
        country,
        days,
        format_number(points),
        format_number(avg),
    )
}

impl ConsoleOutput {
    pub fn render(stats: &WorkBucketStats) -> String {
        let mut out = String::new();
        out.push_str(&format!("Work bucket: {} ({})\n", stats.work_bucket.name, stats.work_bucket.id));
        out.push_str(&format!("Period:      {}\n", format_range(&stats.stats.date_range)));
        out.push_str(&format!("Tasks:       {}\n\n", stats.work_bucket.tasks.len()));

        out.push_str(&format!(
            "{:<24} {:<28} {:<7} {:>6} {:>8} {:>9}\n",
            "Name", "Email", "Country", "Days", "Points", "Pts/Day"
        ));
        for es in &stats.employee_stats {
            let e = &es.employee;
            out.push_str(&row(
                e.name.as_deref().unwrap_or("-"),
                &e.email,
                e.country.map(|c| c.iso_code()).unwrap_or("-"),
                es.stats.working_days,
                es.stats.points,
                es.stats.avg_points_per_working_days,
            ));
        }
        out.push_str(&row(
            "Total",
            "",
            "",
            stats.stats.working_days,
            stats.stats.points,
            stats.stats.avg_points_per_working_days,
        ));
        out
    }
}

#[async_trait]
impl Output for ConsoleOutput {
    async fn work_bucket_stats(&self, stats: &WorkBucketStats) -> Result<()> {
        print!("{}", Self::render(stats));
        Ok(())
    }
}
