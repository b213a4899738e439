//! CSV export.
//!
//! A work bucket becomes a folder `<base>/csv/<work bucket id>/` holding
//! `employees.csv` and `tasks.csv`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use super::Output;
use crate::employee::Employee;
use crate::error::Result;
use crate::progress::activity;
use crate::stats::{EmployeeStats, WorkBucketStats};
use crate::task::Task;

const EMPLOYEES_HEADER: &str =
    "ID,Name,Email,Country,Start Date,End Date,Working Days,Points,AvgPointsPerWorkingDays";
const TASKS_HEADER: &str = "ID,Title,Email,Estimate,CreatedAt,StartedAt,DoneAt";

/// Quote fields that contain separators, quotes or newlines.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn timestamp(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.to_rfc3339()).unwrap_or_default()
}

fn number(n: f64) -> String {
    n.to_string()
}

/// `employees.csv` contents.
pub fn employees_csv(employee_stats: &[EmployeeStats]) -> String {
    let mut csv = String::new();
    csv.push_str(EMPLOYEES_HEADER);
    csv.push('\n');

    for es in employee_stats {
        let e = &es.employee;
        let fields = [
            e.id.clone(),
            e.name.clone().unwrap_or_default(),
            e.email.clone(),
            e.country.map(|c| c.iso_code().to_string()).unwrap_or_default(),
            timestamp(Some(es.stats.date_range.start)),
            timestamp(Some(es.stats.date_range.end)),
            es.stats.working_days.to_string(),
            number(es.stats.points),
            number(es.stats.avg_points_per_working_days),
        ];
        push_row(&mut csv, &fields);
    }
    csv
}

/// `tasks.csv` contents.
pub fn tasks_csv(tasks: &[Task]) -> String {
    let mut csv = String::new();
    csv.push_str(TASKS_HEADER);
    csv.push('\n');

    for t in tasks {
        let fields = [
            t.id.clone(),
            t.title.clone(),
            t.assigned_to.as_ref().map(|e: &Employee| e.email.clone()).unwrap_or_default(),
            t.estimation.map(number).unwrap_or_default(),
            timestamp(Some(t.created_at)),
            timestamp(t.started_at),
            timestamp(t.done_at),
        ];
        push_row(&mut csv, &fields);
    }
    csv
}

fn push_row(csv: &mut String, fields: &[String]) {
    let row: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
    csv.push_str(&row.join(","));
    csv.push('\n');
}

pub struct CsvOutput {
    folder: PathBuf,
}

impl CsvOutput {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        CsvOutput {
            folder: base_path.as_ref().join("csv"),
        }
    }

    pub fn destination(&self, stats: &WorkBucketStats) -> PathBuf {
        self.folder.join(&stats.work_bucket.id)
    }
}

#[async_trait]
impl Output for CsvOutput {
    async fn work_bucket_stats(&self, stats: &WorkBucketStats) -> Result<()> {
        let destination = self.destination(stats);

        activity(
            &format!("Ensuring folder '{}' exists to store CSVs", destination.display()),
            tokio::fs::create_dir_all(&destination),
        )
        .await?;

        let employees = employees_csv(&stats.employee_stats);
        let tasks = tasks_csv(&stats.work_bucket.tasks);
        let employees_path = destination.join("employees.csv");
        let tasks_path = destination.join("tasks.csv");

        tokio::try_join!(
            activity("Writing employee stats", tokio::fs::write(&employees_path, employees)),
            activity("Writing tasks", tokio::fs::write(&tasks_path, tasks)),
        )?;

        info!(folder = %destination.display(), "exported work bucket statistics");
        Ok(())
    }
}
