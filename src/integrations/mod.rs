//! Collaborators the aggregator pulls data from.
//!
//! Each trait is one external concern. The aggregator only ever talks to
//! these traits; concrete clients live in the submodules.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::calendar::Holiday;
use crate::employee::Employee;
use crate::error::{Error, Result};
use crate::fields::Country;
use crate::task::WorkBucket;

pub mod bamboohr;
pub mod linear;
pub mod openholidays;

/// Resolves a work bucket identifier into tasks.
#[async_trait]
pub trait WorkSource: Send + Sync {
    /// Fails when `work_bucket_uri` is malformed or cannot be resolved.
    async fn get_work_bucket(
        &self,
        work_bucket_uri: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<WorkBucket>;
}

/// Annotates employees with their time off.
#[async_trait]
pub trait TimeOffSource: Send + Sync {
    /// Returns the given employees with `time_off` filled in where known.
    async fn get_employees_time_off(
        &self,
        employees: &[Employee],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Employee>>;
}

#[async_trait]
pub trait HolidaySource: Send + Sync {
    async fn get_holidays(&self, country: Country, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>>;
}

/// Canonical employee records, looked up by email.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Emails without a match are simply absent from the result.
    async fn get_employees_by_email(&self, emails: &[String]) -> Result<Vec<Employee>>;
}

/// Turn a non-success response into [`Error::Api`], keeping the body for the
/// error message.
pub(crate) async fn check_status(service: &'static str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Api {
        service,
        status: status.as_u16(),
        body,
    })
}

/// `YYYY-MM-DD`, the date format every HTTP API here expects.
pub(crate) fn format_api_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
