//! Calendar arithmetic: working days, holidays and date input parsing.
//!
//! Every comparison here happens on UTC calendar dates (`NaiveDate` taken
//! from a `DateTime<Utc>`), never on local-time day boundaries.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::employee::Employee;
use crate::error::{Error, Result};
use crate::fields::Country;

/// A public holiday observed in one country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holiday {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Usually in the country's own language.
    pub name: String,
    pub country: Country,
}

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Iterate every calendar day in `[start, end]`. Empty when `start > end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Count the days in `[start, end]` the employee was expected to work.
///
/// A day counts unless it is a Saturday or Sunday, the start date of one of
/// `country_holidays`, or covered by one of the employee's time-off entries.
/// Half-day time off still removes the whole day.
pub fn working_days(
    employee: &Employee,
    country_holidays: &[Holiday],
    start: NaiveDate,
    end: NaiveDate,
) -> u32 {
    let mut count = 0;
    for day in days_between(start, end) {
        if is_weekend(day) {
            continue;
        }
        if country_holidays.iter().any(|h| h.start_date == day) {
            continue;
        }
        if employee.is_off_on(day) {
            continue;
        }
        count += 1;
    }
    count
}

/// UTC midnight of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Calculate the start and end dates of the ISO week (Monday to Sunday)
/// containing `today`.
pub fn start_end_of_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    let end = start + Duration::days(6);
    (start, end)
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    Some(NaiveDate::from_ymd_opt(year, month, 1)? - Duration::days(1))
}

/// Parse human-readable date input relative to `today`.
///
/// Supports:
/// - "today", "yesterday"
/// - "start of week" / "sow", "start of month" / "som", "end of month" / "eom"
/// - "3d ago", "2w ago", "1m ago" (a month is 30 days)
/// - "YYYY-MM-DD"
pub fn parse_date_relative(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "yesterday" => return Some(today - Duration::days(1)),
        "start of week" | "sow" => return Some(start_end_of_week(today).0),
        "start of month" | "som" => return first_of_month(today),
        "end of month" | "eom" => return last_of_month(today),
        _ => {}
    }

    if let Some(rest) = s.strip_suffix(" ago") {
        let rest = rest.trim();
        let (amount, days_per_unit) = if let Some(n) = rest.strip_suffix('d') {
            (n, 1)
        } else if let Some(n) = rest.strip_suffix('w') {
            (n, 7)
        } else if let Some(n) = rest.strip_suffix('m') {
            (n, 30)
        } else {
            return None;
        };
        let amount = amount.trim().parse::<i64>().ok()?;
        let days = Duration::try_days(amount.checked_mul(days_per_unit)?)?;
        return today.checked_sub_signed(days);
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Parse a command line date, relative to the current UTC date.
/// `what` names the argument in the error message.
pub fn parse_date_input(s: &str, what: &str) -> Result<NaiveDate> {
    parse_date_relative(s, Utc::now().date_naive())
        .ok_or_else(|| Error::invalid_input(format!("Invalid '{what}' format: '{s}'")))
}
