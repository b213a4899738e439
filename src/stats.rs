//! Statistics produced by the aggregator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::employee::Employee;
use crate::task::WorkBucket;

/// Period the statistics were computed over, both ends inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// The range left behind when no task timestamps were observed: start at
    /// the latest representable instant, end at the earliest.
    pub fn empty() -> Self {
        DateRange {
            start: DateTime::<Utc>::MAX_UTC,
            end: DateTime::<Utc>::MIN_UTC,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Figures shared by employee and work bucket statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub points: f64,
    pub working_days: u32,
    /// `points / working_days`. NaN or infinite when there were no working
    /// days; serialized as `null` in that case.
    pub avg_points_per_working_days: f64,
    pub date_range: DateRange,
}

impl Stats {
    pub fn new(points: f64, working_days: u32, date_range: DateRange) -> Self {
        Stats {
            points,
            working_days,
            avg_points_per_working_days: points / working_days as f64,
            date_range,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeStats {
    pub employee: Employee,
    #[serde(flatten)]
    pub stats: Stats,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkBucketStats {
    pub work_bucket: WorkBucket,
    #[serde(flatten)]
    pub stats: Stats,
    pub employee_stats: Vec<EmployeeStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_is_plain_division() {
        let s = Stats::new(12.0, 8, DateRange::empty());
        assert_eq!(s.avg_points_per_working_days, 1.5);
    }

    #[test]
    fn test_average_without_working_days_is_not_finite() {
        let s = Stats::new(5.0, 0, DateRange::empty());
        assert!(s.avg_points_per_working_days.is_infinite());

        let s = Stats::new(0.0, 0, DateRange::empty());
        assert!(s.avg_points_per_working_days.is_nan());
    }

    #[test]
    fn test_empty_range() {
        let r = DateRange::empty();
        assert!(r.is_empty());
        let now = Utc::now();
        assert!(!DateRange { start: now, end: now }.is_empty());
    }

    #[test]
    fn test_non_finite_average_serializes_as_null() {
        let s = Stats::new(0.0, 0, DateRange::empty());
        let v = serde_json::to_value(&s).unwrap();
        assert!(v["avg_points_per_working_days"].is_null());
    }
}
