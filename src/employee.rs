//! Employee records as assembled from the work source, the directory and the
//! time-off source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::Country;
use crate::task::Task;

/// A person involved in a work bucket.
///
/// `id` means different things depending on which source last touched the
/// record; `email` is the cross-source join key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub country: Option<Country>,
    #[serde(default)]
    pub time_off: Vec<TimeOff>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
}

impl Employee {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Employee {
            id: id.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// True if any time-off entry falls on `day`.
    pub fn is_off_on(&self, day: NaiveDate) -> bool {
        self.time_off.iter().any(|t| t.date == day && t.quantity > 0.0)
    }
}

/// A day (or fraction of one) an employee was away.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeOff {
    pub date: NaiveDate,
    /// Fraction of the day; usually 1.0 or 0.5.
    pub quantity: f64,
}
