//! Task and work bucket data structures.
//!
//! A `WorkBucket` is the unit of analysis (a cycle, a project, a milestone or
//! any ad-hoc set of issues) and owns the `Task`s the work source returned
//! for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::employee::Employee;

/// A unit of work as reported by the work source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Points. `None` when the task was never estimated.
    pub estimation: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub done_at: Option<DateTime<Utc>>,
    /// Assignee as known by the work source; joined to other sources by email.
    pub assigned_to: Option<Employee>,
}

impl Task {
    /// Points this task contributes, with `default` standing in for a
    /// missing estimation.
    pub fn points_or(&self, default: f64) -> f64 {
        self.estimation.unwrap_or(default)
    }
}

/// A named, bounded set of tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkBucket {
    pub id: String,
    pub name: String,
    pub tasks: Vec<Task>,
}

impl WorkBucket {
    /// Sum of every task's points, `no_estimation` standing in for tasks
    /// without an estimate.
    pub fn points(&self, no_estimation: f64) -> f64 {
        self.tasks.iter().map(|t| t.points_or(no_estimation)).sum()
    }
}
