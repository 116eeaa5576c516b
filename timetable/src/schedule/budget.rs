use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing hour totals, which are multiples of 1/45.
pub const HOUR_EPSILON: f64 = 1e-9;

/// Remaining teaching hours per subject for one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourBudget {
    remaining: HashMap<String, f64>,
}

impl HourBudget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a subject's requirement, replacing whatever was left.
    pub fn set(&mut self, subject: &str, hours: f64) {
        self.remaining.insert(subject.to_string(), hours);
    }

    /// Remaining hours for a subject, 0 when the subject is unknown.
    pub fn remaining(&self, subject: &str) -> f64 {
        self.remaining.get(subject).copied().unwrap_or(0.0)
    }

    /// Marks the subject as fully scheduled.
    pub fn exhaust(&mut self, subject: &str) {
        self.remaining.insert(subject.to_string(), 0.0);
    }

    /// Returns hours to a subject, e.g. after its placement is deleted.
    pub fn refund(&mut self, subject: &str, hours: f64) {
        *self.remaining.entry(subject.to_string()).or_insert(0.0) += hours;
    }

    /// Subjects sorted by name with their remaining hours.
    pub fn entries(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .remaining
            .iter()
            .map(|(subject, hours)| (subject.as_str(), *hours))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl FromIterator<(String, f64)> for HourBudget {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        HourBudget {
            remaining: iter.into_iter().collect(),
        }
    }
}
