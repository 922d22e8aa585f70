//! Sprint health: completion metric over a sprint's issues.

use serde::{Deserialize, Serialize};

const DONE_STATUSES: [&str; 3] = ["done", "closed", "resolved"];
const IN_PROGRESS_STATUSES: [&str; 2] = ["in progress", "review"];

/// Bucket an issue status falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Done,
    InProgress,
    ToDo,
}

impl StatusCategory {
    /// Case-insensitive membership test against the fixed keyword sets.
    /// Anything unrecognized counts as to-do.
    pub fn classify(status: &str) -> Self {
        let status = status.to_lowercase();
        if DONE_STATUSES.contains(&status.as_str()) {
            StatusCategory::Done
        } else if IN_PROGRESS_STATUSES.contains(&status.as_str()) {
            StatusCategory::InProgress
        } else {
            StatusCategory::ToDo
        }
    }
}

/// Aggregated status counts for one sprint.
///
/// Only constructible from a non-empty issue set, so the percentage is
/// always well defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintHealth {
    pub sprint_name: String,
    pub done: usize,
    pub in_progress: usize,
    pub to_do: usize,
    pub total: usize,
    /// `done / total * 100`, rounded to one decimal place
    pub completion_pct: f64,
}

impl SprintHealth {
    /// Compute health from issue status names.
    ///
    /// Returns `None` for an empty sprint; no division happens in that case.
    pub fn from_statuses<I, S>(sprint_name: impl Into<String>, statuses: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut done = 0;
        let mut in_progress = 0;
        let mut total = 0;
        for status in statuses {
            total += 1;
            match StatusCategory::classify(status.as_ref()) {
                StatusCategory::Done => done += 1,
                StatusCategory::InProgress => in_progress += 1,
                StatusCategory::ToDo => {}
            }
        }

        if total == 0 {
            return None;
        }

        let completion_pct = round_one_decimal(done as f64 / total as f64 * 100.0);

        Some(Self {
            sprint_name: sprint_name.into(),
            done,
            in_progress,
            to_do: total - (done + in_progress),
            total,
            completion_pct,
        })
    }

    /// Fixed-format textual report
    pub fn report(&self) -> String {
        format!(
            "Health Report for {}\n\
             - Completion: {:.1}%\n\
             - Done: {}\n\
             - In Progress: {}\n\
             - To Do: {}\n\
             - Total Issues: {}",
            self.sprint_name, self.completion_pct, self.done, self.in_progress, self.to_do, self.total
        )
    }
}

/// Round to one decimal place, ties to even on the exact binary value.
///
/// Float formatting is correctly rounded, so `6.25` gives `6.2` and `18.75`
/// gives `18.8`.
fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Message reported for a sprint without issues
pub fn empty_sprint_message(sprint_name: &str) -> String {
    format!("Sprint '{}' is empty.", sprint_name)
}
