use std::fmt;

use serde::{Serialize, Serializer};

use crate::model::task::Task;

/// Completion counts for a task list
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Percentage of completed tasks, rounded to one decimal; 0 when empty.
    /// Serialized as the one-decimal string, e.g. `"33.3"`.
    #[serde(serialize_with = "serialize_rate")]
    pub completion_rate: f64,
}

fn serialize_rate<S: Serializer>(rate: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{:.1}", rate))
}

impl Statistics {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.is_complete()).count();
        let completion_rate = if total == 0 {
            0.0
        } else {
            (completed as f64 / total as f64 * 1000.0).round() / 10.0
        };
        Statistics {
            total,
            completed,
            pending: total - completed,
            completion_rate,
        }
    }

    /// Rate as displayed, e.g. "33.3"
    pub fn rate_label(&self) -> String {
        format!("{:.1}", self.completion_rate)
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} total, {} done, {} pending ({}%)",
            self.total,
            self.completed,
            self.pending,
            self.rate_label()
        )
    }
}
