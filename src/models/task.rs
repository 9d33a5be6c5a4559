use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Progress of a task. Persisted as a free-form string; values outside the
/// three known states survive a load/save cycle unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
    Other(String),
}

impl TaskStatus {
    /// The states offered by the status selector, in display order.
    pub const CHOICES: [TaskStatus; 3] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Other(raw) => raw,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "not started" => TaskStatus::NotStarted,
            "in progress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            _ => TaskStatus::Other(raw),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(raw: &str) -> Self {
        TaskStatus::from(raw.to_string())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub text: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl Task {
    pub fn new(text: String, due_date: Option<String>) -> Self {
        Self {
            text,
            status: TaskStatus::NotStarted,
            due_date,
        }
    }

    /// Due date, treating the empty string older files contain as absent.
    pub fn due_date(&self) -> Option<&str> {
        self.due_date.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// Contents of `tasks.json`: username -> tasks in insertion order.
pub type TaskDocument = BTreeMap<String, Vec<Task>>;

/// Counts shown at the top of the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
}

impl TaskSummary {
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            total: tasks.len(),
            completed: tasks.iter().filter(|t| t.status.is_completed()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_lenient_about_case() {
        assert_eq!(TaskStatus::from("Not started"), TaskStatus::NotStarted);
        assert_eq!(TaskStatus::from(" completed "), TaskStatus::Completed);
        assert_eq!(TaskStatus::from("In Progress"), TaskStatus::InProgress);
        assert_eq!(
            TaskStatus::from("Blocked"),
            TaskStatus::Other("Blocked".into())
        );
    }

    #[test]
    fn task_serializes_with_original_field_names() {
        let task = Task::new("Buy milk".into(), Some("2024-01-01".into()));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "Buy milk", "status": "Not Started", "due_date": "2024-01-01"})
        );

        let undated = serde_json::to_value(Task::new("Call mum".into(), None)).unwrap();
        assert!(undated.get("due_date").is_none());
    }

    #[test]
    fn unknown_status_survives_a_round_trip() {
        let task: Task =
            serde_json::from_str(r#"{"text": "x", "status": "Blocked", "due_date": ""}"#).unwrap();
        assert_eq!(task.status, TaskStatus::Other("Blocked".into()));
        assert_eq!(task.due_date(), None);
        assert_eq!(serde_json::to_value(&task).unwrap()["status"], "Blocked");
    }

    #[test]
    fn summary_counts_completed_status() {
        let mut done = Task::new("a".into(), None);
        done.status = TaskStatus::Completed;
        let tasks = vec![done, Task::new("b".into(), None), Task::new("c".into(), None)];
        assert_eq!(TaskSummary::of(&tasks), TaskSummary { total: 3, completed: 1 });
    }
}
