use std::fs;
use std::path::PathBuf;
use crate::errors::{AppError, AppResult};
use crate::models::{Task, TaskSummary};

// Placeholders understood by tasks.html
const TASK_LIST: &str = "{TASK_LIST}";
const TOTAL_TASKS: &str = "{TOTAL_TASKS}";
const COMPLETED_TASKS: &str = "{COMPLETED_TASKS}";

// Placeholders understood by edit-task.html
const TASK_ID: &str = "{{ task_id }}";
const TASK_TEXT: &str = "{{ task }}";
const TASK_STATUS: &str = "{{ task_status }}";

/// Reads page templates from disk on every request and fills in their
/// named substitution points.
#[derive(Debug, Clone)]
pub struct Templates {
    dir: PathBuf,
}

impl Templates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read(&self, name: &str) -> AppResult<String> {
        let path = self.dir.join(name);
        fs::read_to_string(&path).map_err(|e| {
            tracing::error!("Failed to read template {}: {}", path.display(), e);
            AppError::File(e)
        })
    }

    pub fn login_page(&self) -> AppResult<String> {
        self.read("login.html")
    }

    pub fn registration_page(&self) -> AppResult<String> {
        self.read("registration.html")
    }

    /// `task_items` is pre-rendered markup. It is substituted last so text
    /// inside it is never mistaken for a placeholder.
    pub fn task_list_page(&self, task_items: &str, summary: TaskSummary) -> AppResult<String> {
        Ok(self
            .read("tasks.html")?
            .replace(TOTAL_TASKS, &summary.total.to_string())
            .replace(COMPLETED_TASKS, &summary.completed.to_string())
            .replace(TASK_LIST, task_items))
    }

    pub fn edit_task_page(&self, index: usize, task: &Task) -> AppResult<String> {
        Ok(self
            .read("edit-task.html")?
            .replace(TASK_ID, &index.to_string())
            .replace(TASK_STATUS, &escape_html(task.status.as_str()))
            .replace(TASK_TEXT, &escape_html(&task.text)))
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
