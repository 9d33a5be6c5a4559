use serde::Deserialize;
use crate::errors::{AppError, AppResult};

// Fields are optional so that missing input becomes a BadRequest instead of an extractor rejection.

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsForm {
    pub fn into_credentials(self) -> AppResult<(String, String)> {
        let username = required(self.username, "username")?;
        let password = required(self.password, "password")?;
        Ok((username, password))
    }
}

#[derive(Debug, Deserialize)]
pub struct AddTaskForm {
    pub task: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TaskIdForm {
    pub task_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusForm {
    pub task_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditTaskForm {
    pub task_id: Option<String>,
    pub updated_task: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditTaskQuery {
    pub task_id: Option<String>,
}

/// Positional index of a task in the owner's list. A number too large to be
/// an index is reported the same way as any other out-of-range index.
pub fn parse_task_id(raw: Option<&str>) -> AppResult<usize> {
    let raw = raw.ok_or_else(|| AppError::BadRequest("task_id is required".into()))?;
    let digits = raw.trim();
    digits.parse().map_err(|_| {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            AppError::NotFound(format!("Task {} not found", digits))
        } else {
            AppError::BadRequest(format!("Invalid task_id: {}", raw))
        }
    })
}

pub fn required(value: Option<String>, field: &str) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::BadRequest(format!("{} is required", field))),
    }
}
