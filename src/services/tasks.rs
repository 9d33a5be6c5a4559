use chrono::NaiveDate;
use crate::errors::{AppError, AppResult};
use crate::models::{Task, TaskDocument, TaskStatus};
use super::Store;

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

// Tasks are addressed by their position in the owner's list. Deleting shifts
// every later task down by one.
impl Store {
    pub fn list(&self, username: &str) -> Vec<Task> {
        self.documents
            .lock()
            .tasks
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    pub fn task(&self, username: &str, index: usize) -> AppResult<Task> {
        self.documents
            .lock()
            .tasks
            .get(username)
            .and_then(|tasks| tasks.get(index))
            .cloned()
            .ok_or_else(|| task_not_found(index))
    }

    pub fn add(&self, username: &str, text: &str, due_date: Option<&str>) -> AppResult<()> {
        if text.trim().is_empty() {
            return Err(AppError::BadRequest("Task text is required.".into()));
        }

        let due_date = match due_date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(date) => {
                NaiveDate::parse_from_str(date, DUE_DATE_FORMAT).map_err(|_| {
                    AppError::BadRequest(format!("Invalid due date: {}", date))
                })?;
                Some(date.to_string())
            }
            None => None,
        };

        self.mutate_tasks(|tasks| {
            tasks
                .entry(username.to_string())
                .or_default()
                .push(Task::new(text.to_string(), due_date));
            Ok(())
        })?;

        tracing::info!("Added task for user: {}", username);
        Ok(())
    }

    pub fn update_status(&self, username: &str, index: usize, status: TaskStatus) -> AppResult<()> {
        let label = status.to_string();
        self.mutate_tasks(|tasks| {
            task_mut(tasks, username, index)?.status = status;
            Ok(())
        })?;

        tracing::info!("Task {} of {} moved to {}", index, username, label);
        Ok(())
    }

    pub fn update_text(&self, username: &str, index: usize, text: &str) -> AppResult<()> {
        if text.trim().is_empty() {
            return Err(AppError::BadRequest("Task text is required.".into()));
        }

        self.mutate_tasks(|tasks| {
            task_mut(tasks, username, index)?.text = text.to_string();
            Ok(())
        })?;

        tracing::info!("Edited task {} of {}", index, username);
        Ok(())
    }

    pub fn delete(&self, username: &str, index: usize) -> AppResult<Task> {
        let removed = self.mutate_tasks(|tasks| {
            let list = tasks
                .get_mut(username)
                .filter(|list| index < list.len())
                .ok_or_else(|| task_not_found(index))?;
            Ok(list.remove(index))
        })?;

        tracing::info!("Deleted task {} of {}", index, username);
        Ok(removed)
    }

    // Applies `change` under the documents lock, then writes a snapshot with
    // that lock released. Nothing is written when `change` fails.
    fn mutate_tasks<T>(
        &self,
        change: impl FnOnce(&mut TaskDocument) -> AppResult<T>,
    ) -> AppResult<T> {
        let _tasks_write = self.tasks_write.lock();
        let (outcome, snapshot) = {
            let mut documents = self.documents.lock();
            let outcome = change(&mut documents.tasks)?;
            (outcome, documents.tasks.clone())
        };

        self.save_tasks(&snapshot)?;
        Ok(outcome)
    }
}

fn task_mut<'a>(
    tasks: &'a mut TaskDocument,
    username: &str,
    index: usize,
) -> AppResult<&'a mut Task> {
    tasks
        .get_mut(username)
        .and_then(|list| list.get_mut(index))
        .ok_or_else(|| task_not_found(index))
}

fn task_not_found(index: usize) -> AppError {
    AppError::NotFound(format!("Task {} not found", index))
}
