use parking_lot::Mutex;
use std::collections::HashMap;
use crate::config::{AuthConfig, StorageConfig};
use crate::errors::StoreResult;
use crate::models::{TaskDocument, UserDocument};
use super::JsonFile;

/// In-memory mirror of `users.json` and `tasks.json`.
#[derive(Debug, Default)]
pub(super) struct Documents {
    pub users: UserDocument,
    pub tasks: TaskDocument,
}

/// Owns every piece of mutable application state: accounts, task lists and
/// live sessions. Auth operations live in `auth.rs`, task operations in
/// `tasks.rs`.
pub struct Store {
    // users and tasks share a lock so registration updates both together
    pub(super) documents: Mutex<Documents>,
    // token -> username
    pub(super) sessions: Mutex<HashMap<String, String>>,
    // Held across a file write, always taken before `documents` and users
    // before tasks. Disk I/O happens on a snapshot with `documents` released,
    // and writes to one file land in the order their snapshots were taken.
    pub(super) users_write: Mutex<()>,
    pub(super) tasks_write: Mutex<()>,
    users_file: JsonFile,
    tasks_file: JsonFile,
    pub(super) auth: AuthConfig,
}

impl Store {
    pub fn open(storage: &StorageConfig, auth: &AuthConfig) -> Self {
        let users_file = JsonFile::new(&storage.users_file);
        let tasks_file = JsonFile::new(&storage.tasks_file);

        let users: UserDocument = users_file.load();
        let mut tasks: TaskDocument = tasks_file.load();

        for username in users.keys() {
            tasks.entry(username.clone()).or_default();
        }
        for username in tasks.keys().filter(|u| !users.contains_key(*u)) {
            tracing::warn!("Task list for unknown user {} kept as-is", username);
        }

        tracing::info!(
            "Loaded {} users from {} and {} task lists from {}",
            users.len(),
            users_file.path().display(),
            tasks.len(),
            tasks_file.path().display()
        );

        Self {
            documents: Mutex::new(Documents { users, tasks }),
            sessions: Mutex::new(HashMap::new()),
            users_write: Mutex::new(()),
            tasks_write: Mutex::new(()),
            users_file,
            tasks_file,
            auth: auth.clone(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.auth.session_cookie
    }

    pub(super) fn save_users(&self, users: &UserDocument) -> StoreResult<()> {
        self.users_file.save(users)
    }

    pub(super) fn save_tasks(&self, tasks: &TaskDocument) -> StoreResult<()> {
        self.tasks_file.save(tasks)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::models::{Task, User};
    use std::fs;

    #[test]
    fn open_gives_every_user_a_task_list() {
        let (tmp, _) = scratch_store();
        let mut users = UserDocument::new();
        users.insert("alice".into(), User { password_hash: "x".into() });
        JsonFile::new(tmp.path().join("users.json")).save(&users).unwrap();

        let store = reopen(&tmp);
        assert!(store.list("alice").is_empty());
        assert!(store.documents.lock().tasks.contains_key("alice"));
    }

    #[test]
    fn open_keeps_orphaned_task_lists() {
        let (tmp, _) = scratch_store();
        let mut tasks = TaskDocument::new();
        tasks.insert("ghost".into(), vec![Task::new("boo".into(), None)]);
        JsonFile::new(tmp.path().join("tasks.json")).save(&tasks).unwrap();

        let store = reopen(&tmp);
        assert_eq!(store.list("ghost").len(), 1);
    }

    #[test]
    fn corrupt_files_start_empty() {
        let (tmp, _) = scratch_store();
        fs::write(tmp.path().join("users.json"), "not json").unwrap();
        fs::write(tmp.path().join("tasks.json"), "{").unwrap();

        let store = reopen(&tmp);
        let documents = store.documents.lock();
        assert!(documents.users.is_empty());
        assert!(documents.tasks.is_empty());
    }
}
