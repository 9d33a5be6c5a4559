use axum_extra::extract::cookie::Cookie;
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};
use crate::errors::{AppError, AppResult};
use crate::models::User;
use super::Store;

/// Outcome of checking a password against a stored hash.
#[derive(Debug, PartialEq, Eq)]
enum Verified {
    Rejected,
    Accepted,
    // matched an unsalted SHA-256 digest; the caller should re-hash
    AcceptedLegacy,
}

impl Store {
    /// Creates an account with an empty task list.
    pub fn register(&self, username: &str, password: &str) -> AppResult<()> {
        if self.documents.lock().users.contains_key(username) {
            return Err(AppError::Conflict(username.to_string()));
        }

        // bcrypt is slow, so hash before taking the lock and re-check after.
        let password_hash = bcrypt::hash(password, self.auth.bcrypt_cost)?;

        let _users_write = self.users_write.lock();
        let _tasks_write = self.tasks_write.lock();
        let (users, tasks) = {
            let mut documents = self.documents.lock();
            if documents.users.contains_key(username) {
                return Err(AppError::Conflict(username.to_string()));
            }
            documents
                .users
                .insert(username.to_string(), User { password_hash });
            documents.tasks.insert(username.to_string(), Vec::new());
            (documents.users.clone(), documents.tasks.clone())
        };

        self.save_users(&users)?;
        self.save_tasks(&tasks)?;

        tracing::info!("Registered user: {}", username);
        Ok(())
    }

    /// Checks credentials and opens a session, returning its token.
    pub fn login(&self, username: &str, password: &str) -> AppResult<String> {
        let stored = self
            .documents
            .lock()
            .users
            .get(username)
            .map(|user| user.password_hash.clone());

        let Some(stored) = stored else {
            tracing::info!("Login for unknown user: {}", username);
            return Err(AppError::Unauthorized);
        };

        match verify_password(password, &stored) {
            Verified::Rejected => {
                tracing::info!("Invalid password for user: {}", username);
                return Err(AppError::Unauthorized);
            }
            Verified::AcceptedLegacy => self.upgrade_hash(username, password)?,
            Verified::Accepted => {}
        }

        let token = self.new_token();
        self.sessions
            .lock()
            .insert(token.clone(), username.to_string());

        tracing::info!("Opened session for user: {}", username);
        Ok(token)
    }

    /// Finds the user behind the session cookie in a raw `Cookie` header.
    pub fn resolve_session(&self, cookie_header: Option<&str>) -> Option<String> {
        let header = cookie_header?;
        let token = Cookie::split_parse(header)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == self.cookie_name())?;

        self.sessions.lock().get(token.value()).cloned()
    }

    fn new_token(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.auth.token_length)
            .map(char::from)
            .collect()
    }

    fn upgrade_hash(&self, username: &str, password: &str) -> AppResult<()> {
        let password_hash = bcrypt::hash(password, self.auth.bcrypt_cost)?;

        let _users_write = self.users_write.lock();
        let users = {
            let mut documents = self.documents.lock();
            match documents.users.get_mut(username) {
                Some(user) => user.password_hash = password_hash,
                None => return Ok(()),
            }
            documents.users.clone()
        };

        self.save_users(&users)?;
        tracing::info!("Upgraded legacy password hash for user: {}", username);
        Ok(())
    }
}

// A corrupt stored hash fails the login rather than the request.
fn verify_password(password: &str, stored: &str) -> Verified {
    if stored.starts_with("$2") {
        return match bcrypt::verify(password, stored) {
            Ok(true) => Verified::Accepted,
            Ok(false) => Verified::Rejected,
            Err(e) => {
                tracing::warn!("Stored password hash is unusable: {}", e);
                Verified::Rejected
            }
        };
    }

    if stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit()) {
        let digest = hex::encode(Sha256::digest(password.as_bytes()));
        if constant_time_eq(digest.as_bytes(), stored.to_ascii_lowercase().as_bytes()) {
            return Verified::AcceptedLegacy;
        }
    }

    Verified::Rejected
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
