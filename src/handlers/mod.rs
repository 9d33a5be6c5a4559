mod auth;
mod tasks;
mod dashboard;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use crate::errors::{AppError, AppResult};

pub use auth::{serve_login_page, serve_register_page, handle_login, handle_register};
pub use tasks::{add_task, delete_task, update_status, edit_task};
pub use dashboard::{serve_task_list, serve_edit_page};

/// 302 to the login page, used for unauthenticated requests and unknown routes.
pub async fn redirect_to_login() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/login")]).into_response()
}

// Runs blocking work (bcrypt, file writes) off the async executor.
async fn run_blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
}
