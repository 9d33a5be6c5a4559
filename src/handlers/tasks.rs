use axum::{
    extract::{Extension, Form, State},
    response::{IntoResponse, Response, Redirect},
};
use crate::errors::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{
    parse_task_id, required, AddTaskForm, EditTaskForm, TaskIdForm, TaskStatus, UpdateStatusForm,
};
use crate::state::AppState;
use super::run_blocking;

// Every mutation answers 303 back to the task list.

pub async fn add_task(
    State(state): State<AppState>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
    Form(form): Form<AddTaskForm>,
) -> AppResult<Response> {
    let text = required(form.task, "task")?;
    let store = state.store.clone();
    run_blocking(move || store.add(&username, &text, form.due_date.as_deref())).await?;
    Ok(Redirect::to("/tasks").into_response())
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
    Form(form): Form<TaskIdForm>,
) -> AppResult<Response> {
    let index = parse_task_id(form.task_id.as_deref())?;
    let store = state.store.clone();
    run_blocking(move || store.delete(&username, index).map(|_| ())).await?;
    Ok(Redirect::to("/tasks").into_response())
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
    Form(form): Form<UpdateStatusForm>,
) -> AppResult<Response> {
    let index = parse_task_id(form.task_id.as_deref())?;
    let status = TaskStatus::from(required(form.status, "status")?);
    let store = state.store.clone();
    run_blocking(move || store.update_status(&username, index, status)).await?;
    Ok(Redirect::to("/tasks").into_response())
}

pub async fn edit_task(
    State(state): State<AppState>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
    Form(form): Form<EditTaskForm>,
) -> AppResult<Response> {
    let index = parse_task_id(form.task_id.as_deref())?;
    let text = form.updated_task.unwrap_or_default();
    let store = state.store.clone();
    run_blocking(move || store.update_text(&username, index, &text)).await?;
    Ok(Redirect::to("/tasks").into_response())
}
