use axum::{
    extract::{Extension, Query, State},
    response::{Html, IntoResponse, Response},
};
use chrono::{Datelike, NaiveDate};
use crate::errors::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{parse_task_id, EditTaskQuery, Task, TaskStatus, TaskSummary};
use crate::services::{escape_html, DUE_DATE_FORMAT};
use crate::state::AppState;
use super::redirect_to_login;

pub async fn serve_task_list(
    State(state): State<AppState>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
) -> AppResult<Response> {
    let tasks = state.store.list(&username);
    let summary = TaskSummary::of(&tasks);
    tracing::debug!(
        "Rendering {} tasks ({} completed) for {}",
        summary.total,
        summary.completed,
        username
    );

    let items = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| render_task_item(index, task))
        .collect::<Vec<_>>()
        .join("\n");

    let html = state.templates.task_list_page(&items, summary)?;
    Ok(Html(html).into_response())
}

pub async fn serve_edit_page(
    State(state): State<AppState>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
    Query(query): Query<EditTaskQuery>,
) -> AppResult<Response> {
    // Without a task_id this route behaves like an unknown one.
    if query.task_id.is_none() {
        return Ok(redirect_to_login().await);
    }

    let index = parse_task_id(query.task_id.as_deref())?;
    let task = state.store.task(&username, index)?;

    let html = state.templates.edit_task_page(index, &task)?;
    Ok(Html(html).into_response())
}

fn render_due_date(task: &Task) -> String {
    let parsed = task
        .due_date()
        .and_then(|raw| NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT).ok());

    match parsed {
        Some(date) => format!(
            r#"<div class="date-block">
                    <p class="day">{}</p>
                    <p class="month_name">{}</p>
                </div>
                <p class="year">{}</p>"#,
            date.day(),
            date.format("%b"),
            date.year()
        ),
        None => r#"<p class="day">No due date</p>
                <p class="month_name"></p>
                <p class="year"></p>"#
            .to_string(),
    }
}

fn render_status_options(current: &TaskStatus) -> String {
    TaskStatus::CHOICES
        .iter()
        .map(|status| {
            format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                status,
                if status == current { " selected" } else { "" }
            )
        })
        .collect()
}

fn render_task_item(index: usize, task: &Task) -> String {
    let style = if task.status.is_completed() {
        "text-decoration: line-through; color: #32be8f; font-weight: 500;"
    } else {
        ""
    };

    format!(
        r#"<li class="task-item">
            <div class="task-date">
                {due}
            </div>
            <p class="task" style="{style}">{text}</p>
            <div class="buttons">
                <form method="GET" action="/edit-task">
                    <input type="hidden" name="task_id" value="{index}">
                    <button type="submit" class="edit">Edit</button>
                </form>
                <form method="POST" action="/delete-task">
                    <input type="hidden" name="task_id" value="{index}">
                    <button type="submit" class="delete">Delete</button>
                </form>
                <form method="POST" action="/update-status">
                    <input type="hidden" name="task_id" value="{index}">
                    <select name="status" onchange="this.form.submit()">{options}</select>
                </form>
            </div>
        </li>"#,
        due = render_due_date(task),
        style = style,
        text = escape_html(&task.text),
        index = index,
        options = render_status_options(&task.status),
    )
}
