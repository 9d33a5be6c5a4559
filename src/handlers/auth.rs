use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Response, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use crate::errors::AppResult;
use crate::models::CredentialsForm;
use crate::state::AppState;
use super::run_blocking;

pub async fn serve_login_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(state.templates.login_page()?))
}

pub async fn serve_register_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(state.templates.registration_page()?))
}

#[axum::debug_handler]
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(login_form): Form<CredentialsForm>,
) -> AppResult<Response> {
    let (username, password) = login_form.into_credentials()?;
    tracing::info!("Login attempt for user: {}", username);

    let store = state.store.clone();
    let token = run_blocking(move || store.login(&username, &password)).await?;

    let cookie = Cookie::build((state.store.cookie_name().to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Redirect::to("/tasks")).into_response())
}

pub async fn handle_register(
    State(state): State<AppState>,
    Form(register_form): Form<CredentialsForm>,
) -> AppResult<Response> {
    let (username, password) = register_form.into_credentials()?;

    let store = state.store.clone();
    run_blocking(move || store.register(&username, &password)).await?;

    // Only successful registration continues to the login form
    Ok(Redirect::to("/login").into_response())
}
