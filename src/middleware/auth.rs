use axum::{
    middleware::Next,
    response::Response,
    extract::{Request, State},
    http::header,
};
use crate::handlers::redirect_to_login;
use crate::state::AppState;

/// Username of the session owner, inserted for every authenticated request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

fn is_public(path: &str) -> bool {
    path == "/login"
        || path == "/register"
        || path.starts_with("/css/")
        || path.starts_with("/img/")
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if is_public(req.uri().path()) {
        return next.run(req).await;
    }

    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());

    match state.store.resolve_session(cookie_header) {
        Some(username) => {
            req.extensions_mut().insert(CurrentUser(username));
            next.run(req).await
        }
        None => {
            tracing::debug!("No session for {}, redirecting to login", req.uri().path());
            redirect_to_login().await
        }
    }
}
