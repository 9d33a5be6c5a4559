use axum::{
    routing::{get, post},
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
};
use tower_http::{
    services::ServeDir,
    limit::RequestBodyLimitLayer,
};
use crate::{handlers, middleware, state::AppState};

/// Builds the full route table. A wrong method on a known path is treated
/// like an unknown path: 302 to `/login`.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.web.static_dir.clone();
    let max_body_size = state.config.web.max_body_size;

    Router::new()
        // Auth routes
        .route(
            "/login",
            get(handlers::serve_login_page)
                .post(handlers::handle_login)
                .fallback(handlers::redirect_to_login),
        )
        .route(
            "/register",
            get(handlers::serve_register_page)
                .post(handlers::handle_register)
                .fallback(handlers::redirect_to_login),
        )

        // Task routes
        .route(
            "/tasks",
            get(handlers::serve_task_list).fallback(handlers::redirect_to_login),
        )
        .route(
            "/edit-task",
            get(handlers::serve_edit_page)
                .post(handlers::edit_task)
                .fallback(handlers::redirect_to_login),
        )
        .route(
            "/",
            post(handlers::add_task).fallback(handlers::redirect_to_login),
        )
        .route(
            "/delete-task",
            post(handlers::delete_task).fallback(handlers::redirect_to_login),
        )
        .route(
            "/update-status",
            post(handlers::update_status).fallback(handlers::redirect_to_login),
        )

        // Static files
        .nest_service("/css", ServeDir::new(static_dir.join("css")))
        .nest_service("/img", ServeDir::new(static_dir.join("img")))

        .fallback(handlers::redirect_to_login)

        // Add middleware
        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))

        // Add state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, Response, StatusCode},
    };
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        _tmp: TempDir,
        router: Router,
    }

    impl TestApp {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let state = AppState::new(Config::for_tests(tmp.path()));
            Self {
                router: build_router(state),
                _tmp: tmp,
            }
        }

        async fn send(&self, request: Request<Body>) -> Response<Body> {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
            let mut builder = Request::builder().method(Method::GET).uri(uri);
            if let Some(cookie) = cookie {
                builder = builder.header(header::COOKIE, cookie);
            }
            self.send(builder.body(Body::empty()).unwrap()).await
        }

        async fn post(&self, uri: &str, form: &str, cookie: Option<&str>) -> Response<Body> {
            let mut builder = Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            if let Some(cookie) = cookie {
                builder = builder.header(header::COOKIE, cookie);
            }
            self.send(builder.body(Body::from(form.to_string())).unwrap()).await
        }

        /// Registers and logs in, returning the `Cookie` header value to send.
        async fn sign_in(&self, username: &str, password: &str) -> String {
            let form = format!("username={}&password={}", username, password);
            let registered = self.post("/register", &form, None).await;
            assert_eq!(registered.status(), StatusCode::SEE_OTHER);

            let logged_in = self.post("/login", &form, None).await;
            assert_eq!(logged_in.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&logged_in), "/tasks");

            let set_cookie = logged_in.headers()[header::SET_COOKIE].to_str().unwrap();
            let mut attributes = set_cookie.split(';').map(str::trim);
            let pair = attributes.next().unwrap().to_string();
            assert!(pair.starts_with("session_id="));

            let attributes: Vec<&str> = attributes.collect();
            for expected in ["Path=/", "HttpOnly", "SameSite=Lax"] {
                assert!(attributes.contains(&expected), "{} missing from {}", expected, set_cookie);
            }
            pair
        }
    }

    fn location(response: &Response<Body>) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn public_forms_render_without_session() {
        let app = TestApp::new();
        for uri in ["/login", "/register"] {
            let response = app.get(uri, None).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert!(body_text(response).await.contains("<form"));
        }
    }

    #[tokio::test]
    async fn static_assets_are_served_without_session() {
        let app = TestApp::new();

        let response = app.get("/css/style.css", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
        assert!(body_text(response).await.contains(".task-item"));

        let missing = app.get("/img/missing.png", None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn protected_routes_redirect_to_login() {
        let app = TestApp::new();

        for uri in ["/tasks", "/edit-task?task_id=0"] {
            let response = app.get(uri, None).await;
            assert_eq!(response.status(), StatusCode::FOUND);
            assert_eq!(location(&response), "/login");
        }

        let response = app.post("/", "task=sneaky", Some("session_id=forged")).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn unknown_routes_redirect_to_login_even_when_signed_in() {
        let app = TestApp::new();
        let cookie = app.sign_in("alice", "pw1").await;

        for uri in ["/nowhere", "/", "/delete-task"] {
            let response = app.get(uri, Some(&cookie)).await;
            assert_eq!(response.status(), StatusCode::FOUND, "{}", uri);
            assert_eq!(location(&response), "/login");
        }

        let response = app.get("/edit-task", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let app = TestApp::new();
        let form = "username=alice&password=pw1";

        let first = app.post("/register", form, None).await;
        assert_eq!(first.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&first), "/login");

        let second = app.post("/register", form, None).await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(second).await, "User already exists");
    }

    #[tokio::test]
    async fn bad_login_is_forbidden() {
        let app = TestApp::new();
        app.post("/register", "username=alice&password=pw1", None).await;

        let wrong = app.post("/login", "username=alice&password=nope", None).await;
        assert_eq!(wrong.status(), StatusCode::FORBIDDEN);
        assert!(wrong.headers().get(header::SET_COOKIE).is_none());

        let unknown = app.post("/login", "username=bob&password=pw1", None).await;
        assert_eq!(unknown.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_text(unknown).await, "Invalid credentials");
    }

    #[tokio::test]
    async fn missing_fields_are_bad_requests() {
        let app = TestApp::new();
        assert_eq!(
            app.post("/register", "username=alice", None).await.status(),
            StatusCode::BAD_REQUEST
        );

        let cookie = app.sign_in("alice", "pw1").await;
        assert_eq!(
            app.post("/", "due_date=2024-01-01", Some(&cookie)).await.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            app.post("/delete-task", "task_id=x", Some(&cookie)).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn out_of_range_indices_are_not_found() {
        let app = TestApp::new();
        let cookie = app.sign_in("alice", "pw1").await;

        let edit_page = app.get("/edit-task?task_id=0", Some(&cookie)).await;
        assert_eq!(edit_page.status(), StatusCode::NOT_FOUND);

        let status = app
            .post("/update-status", "task_id=3&status=Completed", Some(&cookie))
            .await;
        assert_eq!(status.status(), StatusCode::NOT_FOUND);

        let delete = app.post("/delete-task", "task_id=0", Some(&cookie)).await;
        assert_eq!(delete.status(), StatusCode::NOT_FOUND);

        let oversized = app
            .post("/delete-task", "task_id=99999999999999999999999", Some(&cookie))
            .await;
        assert_eq!(oversized.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn users_only_see_their_own_tasks() {
        let app = TestApp::new();
        let alice = app.sign_in("alice", "pw1").await;
        let bob = app.sign_in("bob", "pw2").await;

        app.post("/", "task=Alice+secret&due_date=", Some(&alice)).await;

        let page = body_text(app.get("/tasks", Some(&bob)).await).await;
        assert!(!page.contains("Alice secret"));
    }

    #[tokio::test]
    async fn task_lifecycle_over_http() {
        let app = TestApp::new();
        let cookie = app.sign_in("alice", "pw1").await;

        let added = app
            .post("/", "task=Buy+milk&due_date=2024-01-01", Some(&cookie))
            .await;
        assert_eq!(added.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&added), "/tasks");

        let page = body_text(app.get("/tasks", Some(&cookie)).await).await;
        assert!(page.contains("Buy milk"));
        assert!(page.contains(r#"<span id="total-tasks">1</span>"#));
        assert!(page.contains(r#"<span id="completed-tasks">0</span>"#));
        assert!(page.contains(r#"<option value="Not Started" selected>"#));

        let updated = app
            .post("/update-status", "task_id=0&status=Completed", Some(&cookie))
            .await;
        assert_eq!(updated.status(), StatusCode::SEE_OTHER);
        let page = body_text(app.get("/tasks", Some(&cookie)).await).await;
        assert!(page.contains(r#"<span id="completed-tasks">1</span>"#));

        let edit_page = app.get("/edit-task?task_id=0", Some(&cookie)).await;
        assert_eq!(edit_page.status(), StatusCode::OK);
        assert!(body_text(edit_page).await.contains(r#"value="Buy milk""#));

        let empty_edit = app
            .post("/edit-task", "task_id=0&updated_task=", Some(&cookie))
            .await;
        assert_eq!(empty_edit.status(), StatusCode::BAD_REQUEST);

        let edited = app
            .post("/edit-task", "task_id=0&updated_task=Buy+oat+milk", Some(&cookie))
            .await;
        assert_eq!(edited.status(), StatusCode::SEE_OTHER);
        let page = body_text(app.get("/tasks", Some(&cookie)).await).await;
        assert!(page.contains("Buy oat milk"));

        let deleted = app.post("/delete-task", "task_id=0", Some(&cookie)).await;
        assert_eq!(deleted.status(), StatusCode::SEE_OTHER);
        let page = body_text(app.get("/tasks", Some(&cookie)).await).await;
        assert!(page.contains(r#"<span id="total-tasks">0</span>"#));
        assert!(!page.contains("Buy oat milk"));
    }
}
