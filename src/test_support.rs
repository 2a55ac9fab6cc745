use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{app::build_app, state::AppState};

/// The full router wired to in-memory stores.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            router: build_app(AppState::fake()),
        }
    }
}

pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let authorization = token.map(|t| format!("Token {t}"));
    send_with_authorization(app, method, uri, authorization.as_deref(), body).await
}

/// Like `send`, but with a verbatim `Authorization` header value.
pub async fn send_with_authorization(
    app: &TestApp,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        req = req.header(header::AUTHORIZATION, value);
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .expect("valid request");

    let res = app.router.clone().oneshot(req).await.expect("infallible");
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn create_user(app: &TestApp, email: &str, password: &str) {
    let (status, body) = send(
        app,
        Method::POST,
        "/user/create/",
        None,
        Some(json!({"email": email, "password": password, "name": "Test Name"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create user failed: {body}");
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/user/token/",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().expect("token in body").to_string()
}

/// Registers a user and returns a live token for them.
pub async fn signed_in(app: &TestApp, email: &str) -> String {
    create_user(app, email, "testpass123").await;
    login(app, email, "testpass123").await
}

pub fn sample_recipe() -> Value {
    json!({
        "title": "Sample recipe title",
        "time_minutes": 5,
        "price": "5.30",
        "link": "https://www.example.com/recipe.pdf",
        "description": "Sample recipe description",
    })
}

pub async fn create_recipe(app: &TestApp, token: &str, overrides: Value) -> Value {
    let mut body = sample_recipe();
    if let (Some(base), Some(extra)) = (body.as_object_mut(), overrides.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    let (status, created) = send(app, Method::POST, "/recipe/recipes/", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create recipe failed: {created}");
    created
}

pub async fn create_tag(app: &TestApp, token: &str, name: &str) -> Value {
    let (status, created) = send(
        app,
        Method::POST,
        "/recipe/tags/",
        Some(token),
        Some(json!({"name": name})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create tag failed: {created}");
    created
}
