#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use admin_console::{ApiClient, ClientConfig};

pub const SESSION_TOKEN: &str = "test-session-token";
pub const PASSWORD: &str = "secret1";

/// Requests the mock backend saw, for assertions
#[derive(Debug, Default)]
pub struct Recorded {
    pub bodies: Vec<(String, Value)>,
    pub deleted: Vec<String>,
}

#[derive(Clone, Default)]
struct Shared {
    recorded: Arc<Mutex<Recorded>>,
}

pub struct MockBackend {
    pub port: u16,
    pub base_url: String,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockBackend {
    /// Bind an unused port and serve the mock API on the current runtime
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let shared = Shared::default();
        let recorded = shared.recorded.clone();

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router(shared)).await;
        });

        Ok(Self { port, base_url, recorded })
    }

    pub fn client(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(ClientConfig::new(&self.base_url).with_timeout_ms(2_000))?)
    }

    /// Client that already holds a valid session cookie
    pub fn logged_in_client(&self) -> Result<ApiClient> {
        Ok(self.client()?.with_session_token(Some(SESSION_TOKEN.to_string())))
    }

    pub fn last_body(&self, route: &str) -> Option<Value> {
        let recorded = self.recorded.lock().ok()?;
        recorded
            .bodies
            .iter()
            .rev()
            .find(|(r, _)| r == route)
            .map(|(_, body)| body.clone())
    }

    pub fn deleted(&self) -> Vec<String> {
        self.recorded.lock().map(|r| r.deleted.clone()).unwrap_or_default()
    }
}

fn router(shared: Shared) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register).get(confirm_registration))
        .route("/auth/reset-password", post(request_reset))
        .route("/auth/resetPassword", post(reset_password))
        .route("/role", get(list_roles).post(create_role))
        .route("/role/access", get(list_permissions))
        .route("/role/:id", get(get_role).put(update_role).delete(delete_role))
        .route("/user", get(list_users).post(create_user))
        .route("/user/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/suppliers", get(list_suppliers))
        .route("/slow", get(slow))
        .with_state(shared)
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|cookies| cookies.split(';').any(|c| c.trim() == format!("token={}", SESSION_TOKEN)))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response()
}

fn record(shared: &Shared, route: &str, body: Value) {
    if let Ok(mut recorded) = shared.recorded.lock() {
        recorded.bodies.push((route.to_string(), body));
    }
}

fn permissions() -> Value {
    json!([
        { "id": 1, "name": "Administration", "order": 2, "dad": null },
        { "id": 2, "name": "Dashboard", "order": 1, "dad": null },
        { "id": 3, "name": "Users", "order": 2, "dad": 1 },
        { "id": 4, "name": "Roles", "order": 1, "dad": 1 },
        { "id": 5, "name": "Create role", "order": 1, "dad": 4 },
        { "id": 6, "name": "Ghost", "order": 0, "dad": 42 }
    ])
}

fn roles() -> Value {
    json!([
        { "id": 1, "name": "admin", "accesses": [{ "id": 1, "name": "Administration" }, { "id": 4, "name": "Roles" }] },
        { "id": 2, "name": "viewer", "accesses": [] }
    ])
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["username"] == "admin" && body["password"] == PASSWORD {
        (
            StatusCode::CREATED,
            [(header::SET_COOKIE, format!("token={}; Path=/; HttpOnly", SESSION_TOKEN))],
            Json(json!({ "message": "Login successful" })),
        )
            .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" }))).into_response()
    }
}

async fn register(State(shared): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&shared, "register", body.clone());
    if body["email"] == "taken@example.com" {
        Json(json!({ "success": false, "message": "Email already registered" }))
    } else {
        Json(json!({ "success": true, "message": "Check your email to activate your account" }))
    }
}

async fn confirm_registration(Query(params): Query<std::collections::HashMap<String, String>>) -> Json<Value> {
    match params.get("token").map(String::as_str) {
        Some("good-token") => Json(json!({ "success": true, "message": "Account activated" })),
        _ => Json(json!({ "success": false, "message": "" })),
    }
}

async fn request_reset(State(shared): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    record(&shared, "reset-password", body);
    StatusCode::OK
}

async fn reset_password(State(shared): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&shared, "resetPassword", body);
    Json(json!({ "success": true, "message": "Password reset" }))
}

async fn list_roles(headers: HeaderMap) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    Json(roles()).into_response()
}

async fn get_role(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    let found = roles()
        .as_array()
        .and_then(|all| all.iter().find(|r| r["id"] == id).cloned());
    match found {
        Some(role) => Json(role).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Role not found" }))).into_response(),
    }
}

async fn list_permissions(headers: HeaderMap) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    Json(permissions()).into_response()
}

async fn create_role(State(shared): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    record(&shared, "create_role", body.clone());
    match body["name"].as_str() {
        Some("duplicate") => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": ["name must be unique", "choose another name"] })),
        )
            .into_response(),
        Some("refused") => Json(json!({ "success": false, "message": "Role limit reached" })).into_response(),
        _ => Json(json!({ "success": true, "message": "Role created" })).into_response(),
    }
}

async fn update_role(State(shared): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    record(&shared, "update_role", body);
    StatusCode::OK.into_response()
}

async fn delete_role(State(shared): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    if let Ok(mut recorded) = shared.recorded.lock() {
        recorded.deleted.push(format!("role/{}", id));
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_users(headers: HeaderMap) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    Json(json!([
        { "id": 1, "username": "admin", "email": "admin@example.com", "roles": [{ "id": 1, "name": "admin" }] },
        { "id": 2, "username": "guest", "email": "guest@example.com" }
    ]))
    .into_response()
}

async fn get_user(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    if id == 1 {
        Json(json!({ "id": 1, "username": "admin", "email": "admin@example.com", "roles": [] })).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "message": format!("User {} not found", id) }))).into_response()
    }
}

async fn create_user(State(shared): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    record(&shared, "create_user", body);
    (StatusCode::CREATED, Json(json!({ "id": 3 }))).into_response()
}

async fn update_user(State(shared): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    record(&shared, "update_user", body);
    Json(json!({ "id": 1 })).into_response()
}

async fn delete_user(State(shared): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    if let Ok(mut recorded) = shared.recorded.lock() {
        recorded.deleted.push(format!("user/{}", id));
    }
    StatusCode::OK.into_response()
}

async fn list_suppliers(headers: HeaderMap) -> Response {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", SESSION_TOKEN))
        .unwrap_or(false);
    if !bearer {
        return unauthorized();
    }
    Json(json!([{ "id": 10, "name": "Acme" }])).into_response()
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({}))
}
