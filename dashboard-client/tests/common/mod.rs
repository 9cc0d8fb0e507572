//! In-process stand-in for the dashboard REST API.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use client::{App, storage::MemoryTokenStore};
use serde_json::{Value, json};
use shared::config::ClientConfig;
use tokio::{net::TcpListener, sync::Notify};

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "tok-alice";
pub const USER_COUNT: u64 = 25;
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone)]
pub struct MockMessage {
    pub id: i64,
    pub date: String,
    pub message: String,
    pub user: String,
}

impl MockMessage {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "date": self.date,
            "message": self.message,
            "user": self.user,
        })
    }
}

/// Shared state of the mock; tests flip the switches and read the logs.
#[derive(Debug, Default)]
pub struct MockState {
    /// `(path, Authorization header)` for every authenticated endpoint hit.
    pub seen: Mutex<Vec<(String, Option<String>)>>,
    /// Raw query maps sent to `/messages/`.
    pub message_queries: Mutex<Vec<HashMap<String, String>>>,
    pub messages: Mutex<Vec<MockMessage>>,
    pub login_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    /// Every token is rejected with 401.
    pub revoked: AtomicBool,
    /// `/user/` answers 500.
    pub fail_profile: AtomicBool,
    /// `/dashboard-stats/` answers 500.
    pub fail_stats: AtomicBool,
    /// `POST /messages/` answers 500.
    pub fail_create: AtomicBool,
    /// When set, `/user/` waits for this before answering.
    pub profile_gate: Mutex<Option<Arc<Notify>>>,
    /// Signalled when `/user/` starts handling a request.
    pub profile_started: Notify,
}

impl MockState {
    fn seeded() -> Self {
        let messages = (1..=30)
            .map(|id| MockMessage {
                id,
                date: format!("2024-01-{id:02}T10:00:00Z"),
                message: format!("message {id}"),
                user: if id % 2 == 0 { USERNAME } else { "bob" }.to_string(),
            })
            .collect();
        Self {
            messages: Mutex::new(messages),
            ..Self::default()
        }
    }

    /// Holds `/user/` until the returned handle is notified.
    pub fn hold_profile(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.profile_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn auth_headers_for(&self, path: &str) -> Vec<Option<String>> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(seen, _)| seen == path)
            .map(|(_, header)| header.clone())
            .collect()
    }

    fn authorize(&self, path: &str, headers: &HeaderMap) -> Result<(), Response> {
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.seen
            .lock()
            .unwrap()
            .push((path.to_string(), header.clone()));

        let expected = format!("Token {TOKEN}");
        if !self.revoked.load(Ordering::SeqCst) && header.as_deref() == Some(expected.as_str()) {
            Ok(())
        } else {
            Err(error(StatusCode::UNAUTHORIZED, "Invalid token."))
        }
    }
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn page_param(query: &HashMap<String, String>) -> usize {
    query
        .get("page")
        .and_then(|page| page.parse().ok())
        .unwrap_or(1)
}

fn paginate(resource: &str, page: usize, rows: Vec<Value>) -> Response {
    let total = rows.len();
    let start = (page.max(1) - 1) * PAGE_SIZE;
    if start >= total && page > 1 {
        return error(StatusCode::NOT_FOUND, "Invalid page.");
    }
    let end = (start + PAGE_SIZE).min(total);
    let link = |target: usize| format!("http://testserver/api/{resource}/?page={target}");
    Json(json!({
        "count": total,
        "next": (end < total).then(|| link(page + 1)),
        "previous": (page > 1).then(|| link(page - 1)),
        "results": rows[start..end].to_vec(),
    }))
    .into_response()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.login_calls.fetch_add(1, Ordering::SeqCst);
    if body["username"] == USERNAME && body["password"] == PASSWORD {
        Json(json!({ "token": TOKEN })).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "non_field_errors": ["Unable to log in with provided credentials."] })),
        )
            .into_response()
    }
}

async fn current_user(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.profile_started.notify_one();
    let gate = state.profile_gate.lock().unwrap().clone();
    if let Some(gate) = gate {
        gate.notified().await;
    }
    if let Err(response) = state.authorize("/user/", &headers) {
        return response;
    }
    if state.fail_profile.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "profile backend down");
    }
    Json(json!({
        "id": 1,
        "username": USERNAME,
        "email": "alice@example.com",
        "first_name": "Alice",
        "last_name": "Liddell",
    }))
    .into_response()
}

async fn list_users(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = state.authorize("/users/", &headers) {
        return response;
    }
    let rows = (1..=USER_COUNT)
        .map(|id| {
            json!({
                "id": id,
                "username": format!("user{id:02}"),
                "email": if id % 5 == 0 { String::new() } else { format!("user{id}@example.com") },
                "first_name": "",
                "last_name": "",
            })
        })
        .collect();
    paginate("users", page_param(&query), rows)
}

async fn list_messages(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = state.authorize("/messages/", &headers) {
        return response;
    }
    state.message_queries.lock().unwrap().push(query.clone());

    let from = query.get("from_date").cloned();
    let to = query.get("to_date").cloned();
    let rows = state
        .messages
        .lock()
        .unwrap()
        .iter()
        .filter(|m| from.as_deref().is_none_or(|from| &m.date[..10] >= from))
        .filter(|m| to.as_deref().is_none_or(|to| &m.date[..10] <= to))
        .map(MockMessage::to_json)
        .collect();
    paginate("messages", page_param(&query), rows)
}

async fn create_message(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.create_calls.fetch_add(1, Ordering::SeqCst);
    if let Err(response) = state.authorize("/messages/", &headers) {
        return response;
    }
    if state.fail_create.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    let mut messages = state.messages.lock().unwrap();
    let id = messages.iter().map(|m| m.id).max().unwrap_or(0) + 1;
    let created = MockMessage {
        id,
        date: "2024-01-31T12:00:00Z".to_string(),
        message: body["message"].as_str().unwrap_or_default().to_string(),
        user: USERNAME.to_string(),
    };
    let response = created.to_json();
    messages.push(created);
    (StatusCode::CREATED, Json(response)).into_response()
}

async fn delete_message(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = state.authorize("/messages/{id}/", &headers) {
        return response;
    }
    let mut messages = state.messages.lock().unwrap();
    let Some(index) = messages.iter().position(|m| m.id == id) else {
        return error(StatusCode::NOT_FOUND, "Not found.");
    };
    if messages[index].user != USERNAME {
        return error(
            StatusCode::FORBIDDEN,
            "You do not have permission to perform this action.",
        );
    }
    messages.remove(index);
    StatusCode::NO_CONTENT.into_response()
}

async fn dashboard_stats(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(response) = state.authorize("/dashboard-stats/", &headers) {
        return response;
    }
    if state.fail_stats.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "stats unavailable");
    }
    Json(json!({ "totalUsers": USER_COUNT, "todayMessages": 3, "monthMessages": 30 }))
        .into_response()
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/login/", post(login))
        .route("/api/user/", get(current_user))
        .route("/api/users/", get(list_users))
        .route("/api/messages/", get(list_messages).post(create_message))
        .route("/api/messages/{id}/", delete(delete_message))
        .route("/api/dashboard-stats/", get(dashboard_stats))
        .with_state(state)
}

/// Starts the mock on an ephemeral port; returns its `/api` base URL.
pub async fn spawn() -> (String, Arc<MockState>) {
    let state = Arc::new(MockState::seeded());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), state)
}

pub fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig {
        api_base_url: base_url.to_string(),
        request_timeout_secs: Some(10),
        ..ClientConfig::with_defaults()
    }
}

/// App over the mock with an in-memory token store.
pub fn app_for(base_url: &str, store: Arc<MemoryTokenStore>) -> App {
    App::new(config_for(base_url), store).unwrap()
}

/// Mock plus an app already signed in as alice.
pub async fn signed_in() -> (App, Arc<MockState>, Arc<MemoryTokenStore>) {
    let (base_url, state) = spawn().await;
    let store = Arc::new(MemoryTokenStore::new());
    let app = app_for(&base_url, store.clone());
    assert!(app.login(USERNAME, PASSWORD).await.is_success());
    (app, state, store)
}
