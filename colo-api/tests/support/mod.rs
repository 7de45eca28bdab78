//! In-process stub of the hosted platform
//!
//! Speaks just enough of the row API, auth admin API and storage API for
//! the integration tests: in-memory tables with equality filters, a user
//! store with the platform's error dialect, per-path asset removal, and
//! the communes endpoint used by the city lookup. Tables and columns can
//! be declared missing to exercise the 42P01/42703 paths.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct StubState {
    pub tables: Mutex<HashMap<String, Vec<Value>>>,
    pub missing_tables: Mutex<HashSet<String>>,
    /// table -> columns the schema lacks (writes naming them fail 42703)
    pub missing_columns: Mutex<HashMap<String, HashSet<String>>>,
    pub users: Mutex<Vec<Value>>,
    pub failing_assets: Mutex<HashSet<String>>,
    pub removed_assets: Mutex<Vec<String>>,
    next_id: AtomicI64,
}

impl StubState {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

pub struct StubPlatform {
    pub state: Arc<StubState>,
    addr: SocketAddr,
}

impl StubPlatform {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn mark_table_missing(&self, table: &str) {
        self.state
            .missing_tables
            .lock()
            .unwrap()
            .insert(table.to_string());
    }

    pub fn mark_columns_missing(&self, table: &str, columns: &[&str]) {
        self.state.missing_columns.lock().unwrap().insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
    }

    pub fn fail_asset(&self, path: &str) {
        self.state
            .failing_assets
            .lock()
            .unwrap()
            .insert(path.to_string());
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state
            .tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn insert_row(&self, table: &str, mut row: Value) -> i64 {
        let id = self.state.next_id();
        row["id"] = json!(id);
        self.state
            .tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
        id
    }

    pub fn seed_users(&self, count: usize) {
        let mut users = self.state.users.lock().unwrap();
        for i in 0..count {
            users.push(json!({
                "id": uuid::Uuid::new_v4().to_string(),
                "email": format!("utilisateur{}@exemple.fr", i),
                "password": "motdepasse",
                "created_at": "2026-01-01T00:00:00Z",
            }));
        }
    }

    pub fn user_password(&self, email: &str) -> Option<String> {
        self.state
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u["email"] == email)
            .and_then(|u| u["password"].as_str().map(|s| s.to_string()))
    }
}

fn missing_relation(table: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "code": "42P01",
            "message": format!("relation \"public.{}\" does not exist", table),
        })),
    )
        .into_response()
}

fn eq_filters(params: &HashMap<String, String>) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            value
                .strip_prefix("eq.")
                .map(|v| (key.clone(), v.to_string()))
        })
        .collect()
}

fn row_matches(row: &Value, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(column, expected)| {
        match row.get(column) {
            Some(Value::String(s)) => s == expected,
            Some(Value::Number(n)) => n.to_string() == *expected,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == *expected,
        }
    })
}

async fn rest_select(
    State(state): State<Arc<StubState>>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if state.missing_tables.lock().unwrap().contains(&table) {
        return missing_relation(&table);
    }
    let filters = eq_filters(&params);
    let rows: Vec<Value> = state
        .tables
        .lock()
        .unwrap()
        .get(&table)
        .map(|rows| {
            rows.iter()
                .filter(|row| row_matches(row, &filters))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(rows).into_response()
}

async fn rest_insert(
    State(state): State<Arc<StubState>>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if state.missing_tables.lock().unwrap().contains(&table) {
        return missing_relation(&table);
    }
    if let Some(columns) = state.missing_columns.lock().unwrap().get(&table) {
        if let Some(map) = body.as_object() {
            if let Some(unknown) = map.keys().find(|k| columns.contains(*k)) {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "code": "42703",
                        "message": format!("column \"{}\" of relation \"{}\" does not exist", unknown, table),
                    })),
                )
                    .into_response();
            }
        }
    }

    let mut row = body;
    // upsert: merge onto the row sharing the conflict key
    if let Some(conflict_key) = params.get("on_conflict") {
        let needle = row.get(conflict_key).cloned();
        let mut tables = state.tables.lock().unwrap();
        let rows = tables.entry(table.clone()).or_default();
        if let Some(existing) = rows
            .iter_mut()
            .find(|r| needle.is_some() && r.get(conflict_key) == needle.as_ref())
        {
            if let (Some(target), Some(source)) = (existing.as_object_mut(), row.as_object()) {
                for (key, value) in source {
                    target.insert(key.clone(), value.clone());
                }
            }
            return Json(vec![existing.clone()]).into_response();
        }
    }

    if row.get("id").is_none() {
        row["id"] = json!(state.next_id());
    }
    state
        .tables
        .lock()
        .unwrap()
        .entry(table)
        .or_default()
        .push(row.clone());
    (StatusCode::CREATED, Json(vec![row])).into_response()
}

async fn rest_update(
    State(state): State<Arc<StubState>>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(patch): Json<Value>,
) -> Response {
    if state.missing_tables.lock().unwrap().contains(&table) {
        return missing_relation(&table);
    }
    let filters = eq_filters(&params);
    let mut tables = state.tables.lock().unwrap();
    let mut updated = Vec::new();
    if let Some(rows) = tables.get_mut(&table) {
        for row in rows.iter_mut() {
            if !row_matches(row, &filters) {
                continue;
            }
            if let (Some(target), Some(source)) = (row.as_object_mut(), patch.as_object()) {
                for (key, value) in source {
                    target.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
    }
    Json(updated).into_response()
}

async fn rest_delete(
    State(state): State<Arc<StubState>>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if state.missing_tables.lock().unwrap().contains(&table) {
        return missing_relation(&table);
    }
    let filters = eq_filters(&params);
    let mut tables = state.tables.lock().unwrap();
    if let Some(rows) = tables.get_mut(&table) {
        rows.retain(|row| !row_matches(row, &filters));
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn admin_create_user(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let mut users = state.users.lock().unwrap();
    if users.iter().any(|u| u["email"] == email.as_str()) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error_code": "email_exists",
                "msg": "User already registered",
            })),
        )
            .into_response();
    }
    let user = json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "email": email,
        "password": body["password"],
        "created_at": "2026-01-01T00:00:00Z",
    });
    users.push(user.clone());
    Json(user).into_response()
}

async fn admin_list_users(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let per_page: usize = params
        .get("per_page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(50);
    let users = state.users.lock().unwrap();
    let start = (page.saturating_sub(1)) * per_page;
    let slice: Vec<Value> = users.iter().skip(start).take(per_page).cloned().collect();
    Json(json!({ "users": slice })).into_response()
}

async fn admin_update_user(
    State(state): State<Arc<StubState>>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut users = state.users.lock().unwrap();
    match users.iter_mut().find(|u| u["id"] == user_id.as_str()) {
        Some(user) => {
            if let Some(password) = body.get("password") {
                user["password"] = password.clone();
            }
            Json(user.clone()).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "msg": "User not found" })),
        )
            .into_response(),
    }
}

async fn storage_delete(
    State(state): State<Arc<StubState>>,
    Path((_bucket, path)): Path<(String, String)>,
) -> Response {
    if state.failing_assets.lock().unwrap().contains(&path) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "removal failed" })),
        )
            .into_response();
    }
    state.removed_assets.lock().unwrap().push(path);
    Json(json!({ "message": "ok" })).into_response()
}

async fn communes(Query(params): Query<HashMap<String, String>>) -> Response {
    let code = params.get("codePostal").cloned().unwrap_or_default();
    Json(json!([
        {
            "nom": format!("Ville-{}", code),
            "code": "75056",
            "codesPostaux": [code],
        }
    ]))
    .into_response()
}

/// Start the stub on a loopback port.
pub async fn spawn_stub() -> StubPlatform {
    let state = Arc::new(StubState::default());

    let app = Router::new()
        .route(
            "/rest/v1/:table",
            get(rest_select)
                .post(rest_insert)
                .patch(rest_update)
                .delete(rest_delete),
        )
        .route(
            "/auth/v1/admin/users",
            post(admin_create_user).get(admin_list_users),
        )
        .route("/auth/v1/admin/users/:user_id", axum::routing::put(admin_update_user))
        .route("/storage/v1/object/:bucket/*path", delete(storage_delete))
        .route("/communes", get(communes))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubPlatform { state, addr }
}
