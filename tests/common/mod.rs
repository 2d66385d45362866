//! In-process mock of the Doris gateway HTTP API.
//!
//! Mirrors the gateway's response and error envelopes closely enough to
//! drive every client operation, and records what it received.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub contents: Vec<u8>,
    pub fields: BTreeMap<String, String>,
}

#[derive(Default)]
pub struct MockState {
    pub requests: Mutex<Vec<String>>,
    pub natural_bodies: Mutex<Vec<Value>>,
    pub exec_bodies: Mutex<Vec<Value>>,
    pub uploads: Mutex<Vec<RecordedUpload>>,
    pub preview_queries: Mutex<Vec<HashMap<String, String>>>,
    pub tables: Mutex<Vec<String>>,
    pub llm_resources: Mutex<BTreeMap<String, Value>>,
    pub slow_health: AtomicBool,
}

impl MockState {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_natural_body(&self) -> Value {
        self.natural_bodies.lock().unwrap().last().cloned().unwrap_or(Value::Null)
    }

    pub fn set_slow_health(&self, slow: bool) {
        self.slow_health.store(slow, Ordering::SeqCst);
    }
}

pub struct MockGateway {
    pub url: String,
    pub state: Arc<MockState>,
}

/// Starts the mock on an ephemeral local port.
pub async fn spawn() -> MockGateway {
    let state = Arc::new(MockState::default());
    state.tables.lock().unwrap().push("institutions".to_string());

    let app = router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockGateway {
        url: format!("http://{}", addr),
        state,
    }
}

/// Address that refuses connections.
pub async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/query/natural", post(natural_query))
        .route("/api/execute", post(execute))
        .route("/api/upload", post(upload))
        .route("/api/upload/preview", post(preview))
        .route("/api/tables", get(list_tables))
        .route("/api/tables/{name}/schema", get(table_schema))
        .route("/api/llm/config", post(create_llm).get(list_llm))
        .route("/api/llm/config/{name}/test", post(test_llm))
        .route("/api/llm/config/{name}", delete(delete_llm))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Arc<MockState>>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri().path());
    state.requests.lock().unwrap().push(line);
    next.run(request).await
}

fn error_detail(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "detail": { "error": message, "traceback": "Traceback (most recent call last): ..." } })),
    )
        .into_response()
}

async fn root() -> Json<Value> {
    Json(json!({ "service": "Doris API Gateway", "status": "running", "version": "1.0.0" }))
}

async fn health(State(state): State<Arc<MockState>>) -> Json<Value> {
    if state.slow_health.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }
    Json(json!({ "success": true, "doris_connected": true, "message": "Doris connection OK" }))
}

async fn natural_query(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.natural_bodies.lock().unwrap().push(body.clone());

    let question = body.get("query").and_then(Value::as_str).unwrap_or_default();
    if question.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "Missing 'query' parameter" })))
            .into_response();
    }

    Json(json!({
        "success": true,
        "query": question,
        "sql": "SELECT 1",
        "data": [{ "x": 1 }],
        "count": 1
    }))
    .into_response()
}

async fn execute(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.exec_bodies.lock().unwrap().push(body.clone());

    let sql = body["params"]["sql"].as_str().unwrap_or_default();
    if !sql.to_uppercase().starts_with("SELECT") && !sql.to_uppercase().starts_with("SHOW") {
        return error_detail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "errCode = 2, detailMessage = Syntax error",
        );
    }

    Json(json!({
        "success": true,
        "action": body["action"],
        "data": [{ "Database": "demo" }, { "Database": "information_schema" }],
        "count": 2
    }))
    .into_response()
}

async fn read_upload(mut multipart: Multipart) -> RecordedUpload {
    let mut upload = RecordedUpload {
        file_name: None,
        content_type: None,
        contents: Vec::new(),
        fields: BTreeMap::new(),
    };

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            upload.file_name = field.file_name().map(str::to_string);
            upload.content_type = field.content_type().map(str::to_string);
            upload.contents = field.bytes().await.unwrap().to_vec();
        } else {
            upload.fields.insert(name, field.text().await.unwrap());
        }
    }
    upload
}

fn parse_csv(contents: &[u8]) -> (Vec<String>, Vec<Map<String, Value>>) {
    let text = String::from_utf8_lossy(contents);
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let columns: Vec<String> = lines
        .next()
        .map(|header| header.split(',').map(|c| c.trim().to_string()).collect())
        .unwrap_or_default();

    let rows: Vec<Map<String, Value>> = lines
        .map(|line| {
            columns
                .iter()
                .cloned()
                .zip(line.split(',').map(|v| Value::String(v.trim().to_string())))
                .collect()
        })
        .collect();
    (columns, rows)
}

async fn upload(State(state): State<Arc<MockState>>, multipart: Multipart) -> Response {
    let upload = read_upload(multipart).await;
    let table = upload.fields.get("table_name").cloned().unwrap_or_default();
    let (columns, rows) = parse_csv(&upload.contents);
    state.uploads.lock().unwrap().push(upload);

    if columns.is_empty() {
        return error_detail(StatusCode::INTERNAL_SERVER_ERROR, "Excel file is empty");
    }

    let mut tables = state.tables.lock().unwrap();
    if !tables.contains(&table) {
        tables.push(table.clone());
    }

    Json(json!({
        "success": true,
        "message": format!("Imported {} rows", rows.len()),
        "table_name": table,
        "rows_imported": rows.len(),
        "columns": columns
    }))
    .into_response()
}

async fn preview(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    multipart: Multipart,
) -> Response {
    let limit: usize = query.get("rows").and_then(|r| r.parse().ok()).unwrap_or(10);
    state.preview_queries.lock().unwrap().push(query);

    let upload = read_upload(multipart).await;
    let (columns, rows) = parse_csv(&upload.contents);
    let total_rows = rows.len();
    let filename = upload.file_name.clone();
    state.uploads.lock().unwrap().push(upload);

    Json(json!({
        "success": true,
        "filename": filename,
        "columns": columns,
        "data": rows.into_iter().take(limit).collect::<Vec<_>>(),
        "total_rows": total_rows
    }))
    .into_response()
}

async fn list_tables(State(state): State<Arc<MockState>>) -> Json<Value> {
    let tables = state.tables.lock().unwrap().clone();
    Json(json!({ "success": true, "tables": tables, "count": tables.len() }))
}

async fn table_schema(State(state): State<Arc<MockState>>, Path(name): Path<String>) -> Response {
    if !state.tables.lock().unwrap().contains(&name) {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": { "error": "table not found" } })))
            .into_response();
    }

    Json(json!({
        "success": true,
        "table": name,
        "schema": [
            { "Field": "id", "Type": "BIGINT", "Null": "NO", "Key": "true", "Default": null, "Extra": "" },
            { "Field": "name", "Type": "VARCHAR(255)", "Null": "YES", "Key": "false", "Default": null, "Extra": "" }
        ]
    }))
    .into_response()
}

async fn create_llm(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let name = body["resource_name"].as_str().unwrap_or_default().to_string();
    let mut resources = state.llm_resources.lock().unwrap();
    if resources.contains_key(&name) {
        return error_detail(
            StatusCode::CONFLICT,
            &format!("Resource '{}' already exists", name),
        );
    }
    resources.insert(name.clone(), body);

    Json(json!({
        "success": true,
        "message": format!("LLM resource '{}' created successfully", name),
        "sql": format!("CREATE RESOURCE '{}' PROPERTIES (...)", name)
    }))
    .into_response()
}

async fn list_llm(State(state): State<Arc<MockState>>) -> Json<Value> {
    let resources: Vec<Value> = state
        .llm_resources
        .lock()
        .unwrap()
        .iter()
        .map(|(name, body)| {
            json!({
                "ResourceName": name,
                "ResourceType": "ai",
                "properties": {
                    "ai.provider_type": body["provider_type"],
                    "ai.endpoint": body["endpoint"],
                    "ai.model_name": body["model_name"],
                    "ai.api_key": "******"
                }
            })
        })
        .collect();
    Json(json!({ "success": true, "count": resources.len(), "resources": resources }))
}

async fn test_llm(State(state): State<Arc<MockState>>, Path(name): Path<String>) -> Response {
    if !state.llm_resources.lock().unwrap().contains_key(&name) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": { "success": false, "error": format!("Resource {} not found", name) } })),
        )
            .into_response();
    }
    Json(json!({
        "success": true,
        "message": "LLM resource is working",
        "test_result": { "test_result": "Hello! How can I help you?" }
    }))
    .into_response()
}

async fn delete_llm(State(state): State<Arc<MockState>>, Path(name): Path<String>) -> Response {
    if state.llm_resources.lock().unwrap().remove(&name).is_none() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": format!("errCode = 2, detailMessage = Resource({}) does not exist", name) })),
        )
            .into_response();
    }
    Json(json!({
        "success": true,
        "message": format!("LLM resource '{}' deleted successfully", name)
    }))
    .into_response()
}
