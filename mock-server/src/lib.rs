use std::{str::FromStr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// The whole database: top-level arrays are collections, top-level objects
/// are singletons, as in a json-server `db.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Documents(Map<String, Value>);

impl Default for Documents {
    fn default() -> Self {
        let mut docs = Map::new();
        docs.insert("books".to_string(), json!([]));
        docs.insert("todos".to_string(), json!([]));
        docs.insert("profile".to_string(), json!({ "name": "", "email": "", "bio": "" }));
        Documents(docs)
    }
}

impl Documents {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: &str, value: Value) {
        self.0.insert(name.to_string(), value);
    }
}

/// Whether payloads are served as `{"data": payload}` or bare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeMode {
    #[default]
    Wrapped,
    Bare,
}

impl FromStr for EnvelopeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wrapped" => Ok(EnvelopeMode::Wrapped),
            "bare" => Ok(EnvelopeMode::Bare),
            other => Err(format!("unknown envelope mode: {other}")),
        }
    }
}

pub type Db = Arc<RwLock<Documents>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    envelope: EnvelopeMode,
}

type Reply = Result<(StatusCode, Json<Value>), StatusCode>;

/// Empty books and todos, blank profile, wrapped responses.
pub fn app() -> Router {
    app_with(Documents::default(), EnvelopeMode::default())
}

pub fn app_with(documents: Documents, envelope: EnvelopeMode) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(documents)),
        envelope,
    };
    let api = Router::new()
        .route(
            "/{name}",
            get(read_resource).post(create_item).patch(patch_singleton),
        )
        .route(
            "/{name}/{id}",
            get(get_item).patch(patch_item).delete(delete_item),
        )
        .with_state(state);
    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(
    listener: TcpListener,
    documents: Documents,
    envelope: EnvelopeMode,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(documents, envelope)).await
}

fn reply(mode: EnvelopeMode, status: StatusCode, payload: Value) -> (StatusCode, Json<Value>) {
    let body = match mode {
        EnvelopeMode::Wrapped => json!({ "data": payload }),
        EnvelopeMode::Bare => payload,
    };
    (status, Json(body))
}

fn id_matches(item: &Value, id: &str) -> bool {
    match item.get("id") {
        Some(Value::Number(n)) => n.to_string() == id,
        Some(Value::String(s)) => s == id,
        _ => false,
    }
}

/// Max numeric id + 1 while every id is numeric, otherwise a random string.
fn next_id(items: &[Value]) -> Value {
    let numeric: Option<Vec<u64>> = items
        .iter()
        .map(|item| item.get("id").and_then(Value::as_u64))
        .collect();
    match numeric {
        Some(ids) => json!(ids.into_iter().max().unwrap_or(0) + 1),
        None => json!(Uuid::new_v4().simple().to_string()),
    }
}

fn merge(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        if key != "id" {
            target.insert(key, value);
        }
    }
}

fn into_object(body: Value) -> Result<Map<String, Value>, StatusCode> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(StatusCode::BAD_REQUEST),
    }
}

async fn read_resource(State(state): State<AppState>, Path(name): Path<String>) -> Reply {
    let db = state.db.read().await;
    let value = db.get(&name).cloned().ok_or(StatusCode::NOT_FOUND)?;
    debug!(resource = %name, "read");
    Ok(reply(state.envelope, StatusCode::OK, value))
}

async fn create_item(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut fields = into_object(body)?;
    let mut db = state.db.write().await;
    let items = db
        .0
        .get_mut(&name)
        .and_then(Value::as_array_mut)
        .ok_or(StatusCode::NOT_FOUND)?;
    if !fields.contains_key("id") {
        fields.insert("id".to_string(), next_id(items));
    }
    let item = Value::Object(fields);
    items.push(item.clone());
    info!(collection = %name, id = %item["id"], "created");
    Ok(reply(state.envelope, StatusCode::CREATED, item))
}

async fn patch_singleton(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let patch = into_object(body)?;
    let mut db = state.db.write().await;
    let fields = db
        .0
        .get_mut(&name)
        .and_then(Value::as_object_mut)
        .ok_or(StatusCode::NOT_FOUND)?;
    merge(fields, patch);
    let updated = Value::Object(fields.clone());
    info!(resource = %name, "updated");
    Ok(reply(state.envelope, StatusCode::OK, updated))
}

async fn get_item(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
) -> Reply {
    let db = state.db.read().await;
    let item = db
        .get(&name)
        .and_then(Value::as_array)
        .and_then(|items| items.iter().find(|item| id_matches(item, &id)))
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(reply(state.envelope, StatusCode::OK, item))
}

async fn patch_item(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    let patch = into_object(body)?;
    let mut db = state.db.write().await;
    let fields = db
        .0
        .get_mut(&name)
        .and_then(Value::as_array_mut)
        .and_then(|items| items.iter_mut().find(|item| id_matches(item, &id)))
        .and_then(Value::as_object_mut)
        .ok_or(StatusCode::NOT_FOUND)?;
    merge(fields, patch);
    let updated = Value::Object(fields.clone());
    info!(collection = %name, id = %id, "updated");
    Ok(reply(state.envelope, StatusCode::OK, updated))
}

async fn delete_item(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
) -> Reply {
    let mut db = state.db.write().await;
    let items = db
        .0
        .get_mut(&name)
        .and_then(Value::as_array_mut)
        .ok_or(StatusCode::NOT_FOUND)?;
    let index = items
        .iter()
        .position(|item| id_matches(item, &id))
        .ok_or(StatusCode::NOT_FOUND)?;
    let removed = items.remove(index);
    info!(collection = %name, id = %id, "deleted");
    Ok(reply(state.envelope, StatusCode::OK, removed))
}
