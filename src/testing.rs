//! Mock override backend for integration tests.
//!
//! Serves the `/v1/permission-overrides` endpoints from an
//! [`InMemoryOverrideStore`] so the HTTP client can be exercised end to end.
//! Records go over the wire with `id_override`, the way the real backend
//! sends them.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use sekolah_client::{ClientError, InMemoryOverrideStore, OverrideStore};
use sekolah_core::AppError;
use sekolah_models::{
    CreateOverrideDto, MessageResponse, Override, OverrideFilterParams, OverrideId,
    OverrideTarget, UpdateOverrideDto,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::error;

/// Shared state of the mock backend.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub store: InMemoryOverrideStore,
    raw_records: Mutex<Vec<Value>>,
    envelope: Mutex<bool>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Append a record to every list response verbatim, valid or not.
    pub fn push_raw(&self, record: Value) {
        self.raw_records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
    }

    /// Answer list requests with `{ "data": [...] }` instead of a bare array.
    pub fn use_envelope(&self, enabled: bool) {
        *self.envelope.lock().unwrap_or_else(|e| e.into_inner()) = enabled;
    }

    fn raw_records(&self) -> Vec<Value> {
        self.raw_records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn envelope(&self) -> bool {
        *self.envelope.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn store_error(err: ClientError) -> AppError {
    let status =
        StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    AppError::new(status, err)
}

fn to_wire(record: &Override) -> Result<Value, AppError> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        if let Some(id) = map.remove("id") {
            map.insert("id_override".to_string(), id);
        }
    }
    Ok(value)
}

async fn list_overrides(
    State(backend): State<Arc<MockBackend>>,
    Query(params): Query<OverrideFilterParams>,
) -> Result<Json<Value>, AppError> {
    let target = OverrideTarget::from_parts(params.target_type, &params.target_id)?;
    let records = backend.store.list(&target).await.map_err(store_error)?;

    let mut items = records.iter().map(to_wire).collect::<Result<Vec<_>, _>>()?;
    items.extend(backend.raw_records());

    if backend.envelope() {
        Ok(Json(json!({ "data": items })))
    } else {
        Ok(Json(Value::Array(items)))
    }
}

async fn create_override(
    State(backend): State<Arc<MockBackend>>,
    Json(dto): Json<CreateOverrideDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let record = backend.store.create(&dto).await.map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(to_wire(&record)?)))
}

async fn update_override(
    State(backend): State<Arc<MockBackend>>,
    Path(id): Path<String>,
    Json(dto): Json<UpdateOverrideDto>,
) -> Result<Json<Value>, AppError> {
    let id: OverrideId = id
        .parse()
        .map_err(|_| AppError::bad_request(anyhow!("Invalid override id: {}", id)))?;
    let record = backend.store.update(id, &dto).await.map_err(store_error)?;
    Ok(Json(json!({ "data": to_wire(&record)? })))
}

async fn delete_override(
    State(backend): State<Arc<MockBackend>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id: OverrideId = id
        .parse()
        .map_err(|_| AppError::bad_request(anyhow!("Invalid override id: {}", id)))?;
    backend.store.delete(id).await.map_err(store_error)?;
    Ok(Json(MessageResponse {
        message: format!("Override {} deleted", id),
    }))
}

pub fn mock_router(backend: Arc<MockBackend>) -> Router {
    Router::new()
        .route(
            "/v1/permission-overrides",
            get(list_overrides).post(create_override),
        )
        .route(
            "/v1/permission-overrides/{id}",
            axum::routing::put(update_override).delete(delete_override),
        )
        .with_state(backend)
}

/// Serve a fresh mock backend on an ephemeral port. Returns its base URL.
pub async fn spawn_mock_backend() -> anyhow::Result<(String, Arc<MockBackend>)> {
    let backend = MockBackend::new();
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = mock_router(Arc::clone(&backend));

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Mock backend stopped");
        }
    });

    Ok((format!("http://{}", addr), backend))
}
