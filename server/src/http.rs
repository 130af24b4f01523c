//! The HTTP boundary: thin axum handlers over the orchestrator, the task
//! registry and the download store. Core errors map to status codes here
//! and nowhere else — `TaskNotFound` is a 404, every other kind is a 500
//! with the error kind surfaced for diagnostics.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::UpdateErr;
use crate::orchestrator::Orchestrator;
use crate::storage::{FileStorage, StorageErr};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub storage: Arc<dyn FileStorage>,
    pub clients: Arc<Mutex<HashSet<String>>>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, storage: Arc<dyn FileStorage>) -> Self {
        Self {
            orchestrator,
            storage,
            clients: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/register", post(register))
        .route("/api/task/:task_id", get(get_task))
        .route("/api/update", post(submit_update))
        .route("/download/*path", get(download))
        .with_state(state)
}

impl IntoResponse for UpdateErr {
    fn into_response(self) -> Response {
        let status = match self {
            UpdateErr::TaskNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

async fn index() -> impl IntoResponse {
    Json(json!({ "message": "federated learning server" }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    client_id: String,
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    let mut clients = state.clients.lock().expect("client set poisoned");
    clients.insert(req.client_id.clone());
    info!(client = req.client_id.as_str(); "client registered");

    Json(json!({ "message": format!("Client {} registered", req.client_id) }))
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Response, UpdateErr> {
    let descriptor = state.orchestrator.describe_task(&task_id).await?;
    Ok(Json(descriptor).into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest {
    task_id: String,
    client_id: String,
    update: Vec<f32>,
    model_version: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    message: String,
    model_version: u64,
}

async fn submit_update(
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>, UpdateErr> {
    let version = state
        .orchestrator
        .submit_update(&req.task_id, &req.update, req.model_version)
        .await
        .inspect_err(|e| {
            warn!(
                task = req.task_id.as_str(),
                client = req.client_id.as_str(),
                kind = e.kind();
                "update rejected"
            );
        })?;

    Ok(Json(UpdateResponse {
        message: "Model update received".to_string(),
        model_version: version,
    }))
}

async fn download(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, UpdateErr> {
    match state.storage.read(&path).await {
        Ok(bytes) => Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            bytes,
        )
            .into_response()),
        Err(StorageErr::NotFound { .. }) => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("File {path} not found") })),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}
