use axum::{
    extract::{Host, Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use bundler_core::{LifecycleError, TaskSnapshot};
use serde::{Deserialize, Serialize};

use crate::effects;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/tasks", post(create_task))
        .route("/tasks/:id", get(get_task))
        .route("/tasks/:id/urls", post(add_url))
        .route("/download/:filename", get(download_archive))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct TaskCreated {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AddUrlForm {
    #[serde(default)]
    url: String,
}

async fn create_task(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<TaskCreated>), (StatusCode, String)> {
    match state.store.create_task() {
        Ok(task) => {
            log::info!("created task {}", task.id);
            Ok((StatusCode::CREATED, Json(TaskCreated { id: task.id })))
        }
        Err(err) => Err((StatusCode::SERVICE_UNAVAILABLE, err.to_string())),
    }
}

async fn add_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<AddUrlForm>,
) -> Result<StatusCode, (StatusCode, String)> {
    if form.url.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "URL required".to_string()));
    }
    match state.store.add_url(&id, &form.url) {
        Ok(effect) => {
            // The store's critical section is over; any hand-off it returned
            // is executed from here, outside the lock.
            if let Some(effect) = effect {
                effects::execute(state.clone(), effect);
            }
            Ok(StatusCode::OK)
        }
        Err(err) => Err((status_for(&err), err.to_string())),
    }
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Host(host): Host,
) -> Result<Json<TaskSnapshot>, (StatusCode, String)> {
    let mut task = state
        .store
        .get_task(&id)
        .map_err(|err| (status_for(&err), err.to_string()))?;
    // The store keeps a host-agnostic locator; qualify it for this caller.
    if let Some(relative) = task.archive.take() {
        task.archive = Some(format!("http://{host}{relative}"));
    }
    Ok(Json(task))
}

async fn download_archive(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // Route matching already limits this to one path segment; reject
    // anything that could still climb out of the artifact directory.
    if filename.contains('/') || filename.contains("..") {
        return Err((StatusCode::NOT_FOUND, "file not found".to_string()));
    }
    let path = state.artifact_dir.join(&filename);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok((
            [
                (CONTENT_TYPE, "application/zip".to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            bytes,
        )),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err((StatusCode::NOT_FOUND, "file not found".to_string()))
        }
        Err(err) => Err((StatusCode::INTERNAL_SERVER_ERROR, err.to_string())),
    }
}

fn status_for(err: &LifecycleError) -> StatusCode {
    match err {
        LifecycleError::TaskNotFound => StatusCode::NOT_FOUND,
        LifecycleError::CapacityExceeded => StatusCode::FORBIDDEN,
        LifecycleError::UnsupportedType => StatusCode::BAD_REQUEST,
    }
}
