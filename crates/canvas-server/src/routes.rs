//! REST route handlers
//!
//! The full surface:
//!   GET    /api/health                liveness + store connectivity
//!   GET    /api/projects?userId=ID    list visible projects
//!   GET    /api/projects/:projectId   fetch one
//!   POST   /api/projects              create (201, 400 on duplicate id)
//!   PUT    /api/projects/:projectId   replace mutable fields
//!   DELETE /api/projects/:projectId   remove
//!
//! Error bodies are `{"message": ...}`. Request-level failures never
//! propagate past the handler; the process keeps serving.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use libcanvas_api::{
    CreateProjectRequest, DeleteBody, ErrorBody, HealthBody, ListQuery, UpdateProjectRequest,
};
use libcanvas_core::{CanvasError, LockedStore, Project, ProjectId};

use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/:project_id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .with_state(state)
}

/// An error response: status plus `{"message": ...}` body
struct ApiFailure(StatusCode, String);

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorBody::new(self.1))).into_response()
    }
}

impl From<CanvasError> for ApiFailure {
    fn from(error: CanvasError) -> Self {
        let status = match &error {
            CanvasError::NotFound(_) => StatusCode::NOT_FOUND,
            CanvasError::Conflict(_)
            | CanvasError::Validation(_)
            | CanvasError::InvalidArgs(_) => StatusCode::BAD_REQUEST,
            CanvasError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %error, code = error.error_code(), "request failed");
        }
        ApiFailure(status, error.to_string())
    }
}

/// Reads against a downed store are attempted and fail with 500
fn store_for_read(state: &AppState) -> Result<&Arc<LockedStore>, ApiFailure> {
    state.store.as_ref().ok_or_else(|| {
        ApiFailure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error reading projects: database offline".to_string(),
        )
    })
}

/// Mutating verbs are rejected outright while the store is down
fn store_for_write(state: &AppState) -> Result<&Arc<LockedStore>, ApiFailure> {
    state.store.as_ref().ok_or_else(|| {
        CanvasError::StoreUnavailable("service temporarily unavailable (database offline)".to_string())
            .into()
    })
}

fn parse_id(raw: &str) -> Result<ProjectId, ApiFailure> {
    ProjectId::parse(raw)
        .map_err(|e| CanvasError::InvalidArgs(format!("invalid project id: {}", e)).into())
}

async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody::ok(state.store_connected()))
}

async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Project>>, ApiFailure> {
    let store = store_for_read(&state)?;
    let projects = store.list(query.user_id.as_deref())?;
    Ok(Json(projects))
}

async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Project>, ApiFailure> {
    let store = store_for_read(&state)?;
    let project_id = parse_id(&project_id)?;
    match store.get(&project_id)? {
        Some(project) => Ok(Json(project)),
        None => Err(CanvasError::project_not_found(project_id.as_str()).into()),
    }
}

async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiFailure> {
    let store = store_for_write(&state)?;
    let stored = store.create(&request.into_project())?;
    info!(project = %stored.project_id, "project created");
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(changes): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiFailure> {
    let store = store_for_write(&state)?;
    let project_id = parse_id(&project_id)?;
    let updated = store.update(&project_id, &changes)?;
    Ok(Json(updated))
}

async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<DeleteBody>, ApiFailure> {
    let store = store_for_write(&state)?;
    let project_id = parse_id(&project_id)?;
    store.delete(&project_id)?;
    info!(project = %project_id, "project deleted");
    Ok(Json(DeleteBody::deleted(&project_id)))
}
