//! HTTP API over the task service
//!
//! ```text
//! GET    /v1/tasks        list
//! POST   /v1/tasks        create        -> 201
//! GET    /v1/tasks/{id}   fetch
//! PATCH  /v1/tasks/{id}   partial update
//! DELETE /v1/tasks/{id}   remove        -> 204
//! GET    /health
//! ```
//!
//! Errors are returned as `{"error": "<message>"}` with coarse messages only;
//! internal failures are logged here and reported as a plain 500.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::service::TaskService;
use crate::task::{CreateTaskInput, Task, UpdateTaskInput};

#[derive(Clone)]
pub struct AppState {
    pub service: TaskService,
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler failure, already reduced to what a remote client may see.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    NotFound(&'static str),
    Internal,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::TaskNotFound(_) => ApiError::NotFound("task not found"),
            Error::EmptyTitle => ApiError::BadRequest("title is required"),
            Error::NoUpdateFields => ApiError::BadRequest("no fields provided for update"),
            other => {
                tracing::error!(error = %other, "request failed");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
        };
        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Build the application router.
pub fn router(service: TaskService) -> Router {
    Router::new()
        .route("/health", get(health_check_handler))
        .route("/v1/tasks", get(list_tasks).post(create_task))
        .route(
            "/v1/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

/// Serve `router` on `listener` until Ctrl-C.
pub async fn serve(listener: tokio::net::TcpListener, service: TaskService) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("task server listening on http://{}", addr);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("task server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}

/// Run a service call on the blocking pool; repository calls do file I/O.
async fn with_service<T, F>(state: AppState, f: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce(&TaskService) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state.service))
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "service task panicked");
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}

/// Ids are positive integers; anything else addresses no task.
fn parse_id(raw: &str) -> std::result::Result<u64, ApiError> {
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::NotFound("not found")),
    }
}

pub async fn health_check_handler() -> &'static str {
    "OK"
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound("not found")
}

async fn list_tasks(State(state): State<AppState>) -> std::result::Result<Json<Vec<Task>>, ApiError> {
    with_service(state, |svc| svc.list_tasks()).await.map(Json)
}

async fn create_task(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateTaskInput>, JsonRejection>,
) -> std::result::Result<(StatusCode, Json<Task>), ApiError> {
    let Json(input) = payload.map_err(|_| ApiError::BadRequest("invalid JSON body"))?;
    let task = with_service(state, move |svc| svc.create_task(input)).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> std::result::Result<Json<Task>, ApiError> {
    let id = parse_id(&raw_id)?;
    with_service(state, move |svc| svc.get_task(id)).await.map(Json)
}

async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: std::result::Result<Json<UpdateTaskInput>, JsonRejection>,
) -> std::result::Result<Json<Task>, ApiError> {
    let id = parse_id(&raw_id)?;
    let Json(input) = payload.map_err(|_| ApiError::BadRequest("invalid JSON body"))?;
    with_service(state, move |svc| svc.update_task(id, input))
        .await
        .map(Json)
}

async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> std::result::Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    with_service(state, move |svc| svc.delete_task(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
