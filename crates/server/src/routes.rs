use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::{info, Level};

use common::types::Health;
use service::counter::{Counter, CounterStore};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn CounterStore>,
}

#[derive(Debug, Deserialize)]
pub struct CreateParams {
    pub name: String,
    #[serde(default)]
    pub initial: i64,
}

#[derive(Debug, Deserialize)]
pub struct NameParams {
    pub name: String,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the Counter API! Use /counter endpoints to interact."
    }))
}

// Blank names never reach the store; the store only defines conflict and
// not-found outcomes.
fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    Ok(())
}

async fn create_counter(
    State(state): State<ServerState>,
    Query(params): Query<CreateParams>,
) -> Result<Json<Counter>, ApiError> {
    validate_name(&params.name)?;
    let counter = state.store.create(&params.name, params.initial).await?;
    info!(name = %counter.name, value = counter.value, "created counter");
    Ok(Json(counter))
}

async fn get_counter(
    State(state): State<ServerState>,
    Query(params): Query<NameParams>,
) -> Result<Json<Counter>, ApiError> {
    validate_name(&params.name)?;
    let counter = state.store.get(&params.name).await?;
    Ok(Json(counter))
}

async fn increment_counter(
    State(state): State<ServerState>,
    Query(params): Query<NameParams>,
) -> Result<Json<Counter>, ApiError> {
    validate_name(&params.name)?;
    let counter = state.store.increment(&params.name).await?;
    info!(name = %counter.name, value = counter.value, "incremented counter");
    Ok(Json(counter))
}

async fn delete_counter(
    State(state): State<ServerState>,
    Query(params): Query<NameParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_name(&params.name)?;
    state.store.delete(&params.name).await?;
    info!(name = %params.name, "deleted counter");
    Ok(Json(serde_json::json!({
        "message": format!("Counter '{}' deleted.", params.name)
    })))
}

/// Build the full application router: the welcome/health routes plus the
/// counter endpoints
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health));

    let counters = Router::new()
        .route("/counter", get(get_counter))
        .route("/counter/create", post(create_counter))
        .route("/counter/increment", post(increment_counter))
        .route("/counter/delete", delete(delete_counter));

    // Compose
    public
        .merge(counters)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
