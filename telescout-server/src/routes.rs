//! HTTP surface. Thin by design: parse the form, call the pipeline, shape
//! the JSON. Internal failures never leak detail to the client.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::orchestrator::Orchestrator;

pub struct AppState {
    pub orchestrator: Orchestrator,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route(
            "/api/retrieve-telegram-messages",
            post(retrieve_telegram_messages),
        )
        .layer(cors)
        .with_state(state)
}

async fn home() -> impl IntoResponse {
    Json("Telescout channel discovery service")
}

#[derive(Debug, Deserialize)]
struct RetrieveRequest {
    search_query: String,
}

async fn retrieve_telegram_messages(
    State(state): State<Arc<AppState>>,
    Form(request): Form<RetrieveRequest>,
) -> impl IntoResponse {
    match state.orchestrator.retrieve(&request.search_query).await {
        Ok(messages_info) => (
            StatusCode::OK,
            Json(json!({ "messages_info": messages_info })),
        ),
        Err(e) => {
            error!(query = %request.search_query, error = %e, "message retrieval failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
        }
    }
}
