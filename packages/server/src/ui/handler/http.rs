//! Admin HTTP API endpoint handlers (read-only).

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    infrastructure::dto::http::{HistoryDto, RoomStateDto},
    ui::state::AppState,
};

/// Build the admin router
pub fn admin_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/room", get(get_room))
        .route("/api/history", get(get_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current participants and history size
pub async fn get_room(State(state): State<Arc<AppState>>) -> Json<RoomStateDto> {
    let room = state.get_room_state_usecase.execute().await;
    Json(room.into())
}

/// Full chat history in broadcast order
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<HistoryDto> {
    let history = state.get_room_state_usecase.history().await;
    Json(history.into())
}
