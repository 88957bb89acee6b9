mod contact_handlers;

use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;

use crate::middleware::bot_guard::bot_guard;
use crate::state::AppState;

/// Form endpoints. Guarded against bots here; main.rs adds the per-IP governor.
pub fn contact_router() -> Router<AppState> {
    Router::new()
        .route("/verify-email", post(contact_handlers::verify_email))
        .route("/contact", post(contact_handlers::contact))
        .layer(from_fn(bot_guard))
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
