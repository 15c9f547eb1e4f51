//! Route definitions.

pub mod health;

use axum::http::{StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::handlers::dispatch::front_controller;
use crate::state::AppState;

/// The front controller, mounted on both script paths.
///
/// ```text
/// GET|POST  /            front_controller
/// GET|POST  /index.php   front_controller
/// ```
pub fn forum_router() -> Router<AppState> {
    Router::new()
        .route("/", get(front_controller).post(front_controller))
        .route("/index.php", get(front_controller).post(front_controller))
}

/// Fallback for paths outside the forum, in the same shape as handler errors.
pub async fn not_found(uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": format!("No route for {}", uri.path()),
            "code": "NOT_FOUND",
        })),
    )
}
