use agora_db::repositories::MailQueueRepo;
use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Mails waiting in the queue; absent when the database is down.
    pub queued_mail: Option<i64>,
}

/// GET /health -- service, database, and mail-queue health.
///
/// Always 200; a database outage is reported as `"degraded"`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = agora_db::health_check(&state.pool).await.is_ok();
    let queued_mail = if db_healthy {
        MailQueueRepo::count(&state.pool).await.ok()
    } else {
        None
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        queued_mail,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
