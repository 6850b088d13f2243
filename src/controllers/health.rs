use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(|| async { "SeatFlow API v1.0" }))
        .route("/health", get(health))
}

// Без базы сервис бесполезен (503); без Redis работает, но без кеша
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let database = state.db.ping().await.is_ok();
    let redis = state.redis.ping().await.is_ok();

    let status = if database {
        StatusCode::OK
    } else {
        tracing::error!("Health check: database unreachable");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if database { "ok" } else { "degraded" },
            "database": database,
            "redis": redis,
        })),
    )
}
