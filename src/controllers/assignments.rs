//! assignments.rs
//!
//! HTTP-обёртка над движком рассадки:
//! - общий прогон с весами из тела запроса;
//! - ручной перенос и снятие места;
//! - отчёт о нарушениях (кешируется до следующей правки).

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::engine::{IssuesReport, RunSummary, Weights};
use crate::error::{AppError, AppResult};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events/{event_id}/assignments/run", post(run_assignments))
        .route("/events/{event_id}/assignments/move", post(move_assignment))
        .route("/events/{event_id}/assignments/clear", post(clear_assignment))
        .route("/events/{event_id}/issues", get(event_issues))
}

/// Тело запуска необязательно; пустое тело - веса по умолчанию.
pub fn parse_run_payload(body: &[u8]) -> AppResult<Option<Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub event_id: i64,
    #[serde(flatten)]
    pub summary: RunSummary,
}

// POST /api/events/{event_id}/assignments/run
async fn run_assignments(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    body: Bytes,
) -> AppResult<Json<RunResponse>> {
    let payload = parse_run_payload(&body)?;
    let weights = Weights::from_request(payload.as_ref());

    let summary = state.assignments.run(event_id, weights).await?;
    state.cache.invalidate_event(event_id).await;

    Ok(Json(RunResponse { event_id, summary }))
}

#[derive(Debug, Deserialize)]
pub struct MoveQuery {
    pub preference_id: i64,
    pub seat_id: i64,
}

// POST /api/events/{event_id}/assignments/move?preference_id=..&seat_id=..
async fn move_assignment(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Query(params): Query<MoveQuery>,
) -> AppResult<impl IntoResponse> {
    state
        .assignments
        .move_to_seat(event_id, params.preference_id, params.seat_id)
        .await?;
    state.cache.invalidate_event(event_id).await;

    Ok(Json(serde_json::json!({
        "ok": true,
        "event_id": event_id,
        "preference_id": params.preference_id,
        "seat_id": params.seat_id,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ClearQuery {
    pub preference_id: i64,
}

// POST /api/events/{event_id}/assignments/clear?preference_id=..
async fn clear_assignment(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Query(params): Query<ClearQuery>,
) -> AppResult<impl IntoResponse> {
    state
        .assignments
        .clear_seat(event_id, params.preference_id)
        .await?;
    state.cache.invalidate_event(event_id).await;

    Ok(Json(serde_json::json!({
        "ok": true,
        "event_id": event_id,
        "preference_id": params.preference_id,
    })))
}

// GET /api/events/{event_id}/issues
async fn event_issues(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<IssuesReport>> {
    // Поколение читается до БД: отчёт, устаревший из-за параллельной правки, уйдёт в старый ключ
    let slot = state.cache.report_slot(event_id).await;
    if let Some(slot) = &slot {
        if let Some(report) = state.cache.get_issues(slot).await {
            return Ok(Json(report));
        }
    }

    let report = state.assignments.issues(event_id).await?;
    if let Some(slot) = &slot {
        state.cache.cache_issues(slot, &report).await;
    }

    Ok(Json(report))
}
