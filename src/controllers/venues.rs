use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{event::venue_exists, Event, Seat};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/venues/{venue_id}/seats", get(list_seats))
        .route("/venues/{venue_id}/seats/{seat_id}", patch(update_seat))
}

// GET /api/venues/{venue_id}/seats
async fn list_seats(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> AppResult<Json<Vec<Seat>>> {
    if !venue_exists(&state.db.pool, venue_id).await? {
        return Err(AppError::NotFound { entity: "Venue", id: venue_id });
    }
    Ok(Json(Seat::for_venue(&state.db.pool, venue_id, true).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSeatRequest {
    pub is_blocked: bool,
}

// PATCH /api/venues/{venue_id}/seats/{seat_id}
//
// Блокировка не снимает уже выданные назначения: они попадут в отчёт
// blocked_assignments и исчезнут при следующем общем прогоне.
async fn update_seat(
    State(state): State<Arc<AppState>>,
    Path((venue_id, seat_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateSeatRequest>,
) -> AppResult<Json<Seat>> {
    let seat = Seat::set_blocked(&state.db.pool, venue_id, seat_id, req.is_blocked)
        .await?
        .ok_or(AppError::NotFound { entity: "Seat", id: seat_id })?;

    tracing::info!(venue_id, seat_id, is_blocked = seat.is_blocked, "Seat block flag updated");

    // Отчёты всех событий на этой площадке устарели
    let event_ids = Event::ids_for_venue(&state.db.pool, venue_id).await?;
    state.cache.invalidate_events(&event_ids).await;

    Ok(Json(seat))
}
