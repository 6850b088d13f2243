use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{event::venue_exists, Event, EventStatus, EventSummary, Participant};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{event_id}", get(get_event))
        .route("/events/{event_id}/status", patch(update_event_status))
        .route("/events/{event_id}/participants", get(event_participants))
        .route("/events/{event_id}/seatmap", get(event_seatmap))
}

/* ---------- EVENTS ---------- */

// GET /api/events
async fn list_events(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<EventSummary>>> {
    let events = EventSummary::list(&state.db.pool).await?;
    Ok(Json(events))
}

// POST /api/events
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(range(min = 1, message = "venue_id must be positive"))]
    pub venue_id: i64,
    #[validate(length(max = 255, message = "name is too long"))]
    pub name: String,
    pub event_date: Option<NaiveDate>,
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Event name is required".to_string()));
    }

    if !venue_exists(&state.db.pool, req.venue_id).await? {
        return Err(AppError::NotFound { entity: "Venue", id: req.venue_id });
    }

    let event_date = req.event_date.and_then(|d| d.and_hms_opt(0, 0, 0));
    let event = Event::create(&state.db.pool, req.venue_id, name, event_date).await?;
    tracing::info!("Event {} created for venue {}", event.id, event.venue_id);

    let summary = EventSummary::find(&state.db.pool, event.id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("event {} vanished after insert", event.id)))?;

    Ok((StatusCode::CREATED, Json(summary)))
}

// GET /api/events/{event_id}
async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<EventSummary>> {
    EventSummary::find(&state.db.pool, event_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::event_not_found(event_id))
}

// PATCH /api/events/{event_id}/status
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

async fn update_event_status(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Json(req): Json<StatusUpdateRequest>,
) -> AppResult<Json<EventSummary>> {
    let status: EventStatus = req.status.parse().map_err(AppError::BadRequest)?;

    if !Event::update_status(&state.db.pool, event_id, status).await? {
        return Err(AppError::event_not_found(event_id));
    }
    tracing::info!("Event {} moved to status {}", event_id, status);

    get_event(State(state), Path(event_id)).await
}

/* ---------- PARTICIPANTS & SEATMAP ---------- */

#[derive(Debug, Serialize)]
pub struct ParticipantLink {
    pub preference_id: i64,
    pub member_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub invite_token: String,
    pub assigned_seat_code: Option<String>,
}

impl From<Participant> for ParticipantLink {
    fn from(p: Participant) -> Self {
        Self {
            preference_id: p.preference_id,
            member_id: p.member_id,
            first_name: p.first_name,
            last_name: p.last_name,
            phone: p.phone,
            invite_token: p.invite_token.to_string(),
            assigned_seat_code: p.assigned_seat_code,
        }
    }
}

// GET /api/events/{event_id}/participants
async fn event_participants(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<Vec<ParticipantLink>>> {
    if Event::find(&state.db.pool, event_id).await?.is_none() {
        return Err(AppError::event_not_found(event_id));
    }

    let participants = Participant::for_event(&state.db.pool, event_id).await?;
    Ok(Json(participants.into_iter().map(ParticipantLink::from).collect()))
}

// GET /api/events/{event_id}/seatmap
async fn event_seatmap(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let slot = state.cache.report_slot(event_id).await;
    if let Some(slot) = &slot {
        if let Some(cached) = state.cache.get_seatmap(slot).await {
            return Ok(([("X-Cache", "HIT")], Json(cached)));
        }
    }

    let seatmap = state.assignments.seatmap(event_id).await?;
    if let Some(slot) = &slot {
        state.cache.cache_seatmap(slot, &seatmap).await;
    }

    Ok(([("X-Cache", "MISS")], Json(seatmap)))
}
