//! Сервис рассадки поверх настоящего Postgres: транзакции, блокировки, уникальный индекс.
//!
//! Каждый тест получает чистую базу с применёнными миграциями (`#[sqlx::test]`).

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use sqlx::PgPool;

use seatflow::engine::{AssignmentError, Weights};
use seatflow::error::AppError;
use seatflow::models::{Event, Preference};
use seatflow::services::AssignmentService;

// ---------------------------------------------------------------------------
// Подготовка данных
// ---------------------------------------------------------------------------

async fn venue(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO venues (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn seat(pool: &PgPool, venue_id: i64, code: &str, x: i32, accessible: bool) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO seats (venue_id, code, zone, x, y, is_accessible)
        VALUES ($1, $2, 'Main', $3, 0, $4)
        RETURNING id
        "#,
    )
    .bind(venue_id)
    .bind(code)
    .bind(x)
    .bind(accessible)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn attendee(pool: &PgPool, event_id: i64, first_name: &str, needs_accessible: bool) -> i64 {
    let member_id: i64 = sqlx::query_scalar(
        "INSERT INTO members (first_name, last_name) VALUES ($1, 'Test') RETURNING id",
    )
    .bind(first_name)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query_scalar(
        r#"
        INSERT INTO member_preferences (event_id, member_id, needs_accessible)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(event_id)
    .bind(member_id)
    .bind(needs_accessible)
    .fetch_one(pool)
    .await
    .unwrap()
}

struct Hall {
    event_id: i64,
    accessible_seat: i64,
    plain_seat: i64,
    needs_access: i64,
    regular: i64,
}

/// Площадка из двух мест (первое доступное) и событие с двумя участниками.
async fn hall(pool: &PgPool) -> Hall {
    let venue_id = venue(pool, "Main Hall").await;
    let accessible_seat = seat(pool, venue_id, "A-1", 0, true).await;
    let plain_seat = seat(pool, venue_id, "A-2", 10, false).await;
    let event = Event::create(pool, venue_id, "Gala", None).await.unwrap();
    let needs_access = attendee(pool, event.id, "Ada", true).await;
    let regular = attendee(pool, event.id, "Bob", false).await;

    Hall { event_id: event.id, accessible_seat, plain_seat, needs_access, regular }
}

async fn stored(pool: &PgPool, event_id: i64) -> Vec<(i64, Option<i64>)> {
    Preference::for_event(pool, event_id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.id, p.assigned_seat_id))
        .collect()
}

// ---------------------------------------------------------------------------
// Общий прогон
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./src/migrations")]
async fn run_stores_assignments_and_rerun_is_stable(pool: PgPool) {
    let h = hall(&pool).await;
    let service = AssignmentService::new(pool.clone());

    let summary = service.run(h.event_id, Weights::default()).await.unwrap();
    assert_eq!((summary.total, summary.assigned, summary.unassigned), (2, 2, 0));

    let first = stored(&pool, h.event_id).await;
    assert_eq!(
        first,
        vec![(h.needs_access, Some(h.accessible_seat)), (h.regular, Some(h.plain_seat))]
    );

    service.run(h.event_id, Weights::default()).await.unwrap();
    assert_eq!(stored(&pool, h.event_id).await, first);
    assert!(service.issues(h.event_id).await.unwrap().is_clean());
}

#[sqlx::test(migrations = "./src/migrations")]
async fn rerun_can_swap_seats_between_attendees(pool: PgPool) {
    let h = hall(&pool).await;
    let service = AssignmentService::new(pool.clone());

    // обычный участник занял доступное место, нуждающийся остался без места
    service.move_to_seat(h.event_id, h.regular, h.accessible_seat).await.unwrap();
    let report = service.issues(h.event_id).await.unwrap();
    assert_eq!(report.summary.unassigned, 1);

    // новый прогон переставляет обоих в одной транзакции, не задевая уникальный индекс
    service.run(h.event_id, Weights::default()).await.unwrap();
    assert_eq!(
        stored(&pool, h.event_id).await,
        vec![(h.needs_access, Some(h.accessible_seat)), (h.regular, Some(h.plain_seat))]
    );
}

#[sqlx::test(migrations = "./src/migrations")]
async fn run_waits_for_the_event_lock(pool: PgPool) {
    let h = hall(&pool).await;
    let service = AssignmentService::new(pool.clone());

    let mut holder = pool.begin().await.unwrap();
    Event::lock(&mut *holder, h.event_id).await.unwrap().unwrap();

    let event_id = h.event_id;
    let waiting = tokio::spawn(async move { service.run(event_id, Weights::default()).await });

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!waiting.is_finished(), "run must wait while the event row is locked");
    assert_eq!(stored(&pool, h.event_id).await, vec![(h.needs_access, None), (h.regular, None)]);

    holder.commit().await.unwrap();
    let summary = waiting.await.unwrap().unwrap();
    assert_eq!(summary.assigned, 2);
}

// ---------------------------------------------------------------------------
// Ручные правки и уникальность
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./src/migrations")]
async fn move_onto_held_seat_is_rejected_and_rows_stay(pool: PgPool) {
    let h = hall(&pool).await;
    let service = AssignmentService::new(pool.clone());
    service.run(h.event_id, Weights::default()).await.unwrap();
    let before = stored(&pool, h.event_id).await;

    let err = service
        .move_to_seat(h.event_id, h.regular, h.accessible_seat)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Assignment(AssignmentError::SeatTaken { seat_id, holder_id })
            if seat_id == h.accessible_seat && holder_id == h.needs_access
    ));
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    assert_eq!(stored(&pool, h.event_id).await, before);
}

#[sqlx::test(migrations = "./src/migrations")]
async fn duplicate_seat_is_stopped_by_unique_index(pool: PgPool) {
    let h = hall(&pool).await;
    Preference::set_seat(&pool, h.event_id, h.needs_access, Some(h.plain_seat))
        .await
        .unwrap();

    let err = Preference::set_seat(&pool, h.event_id, h.regular, Some(h.plain_seat))
        .await
        .unwrap_err();

    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_member_preferences_event_seat"));
    assert_eq!(AppError::Database(err).into_response().status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./src/migrations")]
async fn clear_then_move_round_trip(pool: PgPool) {
    let h = hall(&pool).await;
    let service = AssignmentService::new(pool.clone());
    service.run(h.event_id, Weights::default()).await.unwrap();

    service.clear_seat(h.event_id, h.regular).await.unwrap();
    let report = service.issues(h.event_id).await.unwrap();
    assert_eq!(report.unassigned.len(), 1);
    assert_eq!(report.unassigned[0].preference_id, h.regular);

    let moved = service.move_to_seat(h.event_id, h.regular, h.plain_seat).await.unwrap();
    assert_eq!(moved.assigned_seat_id, Some(h.plain_seat));
    assert!(service.issues(h.event_id).await.unwrap().is_clean());
}

// ---------------------------------------------------------------------------
// Отчёт и отсутствующие сущности
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./src/migrations")]
async fn unknown_event_is_not_found(pool: PgPool) {
    let service = AssignmentService::new(pool);

    let err = service.run(9_999, Weights::default()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { entity: "Event", id: 9_999 }));
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

    let err = service.issues(9_999).await.unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

    let err = service.clear_seat(9_999, 1).await.unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./src/migrations")]
async fn issues_cover_seats_of_another_venue(pool: PgPool) {
    let h = hall(&pool).await;
    let other_venue = venue(&pool, "Annex").await;
    let foreign = seat(&pool, other_venue, "X-1", 0, false).await;
    sqlx::query("UPDATE seats SET is_blocked = TRUE WHERE id = $1")
        .bind(foreign)
        .execute(&pool)
        .await
        .unwrap();
    Preference::set_seat(&pool, h.event_id, h.needs_access, Some(foreign))
        .await
        .unwrap();

    let report = AssignmentService::new(pool).issues(h.event_id).await.unwrap();

    assert_eq!(report.summary.blocked_assignments, 1);
    assert_eq!(report.blocked_assignments[0].seat_code, "X-1");
    assert_eq!(report.summary.accessibility_violations, 1);
}
