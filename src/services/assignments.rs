//! assignments.rs
//!
//! Сервисный слой рассадки: связывает чистый движок (`crate::engine`) с Postgres.
//!
//! Все изменяющие операции (общий прогон, перенос, снятие места) выполняются в одной
//! транзакции и начинаются с `SELECT ... FOR UPDATE` строки события, поэтому
//! для одного события они идут строго по очереди. Читатели видят только
//! зафиксированный результат: "обнулить всё и назначить заново" не виден снаружи.
//! Уникальный индекс `uq_member_preferences_event_seat` дополнительно страхует
//! от двойного назначения места на уровне БД.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, warn};

use crate::engine::{self, IssuesReport, RunSummary, Weights};
use crate::error::{AppError, AppResult};
use crate::models::{Event, Participant, Preference, Seat};
use crate::services::seatmap::{build_seatmap, SeatmapEntry};

#[derive(Clone)]
pub struct AssignmentService {
    pool: PgPool,
}

impl AssignmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Полная пересборка назначений события.
    pub async fn run(&self, event_id: i64, weights: Weights) -> AppResult<RunSummary> {
        let mut tx = self.pool.begin().await?;

        let event = Event::lock(&mut *tx, event_id)
            .await?
            .ok_or_else(|| AppError::event_not_found(event_id))?;

        let seats = Seat::for_venue(&mut *tx, event.venue_id, false).await?;
        let mut preferences = Preference::for_event(&mut *tx, event_id).await?;

        let summary = engine::allocate(&seats, &mut preferences, weights);

        let assignments: Vec<(i64, i64)> = preferences
            .iter()
            .filter_map(|p| p.assigned_seat_id.map(|seat_id| (p.id, seat_id)))
            .collect();

        // Сначала обнуляем всё, иначе уникальный индекс сработает на перестановках
        Preference::clear_all(&mut *tx, event_id).await?;
        Preference::store_assignments(&mut *tx, event_id, &assignments).await?;

        tx.commit().await?;

        info!(
            event_id,
            total = summary.total,
            assigned = summary.assigned,
            unassigned = summary.unassigned,
            preference_weight = summary.weights.preference_weight,
            group_weight = summary.weights.group_weight,
            stability_weight = summary.weights.stability_weight,
            seats = seats.len(),
            "Assignment run committed"
        );

        Ok(summary)
    }

    /// Ручной перенос участника на конкретное место.
    pub async fn move_to_seat(
        &self,
        event_id: i64,
        preference_id: i64,
        seat_id: i64,
    ) -> AppResult<Preference> {
        let mut tx = self.pool.begin().await?;

        let event = Event::lock(&mut *tx, event_id)
            .await?
            .ok_or_else(|| AppError::event_not_found(event_id))?;

        let seats = Seat::for_venue(&mut *tx, event.venue_id, true).await?;
        let mut preferences = Preference::for_event(&mut *tx, event_id).await?;

        let moved = engine::move_assignment(&mut preferences, &seats, preference_id, seat_id)
            .map_err(|e| {
                warn!(event_id, preference_id, seat_id, "Move rejected: {}", e);
                e
            })?
            .clone();

        store_seat(&mut tx, event_id, preference_id, moved.assigned_seat_id).await?;
        tx.commit().await?;

        info!(event_id, preference_id, seat_id, "Preference moved to seat");
        Ok(moved)
    }

    /// Снимает место с участника.
    pub async fn clear_seat(&self, event_id: i64, preference_id: i64) -> AppResult<Preference> {
        let mut tx = self.pool.begin().await?;

        // Для несуществующего события ответ тот же, что и для чужого пожелания
        if Event::lock(&mut *tx, event_id).await?.is_none() {
            return Err(engine::AssignmentError::PreferenceNotFound { preference_id }.into());
        }

        let mut preferences = Preference::for_event(&mut *tx, event_id).await?;
        let cleared = engine::clear_assignment(&mut preferences, preference_id)?.clone();

        store_seat(&mut tx, event_id, preference_id, None).await?;
        tx.commit().await?;

        info!(event_id, preference_id, "Preference seat cleared");
        Ok(cleared)
    }

    /// Отчёт о нарушениях по сохранённой рассадке.
    pub async fn issues(&self, event_id: i64) -> AppResult<IssuesReport> {
        let mut tx = self.snapshot().await?;

        let event = Event::find(&mut *tx, event_id)
            .await?
            .ok_or_else(|| AppError::event_not_found(event_id))?;

        // Чужие места тоже проверяются: блокировка и доступность не зависят от площадки
        let mut seats = Seat::for_venue(&mut *tx, event.venue_id, true).await?;
        let foreign = Seat::assigned_outside_venue(&mut *tx, event_id, event.venue_id).await?;
        if !foreign.is_empty() {
            warn!(event_id, seats = foreign.len(), "Assignments point outside the event venue");
        }
        seats.extend(foreign);
        let preferences = Preference::for_event(&mut *tx, event_id).await?;
        tx.commit().await?;

        let report = engine::collect_issues(&preferences, &seats);
        if !report.is_clean() {
            warn!(
                event_id,
                seat_conflicts = report.summary.seat_conflicts,
                blocked_assignments = report.summary.blocked_assignments,
                accessibility_violations = report.summary.accessibility_violations,
                unassigned = report.summary.unassigned,
                "Assignment issues found"
            );
        }
        Ok(report)
    }

    /// Схема зала с назначениями.
    pub async fn seatmap(&self, event_id: i64) -> AppResult<Vec<SeatmapEntry>> {
        let mut tx = self.snapshot().await?;

        let event = Event::find(&mut *tx, event_id)
            .await?
            .ok_or_else(|| AppError::event_not_found(event_id))?;

        let seats = Seat::for_venue(&mut *tx, event.venue_id, true).await?;
        let participants = Participant::for_event(&mut *tx, event_id).await?;
        tx.commit().await?;

        Ok(build_seatmap(seats, &participants))
    }

    // Чтение нескольких таблиц из одного согласованного снимка
    async fn snapshot(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }
}

async fn store_seat(
    tx: &mut Transaction<'static, Postgres>,
    event_id: i64,
    preference_id: i64,
    seat_id: Option<i64>,
) -> AppResult<()> {
    if Preference::set_seat(&mut **tx, event_id, preference_id, seat_id).await? {
        Ok(())
    } else {
        Err(engine::AssignmentError::PreferenceNotFound { preference_id }.into())
    }
}
