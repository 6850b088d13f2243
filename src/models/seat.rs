use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Seat {
    pub id: i64,
    pub venue_id: i64,
    pub code: String,
    pub zone: Option<String>,
    pub row_label: Option<String>,
    pub seat_number: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub is_accessible: bool,
    pub is_aisle: bool,
    pub is_blocked: bool,
}

impl Seat {
    /// Координаты места, если заданы обе.
    pub fn point(&self) -> Option<(f64, f64)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some((f64::from(x), f64::from(y))),
            _ => None,
        }
    }

    // Места площадки в порядке id; заблокированные - по запросу
    pub async fn for_venue<'e, E: PgExecutor<'e>>(
        executor: E,
        venue_id: i64,
        include_blocked: bool,
    ) -> Result<Vec<Seat>, sqlx::Error> {
        sqlx::query_as::<_, Seat>(
            r#"
            SELECT id, venue_id, code, zone, row_label, seat_number, x, y,
                   is_accessible, is_aisle, is_blocked
            FROM seats
            WHERE venue_id = $1 AND ($2 OR NOT is_blocked)
            ORDER BY id
            "#,
        )
        .bind(venue_id)
        .bind(include_blocked)
        .fetch_all(executor)
        .await
    }

    // Места, на которые посажены участники события, но принадлежащие другой площадке
    pub async fn assigned_outside_venue<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: i64,
        venue_id: i64,
    ) -> Result<Vec<Seat>, sqlx::Error> {
        sqlx::query_as::<_, Seat>(
            r#"
            SELECT DISTINCT s.id, s.venue_id, s.code, s.zone, s.row_label, s.seat_number,
                   s.x, s.y, s.is_accessible, s.is_aisle, s.is_blocked
            FROM member_preferences p
            JOIN seats s ON s.id = p.assigned_seat_id
            WHERE p.event_id = $1 AND s.venue_id <> $2
            ORDER BY s.id
            "#,
        )
        .bind(event_id)
        .bind(venue_id)
        .fetch_all(executor)
        .await
    }

    // Оператор блокирует/разблокирует место
    pub async fn set_blocked<'e, E: PgExecutor<'e>>(
        executor: E,
        venue_id: i64,
        seat_id: i64,
        is_blocked: bool,
    ) -> Result<Option<Seat>, sqlx::Error> {
        sqlx::query_as::<_, Seat>(
            r#"
            UPDATE seats
            SET is_blocked = $3
            WHERE id = $2 AND venue_id = $1
            RETURNING id, venue_id, code, zone, row_label, seat_number, x, y,
                      is_accessible, is_aisle, is_blocked
            "#,
        )
        .bind(venue_id)
        .bind(seat_id)
        .bind(is_blocked)
        .fetch_optional(executor)
        .await
    }
}
