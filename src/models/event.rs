use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub venue_id: i64,
    pub name: String,
    pub event_date: Option<NaiveDateTime>,
    pub status: String,
}

/// Жизненный цикл события: draft -> preferences_open -> locked -> published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    PreferencesOpen,
    Locked,
    Published,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::PreferencesOpen => "preferences_open",
            EventStatus::Locked => "locked",
            EventStatus::Published => "published",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EventStatus::Draft),
            "preferences_open" => Ok(EventStatus::PreferencesOpen),
            "locked" => Ok(EventStatus::Locked),
            "published" => Ok(EventStatus::Published),
            other => Err(format!("unknown event status: {other}")),
        }
    }
}

/// Событие вместе с агрегатами для списков.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventSummary {
    pub id: i64,
    pub venue_id: i64,
    pub name: String,
    pub event_date: Option<NaiveDateTime>,
    pub status: String,
    pub venue_name: Option<String>,
    pub attendees_count: i64,
    pub assigned_count: i64,
}

const SUMMARY_SELECT: &str = r#"
    SELECT e.id, e.venue_id, e.name, e.event_date, e.status,
           v.name AS venue_name,
           COUNT(p.id) AS attendees_count,
           COUNT(p.assigned_seat_id) AS assigned_count
    FROM events e
    LEFT JOIN venues v ON v.id = e.venue_id
    LEFT JOIN member_preferences p ON p.event_id = e.id
"#;

impl Event {
    pub async fn find<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: i64,
    ) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            "SELECT id, venue_id, name, event_date, status FROM events WHERE id = $1",
        )
        .bind(event_id)
        .fetch_optional(executor)
        .await
    }

    // Блокировка строки события: все мутации назначений одного события идут последовательно
    pub async fn lock<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: i64,
    ) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            "SELECT id, venue_id, name, event_date, status FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(event_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn ids_for_venue<'e, E: PgExecutor<'e>>(
        executor: E,
        venue_id: i64,
    ) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM events WHERE venue_id = $1 ORDER BY id")
            .bind(venue_id)
            .fetch_all(executor)
            .await
    }

    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        venue_id: i64,
        name: &str,
        event_date: Option<NaiveDateTime>,
    ) -> Result<Event, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (venue_id, name, event_date, status)
            VALUES ($1, $2, $3, 'draft')
            RETURNING id, venue_id, name, event_date, status
            "#,
        )
        .bind(venue_id)
        .bind(name)
        .bind(event_date)
        .fetch_one(executor)
        .await
    }

    pub async fn update_status<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: i64,
        status: EventStatus,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query("UPDATE events SET status = $2 WHERE id = $1")
            .bind(event_id)
            .bind(status.as_str())
            .execute(executor)
            .await
            .map(|r| r.rows_affected() > 0)
    }
}

impl EventSummary {
    pub async fn list<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<EventSummary>, sqlx::Error> {
        let sql = format!("{SUMMARY_SELECT} GROUP BY e.id, v.name ORDER BY e.id");
        sqlx::query_as::<_, EventSummary>(&sql)
            .fetch_all(executor)
            .await
    }

    pub async fn find<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: i64,
    ) -> Result<Option<EventSummary>, sqlx::Error> {
        let sql = format!("{SUMMARY_SELECT} WHERE e.id = $1 GROUP BY e.id, v.name");
        sqlx::query_as::<_, EventSummary>(&sql)
            .bind(event_id)
            .fetch_optional(executor)
            .await
    }
}

pub async fn venue_exists<'e, E: PgExecutor<'e>>(executor: E, venue_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM venues WHERE id = $1)")
        .bind(venue_id)
        .fetch_one(executor)
        .await
}
