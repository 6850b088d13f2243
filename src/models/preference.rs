use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// Пожелание участника по рассадке на конкретное событие.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Default)]
pub struct Preference {
    pub id: i64,
    pub event_id: i64,
    pub member_id: i64,
    pub preferred_zone: Option<String>,
    pub preferred_seat_code: Option<String>,
    pub wants_aisle: bool,
    pub needs_accessible: bool,
    pub group_code: Option<String>,
    pub assigned_seat_id: Option<i64>,
}

impl Preference {
    /// Код группы, если он не пустой.
    pub fn group(&self) -> Option<&str> {
        self.group_code.as_deref().filter(|g| !g.is_empty())
    }

    pub async fn for_event<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: i64,
    ) -> Result<Vec<Preference>, sqlx::Error> {
        sqlx::query_as::<_, Preference>(
            r#"
            SELECT id, event_id, member_id, preferred_zone, preferred_seat_code,
                   wants_aisle, needs_accessible, group_code, assigned_seat_id
            FROM member_preferences
            WHERE event_id = $1
            ORDER BY id
            "#,
        )
        .bind(event_id)
        .fetch_all(executor)
        .await
    }

    // Полная пересборка начинается с обнуления всех назначений события
    pub async fn clear_all<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: i64,
    ) -> Result<u64, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE member_preferences
            SET assigned_seat_id = NULL, updated_at = NOW()
            WHERE event_id = $1 AND assigned_seat_id IS NOT NULL
            "#,
        )
        .bind(event_id)
        .execute(executor)
        .await
        .map(|r| r.rows_affected())
    }

    // Одним запросом записываем пары (preference_id, seat_id)
    pub async fn store_assignments<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: i64,
        assignments: &[(i64, i64)],
    ) -> Result<u64, sqlx::Error> {
        if assignments.is_empty() {
            return Ok(0);
        }

        let (ids, seat_ids): (Vec<i64>, Vec<i64>) = assignments.iter().copied().unzip();

        sqlx::query(
            r#"
            UPDATE member_preferences AS p
            SET assigned_seat_id = v.seat_id, updated_at = NOW()
            FROM UNNEST($2::BIGINT[], $3::BIGINT[]) AS v(id, seat_id)
            WHERE p.id = v.id AND p.event_id = $1
            "#,
        )
        .bind(event_id)
        .bind(&ids)
        .bind(&seat_ids)
        .execute(executor)
        .await
        .map(|r| r.rows_affected())
    }

    pub async fn set_seat<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: i64,
        preference_id: i64,
        seat_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE member_preferences
            SET assigned_seat_id = $3, updated_at = NOW()
            WHERE id = $2 AND event_id = $1
            "#,
        )
        .bind(event_id)
        .bind(preference_id)
        .bind(seat_id)
        .execute(executor)
        .await
        .map(|r| r.rows_affected() > 0)
    }
}

/// Участник события вместе с назначенным местом.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Participant {
    pub preference_id: i64,
    pub member_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub invite_token: Uuid,
    pub needs_accessible: bool,
    pub group_code: Option<String>,
    pub assigned_seat_id: Option<i64>,
    pub assigned_seat_code: Option<String>,
}

impl Participant {
    pub async fn for_event<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: i64,
    ) -> Result<Vec<Participant>, sqlx::Error> {
        sqlx::query_as::<_, Participant>(
            r#"
            SELECT p.id AS preference_id,
                   p.member_id,
                   COALESCE(m.first_name, '') AS first_name,
                   m.last_name,
                   m.phone,
                   p.invite_token,
                   p.needs_accessible,
                   p.group_code,
                   p.assigned_seat_id,
                   s.code AS assigned_seat_code
            FROM member_preferences p
            LEFT JOIN members m ON m.id = p.member_id
            LEFT JOIN seats s ON s.id = p.assigned_seat_id
            WHERE p.event_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(event_id)
        .fetch_all(executor)
        .await
    }
}
