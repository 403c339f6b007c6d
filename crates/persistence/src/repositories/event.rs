//! Event repository for database operations.
//!
//! All reading queries derive `seats_taken` from the registrations table
//! and personalize `user_joined` for an optional viewer.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EventEntity, EventTypeDb, EventWithStatsEntity, OrganizerKindDb, SkillLevelDb};
use crate::metrics::QueryTimer;

/// Filter and pagination parameters for event listings.
///
/// All filters are independently optional and compose with AND.
#[derive(Debug, Clone, Default)]
pub struct EventListQuery {
    /// Case-insensitive substring match on the city.
    pub city: Option<String>,
    /// Inclusive lower bound on the event date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the event date.
    pub date_to: Option<NaiveDate>,
    pub skill_level: Option<SkillLevelDb>,
    pub event_type: Option<EventTypeDb>,
    /// Resume after this `(date, id)` position.
    pub after: Option<(NaiveDate, Uuid)>,
    pub limit: i64,
}

const EVENT_WITH_STATS_SELECT: &str = r#"
    SELECT
        e.id, e.organizer_id, e.organizer_kind,
        u.display_name AS organizer_name,
        e.title, e.description, e.city, e.address, e.date, e.time,
        e.event_type, e.skill_level, e.max_seats, e.image_url,
        (SELECT COUNT(*) FROM event_registrations r WHERE r.event_id = e.id) AS seats_taken,
        EXISTS(
            SELECT 1 FROM event_registrations r
            WHERE r.event_id = e.id AND r.user_id = $1
        ) AS user_joined
    FROM events e
    JOIN users u ON u.id = e.organizer_id
"#;

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        organizer_id: Uuid,
        organizer_kind: OrganizerKindDb,
        title: &str,
        description: &str,
        city: &str,
        address: &str,
        date: NaiveDate,
        time: &str,
        event_type: EventTypeDb,
        skill_level: SkillLevelDb,
        max_seats: i32,
        image_url: Option<&str>,
    ) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (
                organizer_id, organizer_kind, title, description, city, address,
                date, time, event_type, skill_level, max_seats, image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, organizer_id, organizer_kind, title, description, city, address,
                      date, time, event_type, skill_level, max_seats, image_url,
                      created_at, updated_at
            "#,
        )
        .bind(organizer_id)
        .bind(organizer_kind)
        .bind(title)
        .bind(description)
        .bind(city)
        .bind(address)
        .bind(date)
        .bind(time)
        .bind(event_type)
        .bind(skill_level)
        .bind(max_seats)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, organizer_id, organizer_kind, title, description, city, address,
                   date, time, event_type, skill_level, max_seats, image_url,
                   created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event with derived seat state, personalized for `viewer`.
    pub async fn find_with_stats(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<EventWithStatsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_with_stats");
        let sql = format!("{} WHERE e.id = $2", EVENT_WITH_STATS_SELECT);
        let result = sqlx::query_as::<_, EventWithStatsEntity>(&sql)
            .bind(viewer)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Organizer-restricted edit. Absent fields keep their value.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        city: Option<&str>,
        address: Option<&str>,
        date: Option<NaiveDate>,
        time: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                city = COALESCE($4, city),
                address = COALESCE($5, address),
                date = COALESCE($6, date),
                time = COALESCE($7, time),
                image_url = COALESCE($8, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, organizer_id, organizer_kind, title, description, city, address,
                      date, time, event_type, skill_level, max_seats, image_url,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(city)
        .bind(address)
        .bind(date)
        .bind(time)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List events matching the query, ordered by date then id.
    ///
    /// Fetches one row past `limit` so the caller can tell whether a next
    /// page exists.
    pub async fn list(
        &self,
        query: &EventListQuery,
        viewer: Option<Uuid>,
    ) -> Result<Vec<EventWithStatsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events");
        let (after_date, after_id) = match query.after {
            Some((date, id)) => (Some(date), Some(id)),
            None => (None, None),
        };
        let sql = format!(
            r#"{}
            WHERE ($2::text IS NULL OR e.city ILIKE '%' || $2 || '%')
              AND ($3::date IS NULL OR e.date >= $3)
              AND ($4::date IS NULL OR e.date <= $4)
              AND ($5::skill_level IS NULL OR e.skill_level = $5)
              AND ($6::event_type IS NULL OR e.event_type = $6)
              AND ($7::date IS NULL OR (e.date, e.id) > ($7::date, $8::uuid))
            ORDER BY e.date ASC, e.id ASC
            LIMIT $9
            "#,
            EVENT_WITH_STATS_SELECT
        );
        let result = sqlx::query_as::<_, EventWithStatsEntity>(&sql)
            .bind(viewer)
            .bind(query.city.as_deref())
            .bind(query.date_from)
            .bind(query.date_to)
            .bind(query.skill_level)
            .bind(query.event_type)
            .bind(after_date)
            .bind(after_id)
            .bind(query.limit + 1)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List events organized by a user, upcoming first.
    pub async fn list_organized_by(
        &self,
        organizer_id: Uuid,
    ) -> Result<Vec<EventWithStatsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_organized_by");
        let sql = format!(
            "{} WHERE e.organizer_id = $2 ORDER BY e.date ASC, e.id ASC",
            EVENT_WITH_STATS_SELECT
        );
        let result = sqlx::query_as::<_, EventWithStatsEntity>(&sql)
            .bind(Some(organizer_id))
            .bind(organizer_id)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List events a user holds a registration for, upcoming first.
    pub async fn list_joined_by(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<EventWithStatsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_joined_by");
        let sql = format!(
            r#"{}
            JOIN event_registrations mine ON mine.event_id = e.id AND mine.user_id = $2
            ORDER BY e.date ASC, e.id ASC
            "#,
            EVENT_WITH_STATS_SELECT
        );
        let result = sqlx::query_as::<_, EventWithStatsEntity>(&sql)
            .bind(Some(user_id))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_list_query_default_is_unfiltered() {
        let query = EventListQuery::default();
        assert!(query.city.is_none());
        assert!(query.date_from.is_none());
        assert!(query.skill_level.is_none());
        assert!(query.event_type.is_none());
        assert!(query.after.is_none());
    }
}
