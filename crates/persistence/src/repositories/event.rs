//! Event repository, including the transactional create and edit flows.

use domain::models::{EventFields, RosterDelta};
use sqlx::PgPool;
use uuid::Uuid;

use super::{invitation, squad};
use crate::entities::{EventEntity, EventKindDb};
use crate::metrics::QueryTimer;

const EVENT_COLUMNS: &str = "id, team_id, kind, title, opponent, location, event_date, start_time, meet_time, answer_by, notes, created_by, created_at, updated_at";

/// Repository for the events table.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts an event and a pending invitation for each invitee atomically.
    pub async fn create_event_with_roster(
        &self,
        team_id: Uuid,
        fields: &EventFields,
        created_by: Uuid,
        invitee_ids: &[Uuid],
    ) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event_with_roster");
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            INSERT INTO events (team_id, kind, title, opponent, location, event_date,
                                start_time, meet_time, answer_by, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(team_id)
        .bind(EventKindDb::from(fields.kind))
        .bind(&fields.title)
        .bind(&fields.opponent)
        .bind(&fields.location)
        .bind(fields.event_date)
        .bind(fields.start_time)
        .bind(fields.meet_time)
        .bind(fields.answer_by)
        .bind(&fields.notes)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        invitation::tx::record_invitations(&mut *tx, event.id, invitee_ids, created_by).await?;

        tx.commit().await?;
        timer.record();
        Ok(event)
    }

    /// Applies an event edit and its roster delta in one transaction.
    ///
    /// Order: update the event row, reset every invitation to pending,
    /// insert `delta.add`, delete `delta.remove`, clear the squad. Any failure
    /// rolls back all of it. Returns `None` if the event does not exist.
    pub async fn update_event_with_roster(
        &self,
        event_id: Uuid,
        fields: &EventFields,
        edited_by: Uuid,
        delta: &RosterDelta,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event_with_roster");
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            UPDATE events
            SET kind = $2, title = $3, opponent = $4, location = $5, event_date = $6,
                start_time = $7, meet_time = $8, answer_by = $9, notes = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(EventKindDb::from(fields.kind))
        .bind(&fields.title)
        .bind(&fields.opponent)
        .bind(&fields.location)
        .bind(fields.event_date)
        .bind(fields.start_time)
        .bind(fields.meet_time)
        .bind(fields.answer_by)
        .bind(&fields.notes)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(event) = event else {
            tx.rollback().await?;
            return Ok(None);
        };

        let reset = invitation::tx::bulk_reset(&mut *tx, event_id).await?;
        let added =
            invitation::tx::record_invitations(&mut *tx, event_id, &delta.add, edited_by).await?;
        let removed = invitation::tx::remove(&mut *tx, event_id, &delta.remove).await?;
        let cleared = squad::tx::clear_squad(&mut *tx, event_id).await?;

        tx.commit().await?;
        timer.record();

        tracing::debug!(
            event_id = %event_id,
            reset,
            added,
            removed,
            squad_cleared = cleared,
            "Applied roster edit"
        );

        Ok(Some(event))
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists a team's events in calendar order.
    pub async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_by_team");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE team_id = $1
            ORDER BY event_date ASC, start_time ASC, id ASC
            "#
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Deletes an event; invitations and squad rows cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }
}
