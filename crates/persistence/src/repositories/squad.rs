//! Squad selection repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EventSquadEntity;
use crate::metrics::QueryTimer;

/// Row counts produced by one squad upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquadUpsertCounts {
    pub added: u64,
    pub removed: u64,
    pub total: i64,
}

/// Repository for the event_squads table.
#[derive(Clone)]
pub struct SquadRepository {
    pool: PgPool,
}

impl SquadRepository {
    /// Creates a new SquadRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Removes then adds users in one transaction.
    ///
    /// Adding a user who is already selected is a no-op and is not counted.
    /// `note` is stored on newly inserted rows only.
    pub async fn upsert_squad(
        &self,
        event_id: Uuid,
        selected_by: Uuid,
        add: &[Uuid],
        remove: &[Uuid],
        note: Option<&str>,
    ) -> Result<SquadUpsertCounts, sqlx::Error> {
        let timer = QueryTimer::new("upsert_squad");
        let mut tx = self.pool.begin().await?;

        let removed = if remove.is_empty() {
            0
        } else {
            sqlx::query(
                r#"
                DELETE FROM event_squads
                WHERE event_id = $1 AND user_id = ANY($2)
                "#,
            )
            .bind(event_id)
            .bind(remove)
            .execute(&mut *tx)
            .await?
            .rows_affected()
        };

        let added = if add.is_empty() {
            0
        } else {
            sqlx::query(
                r#"
                INSERT INTO event_squads (event_id, user_id, selected_by, selection_notes)
                SELECT $1, selected, $3, $4
                FROM UNNEST($2::uuid[]) AS selected
                ON CONFLICT (event_id, user_id) DO NOTHING
                "#,
            )
            .bind(event_id)
            .bind(add)
            .bind(selected_by)
            .bind(note)
            .execute(&mut *tx)
            .await?
            .rows_affected()
        };

        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM event_squads WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;
        timer.record();

        Ok(SquadUpsertCounts {
            added,
            removed,
            total,
        })
    }

    /// Deletes the whole squad for an event.
    pub async fn clear_squad(&self, event_id: Uuid) -> Result<u64, sqlx::Error> {
        tx::clear_squad(&self.pool, event_id).await
    }

    /// Lists an event's squad in selection order.
    pub async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<EventSquadEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_squad_by_event");
        let result = sqlx::query_as::<_, EventSquadEntity>(
            r#"
            SELECT event_id, user_id, selected_by, selected_at, position, squad_role, selection_notes
            FROM event_squads
            WHERE event_id = $1
            ORDER BY selected_at ASC, user_id ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Sets position and role on an existing selection. `None` keeps the
    /// stored value.
    pub async fn update_details(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        position: Option<&str>,
        squad_role: Option<&str>,
    ) -> Result<Option<EventSquadEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_squad_entry_details");
        let result = sqlx::query_as::<_, EventSquadEntity>(
            r#"
            UPDATE event_squads
            SET position = COALESCE($3, position),
                squad_role = COALESCE($4, squad_role)
            WHERE event_id = $1 AND user_id = $2
            RETURNING event_id, user_id, selected_by, selected_at, position, squad_role, selection_notes
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(position)
        .bind(squad_role)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

/// Squad writes that can join an outer transaction.
pub mod tx {
    use sqlx::PgExecutor;
    use uuid::Uuid;

    use crate::metrics::QueryTimer;

    pub async fn clear_squad<'e, E>(executor: E, event_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let timer = QueryTimer::new("clear_squad");
        let result = sqlx::query("DELETE FROM event_squads WHERE event_id = $1")
            .bind(event_id)
            .execute(executor)
            .await
            .map(|r| r.rows_affected());
        timer.record();
        result
    }
}
