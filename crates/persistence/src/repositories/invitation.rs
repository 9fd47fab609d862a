//! Invitation ledger repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EventInvitationEntity, InvitationStatusDb};
use crate::metrics::QueryTimer;

/// Repository for the event_invitations table.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Creates a new InvitationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts one pending invitation per user.
    ///
    /// A user already invited to the event violates the primary key and the
    /// whole batch fails.
    pub async fn record_invitations(
        &self,
        event_id: Uuid,
        user_ids: &[Uuid],
        invited_by: Uuid,
    ) -> Result<u64, sqlx::Error> {
        tx::record_invitations(&self.pool, event_id, user_ids, invited_by).await
    }

    /// Sets the status of one invitation and refreshes its timestamp.
    ///
    /// Returns `None` when the user holds no invitation for the event.
    pub async fn set_status(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        status: InvitationStatusDb,
    ) -> Result<Option<EventInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_invitation_status");
        let result = sqlx::query_as::<_, EventInvitationEntity>(
            r#"
            UPDATE event_invitations
            SET status = $3, invited_at = NOW()
            WHERE event_id = $1 AND user_id = $2
            RETURNING event_id, user_id, invited_by, invited_at, status
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Puts every invitation for the event back to pending.
    pub async fn bulk_reset(&self, event_id: Uuid) -> Result<u64, sqlx::Error> {
        tx::bulk_reset(&self.pool, event_id).await
    }

    /// Deletes the given users' invitations.
    pub async fn remove(&self, event_id: Uuid, user_ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        tx::remove(&self.pool, event_id, user_ids).await
    }

    /// Deletes every invitation for the event.
    pub async fn remove_all(&self, event_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("remove_all_invitations");
        let result = sqlx::query("DELETE FROM event_invitations WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.record();
        result
    }

    /// Lists all invitations for an event.
    pub async fn list_by_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<EventInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invitations_by_event");
        let result = sqlx::query_as::<_, EventInvitationEntity>(
            r#"
            SELECT event_id, user_id, invited_by, invited_at, status
            FROM event_invitations
            WHERE event_id = $1
            ORDER BY invited_at ASC, user_id ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds one user's invitation to an event.
    pub async fn find_for_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<EventInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitation_for_user");
        let result = sqlx::query_as::<_, EventInvitationEntity>(
            r#"
            SELECT event_id, user_id, invited_by, invited_at, status
            FROM event_invitations
            WHERE event_id = $1 AND user_id = $2
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists every invitation a user holds, soonest-dated event last.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<EventInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invitations_for_user");
        let result = sqlx::query_as::<_, EventInvitationEntity>(
            r#"
            SELECT i.event_id, i.user_id, i.invited_by, i.invited_at, i.status
            FROM event_invitations i
            JOIN events e ON e.id = i.event_id
            WHERE i.user_id = $1
            ORDER BY e.event_date DESC, e.start_time DESC, i.event_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

/// Ledger writes that accept any executor, so they can share a transaction
/// with the event row they belong to.
pub mod tx {
    use sqlx::PgExecutor;
    use uuid::Uuid;

    use crate::metrics::QueryTimer;

    pub async fn record_invitations<'e, E>(
        executor: E,
        event_id: Uuid,
        user_ids: &[Uuid],
        invited_by: Uuid,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let timer = QueryTimer::new("record_invitations");
        let result = sqlx::query(
            r#"
            INSERT INTO event_invitations (event_id, user_id, invited_by, status)
            SELECT $1, invitee, $3, 'pending'
            FROM UNNEST($2::uuid[]) AS invitee
            "#,
        )
        .bind(event_id)
        .bind(user_ids)
        .bind(invited_by)
        .execute(executor)
        .await
        .map(|r| r.rows_affected());
        timer.record();
        result
    }

    pub async fn bulk_reset<'e, E>(executor: E, event_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let timer = QueryTimer::new("bulk_reset_invitations");
        let result = sqlx::query(
            r#"
            UPDATE event_invitations
            SET status = 'pending'
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .execute(executor)
        .await
        .map(|r| r.rows_affected());
        timer.record();
        result
    }

    pub async fn remove<'e, E>(
        executor: E,
        event_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let timer = QueryTimer::new("remove_invitations");
        let result = sqlx::query(
            r#"
            DELETE FROM event_invitations
            WHERE event_id = $1 AND user_id = ANY($2)
            "#,
        )
        .bind(event_id)
        .bind(user_ids)
        .execute(executor)
        .await
        .map(|r| r.rows_affected());
        timer.record();
        result
    }
}
