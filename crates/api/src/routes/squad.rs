//! Squad selection endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::squad::{ListSquadResponse, UpdateSquadEntryRequest, UpsertSquadRequest};
use domain::models::{SquadChange, SquadEntry};
use persistence::repositories::SquadRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::events::{ensure_admin, load_event};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_squad_change;

/// List the users selected for an event.
///
/// GET /api/v1/events/:event_id/squad
pub async fn list_squad(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<ListSquadResponse>, ApiError> {
    load_event(&state, event_id).await?;

    let repo = SquadRepository::new(state.pool.clone());
    let entries = repo
        .list_by_event(event_id)
        .await?
        .into_iter()
        .map(SquadEntry::from)
        .collect();

    Ok(Json(ListSquadResponse::new(entries)))
}

/// Add and remove squad members in one step.
///
/// PUT /api/v1/events/:event_id/squad
pub async fn upsert_squad(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
    Json(request): Json<UpsertSquadRequest>,
) -> Result<Json<SquadChange>, ApiError> {
    request.validate()?;

    let event = load_event(&state, event_id).await?;
    ensure_admin(&event, &auth)?;

    let repo = SquadRepository::new(state.pool.clone());
    let counts = repo
        .upsert_squad(
            event_id,
            auth.user_id,
            &request.add_user_ids,
            &request.remove_user_ids,
            request.note.as_deref(),
        )
        .await?;

    let change = SquadChange::new(counts.added, counts.removed, counts.total);
    record_squad_change(&change);

    if change.did_change {
        info!(
            event_id = %event_id,
            added = change.added_count,
            removed = change.removed_count,
            total = change.total_count,
            "Squad updated"
        );
    }

    Ok(Json(change))
}

/// Drop the whole squad so the event is undecided again.
///
/// DELETE /api/v1/events/:event_id/squad
pub async fn clear_squad(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let event = load_event(&state, event_id).await?;
    ensure_admin(&event, &auth)?;

    let repo = SquadRepository::new(state.pool.clone());
    let cleared = repo.clear_squad(event_id).await?;

    info!(event_id = %event_id, cleared, "Squad cleared");

    Ok(StatusCode::NO_CONTENT)
}

/// Set a selected user's position or role.
///
/// PATCH /api/v1/events/:event_id/squad/:user_id
pub async fn update_squad_entry(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((event_id, user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateSquadEntryRequest>,
) -> Result<Json<SquadEntry>, ApiError> {
    request.validate()?;

    let event = load_event(&state, event_id).await?;
    ensure_admin(&event, &auth)?;

    let repo = SquadRepository::new(state.pool.clone());
    let entry = repo
        .update_details(
            event_id,
            user_id,
            request.position.as_deref(),
            request.squad_role.as_deref(),
        )
        .await?
        .map(SquadEntry::from)
        .ok_or_else(|| ApiError::NotFound("User is not in the squad".to_string()))?;

    Ok(Json(entry))
}
