//! Invitation ledger and RSVP endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::invitation::{
    InvitationStatusResponse, ListInvitationsResponse, RespondRequest,
    SetInvitationStatusRequest,
};
use domain::models::{EventCardState, Invitation, InvitationStatus, SquadEntry};
use persistence::entities::InvitationStatusDb;
use persistence::repositories::{InvitationRepository, SquadRepository};
use tracing::info;
use uuid::Uuid;

use super::events::{ensure_admin, load_event};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_rsvp;

async fn list_event_invitations(
    state: &AppState,
    event_id: Uuid,
) -> Result<Vec<Invitation>, ApiError> {
    let repo = InvitationRepository::new(state.pool.clone());
    Ok(repo
        .list_by_event(event_id)
        .await?
        .into_iter()
        .map(Invitation::from)
        .collect())
}

/// List an event's invitations with RSVP counts.
///
/// GET /api/v1/events/:event_id/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<ListInvitationsResponse>, ApiError> {
    load_event(&state, event_id).await?;
    let invitations = list_event_invitations(&state, event_id).await?;
    Ok(Json(ListInvitationsResponse::new(invitations)))
}

/// Withdraw every invitation for an event.
///
/// DELETE /api/v1/events/:event_id/invitations
pub async fn cancel_invitations(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let event = load_event(&state, event_id).await?;
    ensure_admin(&event, &auth)?;

    let repo = InvitationRepository::new(state.pool.clone());
    let removed = repo.remove_all(event_id).await?;

    info!(event_id = %event_id, removed, "Invitations cancelled");

    Ok(StatusCode::NO_CONTENT)
}

/// The caller's view of an event card: RSVP state plus squad selection.
///
/// GET /api/v1/events/:event_id/me
pub async fn get_my_card(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventCardState>, ApiError> {
    load_event(&state, event_id).await?;

    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let invitation: Option<Invitation> = invitation_repo
        .find_for_user(event_id, auth.user_id)
        .await?
        .map(Invitation::from);

    let squad_repo = SquadRepository::new(state.pool.clone());
    let squad: Vec<SquadEntry> = squad_repo
        .list_by_event(event_id)
        .await?
        .into_iter()
        .map(SquadEntry::from)
        .collect();

    Ok(Json(EventCardState::build(
        event_id,
        auth.user_id,
        invitation.as_ref(),
        &squad,
    )))
}

/// Record the caller's RSVP. An absent or unrecognised answer resets the
/// invitation to pending.
///
/// PUT /api/v1/events/:event_id/rsvp
pub async fn respond(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
    Json(request): Json<RespondRequest>,
) -> Result<Json<InvitationStatusResponse>, ApiError> {
    let status = request.status();

    let repo = InvitationRepository::new(state.pool.clone());
    let invitation: Invitation = repo
        .set_status(event_id, auth.user_id, InvitationStatusDb::from(status))
        .await?
        .map(Invitation::from)
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    record_rsvp(status);
    info!(
        event_id = %event_id,
        user_id = %auth.user_id,
        status = %status,
        "RSVP recorded"
    );

    Ok(Json(invitation.into()))
}

/// Set an invitee's status directly, e.g. to `sent` once delivered.
///
/// PUT /api/v1/events/:event_id/invitations/:user_id
pub async fn set_invitation_status(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((event_id, user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<SetInvitationStatusRequest>,
) -> Result<Json<InvitationStatusResponse>, ApiError> {
    let event = load_event(&state, event_id).await?;
    ensure_admin(&event, &auth)?;

    let repo = InvitationRepository::new(state.pool.clone());
    let invitation: Invitation = repo
        .set_status(event_id, user_id, InvitationStatusDb::from(request.status))
        .await?
        .map(Invitation::from)
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    if request.status != InvitationStatus::Sent {
        record_rsvp(request.status);
    }

    Ok(Json(invitation.into()))
}

/// Every invitation the caller holds, across events.
///
/// GET /api/v1/users/me/invitations
pub async fn list_my_invitations(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListInvitationsResponse>, ApiError> {
    let repo = InvitationRepository::new(state.pool.clone());
    let invitations = repo
        .list_for_user(auth.user_id)
        .await?
        .into_iter()
        .map(Invitation::from)
        .collect();

    Ok(Json(ListInvitationsResponse::new(invitations)))
}
