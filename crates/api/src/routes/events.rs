//! Event endpoint handlers, including the roster edit flow.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::event::{
    CreateEventResponse, EventResponse, ListEventsResponse, UpdateEventResponse,
};
use domain::models::roster::selection_from_invitees;
use domain::models::{compute_roster_edit, Event, EventRequest, Invitation, RsvpCounts};
use domain::services::{
    dispatch, plan_invitation_notifications, plan_roster_notifications, EventNotificationPayload,
};
use persistence::repositories::{EventRepository, InvitationRepository};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_notifications, record_roster_edit};

/// Loads an event or fails with 404.
pub(crate) async fn load_event(state: &AppState, event_id: Uuid) -> Result<Event, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    repo.find_by_id(event_id)
        .await?
        .map(Event::from)
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))
}

/// Only the event creator may manage its roster and squad.
pub(crate) fn ensure_admin(event: &Event, auth: &UserAuth) -> Result<(), ApiError> {
    if event.is_admin(auth.user_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only the event admin can do that".to_string(),
        ))
    }
}

/// Sends notifications after a committed write. Failures are logged and
/// counted, never returned to the caller.
pub(crate) async fn notify(state: &AppState, payloads: Vec<EventNotificationPayload>) {
    if payloads.is_empty() {
        return;
    }
    let summary = dispatch(state.notifier.as_ref(), payloads).await;
    record_notifications(&summary);
}

/// Create an event and invite the chosen members and leaders.
///
/// POST /api/v1/teams/:team_id/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(team_id): Path<Uuid>,
    Json(request): Json<EventRequest>,
) -> Result<(StatusCode, Json<CreateEventResponse>), ApiError> {
    request.validate_form()?;

    let invitee_ids = request.invitee_ids();
    let repo = EventRepository::new(state.pool.clone());
    let event: Event = repo
        .create_event_with_roster(team_id, &request.fields(), auth.user_id, &invitee_ids)
        .await?
        .into();

    info!(
        event_id = %event.id,
        team_id = %team_id,
        created_by = %auth.user_id,
        invited = invitee_ids.len(),
        "Event created"
    );

    notify(&state, plan_invitation_notifications(&event, &invitee_ids)).await;

    Ok((
        StatusCode::CREATED,
        Json(CreateEventResponse {
            event,
            invited: invitee_ids,
        }),
    ))
}

/// List a team's events in calendar order.
///
/// GET /api/v1/teams/:team_id/events
pub async fn list_team_events(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(team_id): Path<Uuid>,
) -> Result<Json<ListEventsResponse>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let events = repo
        .list_by_team(team_id)
        .await?
        .into_iter()
        .map(Event::from)
        .collect();

    Ok(Json(ListEventsResponse::new(events)))
}

/// Get an event with its RSVP counts.
///
/// GET /api/v1/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = load_event(&state, event_id).await?;

    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let invitations: Vec<Invitation> = invitation_repo
        .list_by_event(event_id)
        .await?
        .into_iter()
        .map(Invitation::from)
        .collect();

    Ok(Json(EventResponse {
        event,
        counts: RsvpCounts::from_invitations(&invitations),
    }))
}

/// Edit an event and reconcile its invitations.
///
/// Everyone currently invited counts as previously chosen. The edit, the
/// RSVP reset, the roster changes and the squad clear commit together;
/// notifications go out only after the commit.
///
/// PUT /api/v1/events/:event_id
pub async fn update_event(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
    Json(request): Json<EventRequest>,
) -> Result<Json<UpdateEventResponse>, ApiError> {
    request.validate_form()?;

    let event = load_event(&state, event_id).await?;
    ensure_admin(&event, &auth)?;

    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let prior = selection_from_invitees(
        invitation_repo
            .list_by_event(event_id)
            .await?
            .into_iter()
            .map(|i| i.user_id),
    );

    let delta = compute_roster_edit(&request.members, &request.leaders, &prior);
    if !delta.unlisted.is_empty() {
        warn!(
            event_id = %event_id,
            unlisted = delta.unlisted.len(),
            "Invitees missing from the submitted candidate lists were kept"
        );
    }

    let repo = EventRepository::new(state.pool.clone());
    let event: Event = repo
        .update_event_with_roster(event_id, &request.fields(), auth.user_id, &delta)
        .await?
        .map(Event::from)
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    record_roster_edit(&delta);
    info!(
        event_id = %event_id,
        edited_by = %auth.user_id,
        added = delta.add.len(),
        removed = delta.remove.len(),
        kept = delta.notify_updated.len(),
        "Event updated"
    );

    notify(&state, plan_roster_notifications(&event, &delta)).await;

    Ok(Json(UpdateEventResponse::new(event, delta)))
}

/// Delete an event together with its invitations and squad.
///
/// DELETE /api/v1/events/:event_id
pub async fn delete_event(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let event = load_event(&state, event_id).await?;
    ensure_admin(&event, &auth)?;

    let repo = EventRepository::new(state.pool.clone());
    if !repo.delete(event_id).await? {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }

    info!(event_id = %event_id, deleted_by = %auth.user_id, "Event deleted");

    Ok(StatusCode::NO_CONTENT)
}
