//! Event domain models.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::invitation::RsvpCounts;
use super::roster::{chosen_user_ids, RosterDelta, RosterSelection};
use shared::validation::{validate_answer_by, validate_meet_time};

/// Kind of team event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Match,
    Training,
    Social,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Match => "match",
            EventKind::Training => "training",
            EventKind::Social => "social",
        }
    }

    /// Display name used as the event name in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Match => "Match",
            EventKind::Training => "Training",
            EventKind::Social => "Social",
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "match" => Ok(EventKind::Match),
            "training" => Ok(EventKind::Training),
            "social" => Ok(EventKind::Social),
            _ => Err(format!("Invalid event kind: {}", s)),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scheduled team event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub team_id: Uuid,
    pub kind: EventKind,
    pub title: String,
    pub opponent: Option<String>,
    pub location: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub meet_time: NaiveTime,
    pub answer_by: NaiveDate,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// The creator administers the event's roster and squad.
    pub fn is_admin(&self, user_id: Uuid) -> bool {
        self.created_by == user_id
    }
}

/// Editable event fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub kind: EventKind,
    pub title: String,
    pub opponent: Option<String>,
    pub location: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub meet_time: NaiveTime,
    pub answer_by: NaiveDate,
    pub notes: Option<String>,
}

/// Event form payload for both create and edit.
///
/// `members` and `leaders` carry the full checkbox state of each candidate
/// list; the edit flow diffs them against the current invitations.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct EventRequest {
    pub kind: EventKind,

    #[validate(custom(function = "shared::validation::validate_title"))]
    pub title: String,

    #[validate(length(max = 120, message = "Opponent must be at most 120 characters"))]
    pub opponent: Option<String>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub meet_time: NaiveTime,
    pub answer_by: NaiveDate,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,

    #[serde(default)]
    #[validate(length(max = 200, message = "Cannot list more than 200 members"))]
    pub members: Vec<RosterSelection>,

    #[serde(default)]
    #[validate(length(max = 200, message = "Cannot list more than 200 leaders"))]
    pub leaders: Vec<RosterSelection>,
}

impl EventRequest {
    /// Runs the field validators plus the checks that span several fields.
    pub fn validate_form(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Err(err) = validate_meet_time(self.meet_time, self.start_time) {
            errors.add("meet_time", err);
        }
        if let Err(err) = validate_answer_by(self.answer_by, self.event_date) {
            errors.add("answer_by", err);
        }
        if self.invitee_ids().is_empty() {
            let mut err = ValidationError::new("no_invitees");
            err.message = Some("Select at least one member or leader".into());
            errors.add("members", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Chosen members followed by chosen leaders, without duplicates.
    pub fn invitee_ids(&self) -> Vec<Uuid> {
        let mut ids = chosen_user_ids(&self.members);
        for id in chosen_user_ids(&self.leaders) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn fields(&self) -> EventFields {
        EventFields {
            kind: self.kind,
            title: self.title.trim().to_string(),
            opponent: self.opponent.clone(),
            location: self.location.clone(),
            event_date: self.event_date,
            start_time: self.start_time,
            meet_time: self.meet_time,
            answer_by: self.answer_by,
            notes: self.notes.clone(),
        }
    }
}

/// Response for creating an event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventResponse {
    pub event: Event,
    pub invited: Vec<Uuid>,
}

/// Response for event detail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventResponse {
    pub event: Event,
    pub counts: RsvpCounts,
}

/// Response for listing a team's events.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListEventsResponse {
    pub data: Vec<Event>,
    pub total: usize,
}

impl ListEventsResponse {
    pub fn new(data: Vec<Event>) -> Self {
        let total = data.len();
        Self { data, total }
    }
}

/// Response for an event edit: the saved event and what happened to the roster.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateEventResponse {
    pub event: Event,
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
    pub notified_updated: Vec<Uuid>,
    pub unlisted: Vec<Uuid>,
}

impl UpdateEventResponse {
    pub fn new(event: Event, delta: RosterDelta) -> Self {
        Self {
            event,
            added: delta.add,
            removed: delta.remove,
            notified_updated: delta.notify_updated,
            unlisted: delta.unlisted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EventRequest {
        EventRequest {
            kind: EventKind::Match,
            title: "League match".to_string(),
            opponent: Some("Rovers".to_string()),
            location: None,
            event_date: NaiveDate::from_ymd_opt(2026, 5, 9).unwrap(),
            start_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            meet_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            answer_by: NaiveDate::from_ymd_opt(2026, 5, 7).unwrap(),
            notes: None,
            members: vec![RosterSelection::chosen(Uuid::new_v4())],
            leaders: vec![],
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate_form().is_ok());
    }

    #[test]
    fn test_meet_time_after_start_rejected() {
        let mut req = request();
        req.meet_time = NaiveTime::from_hms_opt(15, 30, 0).unwrap();

        let errors = req.validate_form().unwrap_err();
        assert!(errors.field_errors().contains_key("meet_time"));
    }

    #[test]
    fn test_answer_by_after_event_rejected() {
        let mut req = request();
        req.answer_by = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();

        let errors = req.validate_form().unwrap_err();
        assert!(errors.field_errors().contains_key("answer_by"));
    }

    #[test]
    fn test_no_chosen_invitees_rejected() {
        let mut req = request();
        req.members = vec![RosterSelection::unchosen(Uuid::new_v4())];

        let errors = req.validate_form().unwrap_err();
        assert!(errors.field_errors().contains_key("members"));
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut req = request();
        req.title = "   ".to_string();
        assert!(req.validate_form().is_err());

        req.title = "x".repeat(121);
        assert!(req.validate_form().is_err());
    }

    #[test]
    fn test_padded_title_checked_by_stored_length() {
        let mut req = request();
        req.title = format!("  {}  ", "x".repeat(118));
        assert!(req.validate_form().is_ok());
        assert_eq!(req.fields().title.len(), 118);
    }

    #[test]
    fn test_errors_are_collected_together() {
        let mut req = request();
        req.title = String::new();
        req.meet_time = NaiveTime::from_hms_opt(16, 0, 0).unwrap();

        let errors = req.validate_form().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("meet_time"));
    }

    #[test]
    fn test_invitee_ids_merge_members_and_leaders() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut req = request();
        req.members = vec![RosterSelection::chosen(a), RosterSelection::unchosen(b)];
        req.leaders = vec![RosterSelection::chosen(b), RosterSelection::chosen(a)];

        assert_eq!(req.invitee_ids(), vec![a, b]);
    }

    #[test]
    fn test_request_deserialize() {
        let member = Uuid::new_v4();
        let json = format!(
            r#"{{
                "kind": "training",
                "title": "Tuesday session",
                "event_date": "2026-05-12",
                "start_time": "19:00:00",
                "meet_time": "18:45:00",
                "answer_by": "2026-05-11",
                "members": [{{"user_id": "{}", "is_choose": true}}]
            }}"#,
            member
        );
        let req: EventRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.kind, EventKind::Training);
        assert!(req.leaders.is_empty());
        assert_eq!(req.invitee_ids(), vec![member]);
        assert!(req.validate_form().is_ok());
    }

    #[test]
    fn test_missing_date_fails_deserialization() {
        let json = r#"{"kind":"match","title":"Cup","start_time":"10:00:00","meet_time":"09:00:00","answer_by":"2026-01-01"}"#;
        assert!(serde_json::from_str::<EventRequest>(json).is_err());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(EventKind::Match.label(), "Match");
        assert_eq!("TRAINING".parse::<EventKind>(), Ok(EventKind::Training));
        assert!("party".parse::<EventKind>().is_err());
    }
}
