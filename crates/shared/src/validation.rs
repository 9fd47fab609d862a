//! Common validation utilities for event and squad forms.

use chrono::{NaiveDate, NaiveTime};
use validator::ValidationError;

lazy_static::lazy_static! {
    /// Short position codes such as `GK`, `CB`, `LW` or `Prop 1`.
    static ref POSITION_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 /-]{0,19}$").unwrap();
}

/// Longest event title, counted after trimming.
pub const MAX_TITLE_LENGTH: usize = 120;

/// Validates an event title by its trimmed length, which is what gets stored.
pub fn validate_title(value: &str) -> Result<(), ValidationError> {
    let length = value.trim().chars().count();
    if length == 0 {
        let mut err = ValidationError::new("blank");
        err.message = Some("Title cannot be blank".into());
        Err(err)
    } else if length > MAX_TITLE_LENGTH {
        let mut err = ValidationError::new("length");
        err.message = Some("Title must be between 1 and 120 characters".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that players are asked to meet no later than kick-off.
pub fn validate_meet_time(meet_time: NaiveTime, start_time: NaiveTime) -> Result<(), ValidationError> {
    if meet_time <= start_time {
        Ok(())
    } else {
        let mut err = ValidationError::new("meet_time_after_start");
        err.message = Some("Meet time must not be after the start time".into());
        Err(err)
    }
}

/// Validates that the RSVP deadline falls on or before the event date.
pub fn validate_answer_by(answer_by: NaiveDate, event_date: NaiveDate) -> Result<(), ValidationError> {
    if answer_by <= event_date {
        Ok(())
    } else {
        let mut err = ValidationError::new("answer_by_after_event");
        err.message = Some("Answer-by date must not be after the event date".into());
        Err(err)
    }
}

/// Validates a squad position code.
pub fn validate_position(position: &str) -> Result<(), ValidationError> {
    if POSITION_REGEX.is_match(position) {
        Ok(())
    } else {
        let mut err = ValidationError::new("position_format");
        err.message = Some(
            "Position must be 1-20 letters, digits, spaces, '/' or '-'".into(),
        );
        Err(err)
    }
}
