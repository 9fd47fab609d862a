//! Roster delta calculation for event edits.
//!
//! When an admin edits an event's member and leader checkboxes, the new
//! selection is compared with the selection the edit started from to decide
//! who gets a fresh invitation, whose invitation is revoked, and who should
//! hear that an event they are already invited to has changed.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// One candidate's checkbox state on the event form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RosterSelection {
    pub user_id: Uuid,
    #[serde(alias = "is_choose", alias = "isChoose")]
    pub chosen: bool,
}

impl RosterSelection {
    pub fn chosen(user_id: Uuid) -> Self {
        Self {
            user_id,
            chosen: true,
        }
    }

    pub fn unchosen(user_id: Uuid) -> Self {
        Self {
            user_id,
            chosen: false,
        }
    }
}

/// Result of comparing a roster before and after an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RosterDelta {
    /// Chosen now, not chosen before: insert a pending invitation and send
    /// a "you've been invited" notification.
    pub add: Vec<Uuid>,
    /// Chosen before, explicitly unchosen now: delete the invitation.
    pub remove: Vec<Uuid>,
    /// Chosen both times: keep the invitation, send an "event updated"
    /// notification.
    pub notify_updated: Vec<Uuid>,
    /// Chosen before but missing from the new candidate lists altogether.
    /// Reported only; these invitations are left in place.
    pub unlisted: Vec<Uuid>,
}

impl RosterDelta {
    /// Returns true when applying this delta changes no invitation rows.
    pub fn is_noop(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    /// Concatenates two deltas computed against the same prior selection
    /// (members first, then leaders).
    ///
    /// A user never appears twice in the same bucket, and a user kept or
    /// added by either list is never removed.
    pub fn merge(self, other: RosterDelta) -> RosterDelta {
        let add = dedup_concat(self.add, other.add);
        let notify_updated = dedup_concat(self.notify_updated, other.notify_updated);

        let kept: HashSet<Uuid> = add.iter().chain(notify_updated.iter()).copied().collect();
        let remove = dedup_concat(self.remove, other.remove)
            .into_iter()
            .filter(|id| !kept.contains(id))
            .collect();

        let unlisted = dedup_concat(self.unlisted, other.unlisted);

        RosterDelta {
            add,
            remove,
            notify_updated,
            unlisted,
        }
    }
}

fn dedup_concat(first: Vec<Uuid>, second: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(first.len() + second.len());
    first
        .into_iter()
        .chain(second)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Partitions one selection list against the prior state of the same list.
///
/// Only `current` is iterated; a user missing from `prior` counts as not
/// chosen before. If `current` lists a user twice the first entry wins.
pub fn compute_roster_delta(current: &[RosterSelection], prior: &[RosterSelection]) -> RosterDelta {
    let mut was_chosen: HashMap<Uuid, bool> = HashMap::with_capacity(prior.len());
    for selection in prior {
        was_chosen.entry(selection.user_id).or_insert(selection.chosen);
    }

    let mut delta = RosterDelta::default();
    let mut seen = HashSet::with_capacity(current.len());

    for selection in current {
        if !seen.insert(selection.user_id) {
            continue;
        }
        let before = was_chosen.get(&selection.user_id).copied().unwrap_or(false);
        match (before, selection.chosen) {
            (false, true) => delta.add.push(selection.user_id),
            (true, false) => delta.remove.push(selection.user_id),
            (true, true) => delta.notify_updated.push(selection.user_id),
            (false, false) => {}
        }
    }

    delta
}

/// Computes the combined delta for an event edit with separate member and
/// leader lists, both compared against the same prior selection.
pub fn compute_roster_edit(
    members: &[RosterSelection],
    leaders: &[RosterSelection],
    prior: &[RosterSelection],
) -> RosterDelta {
    let mut delta =
        compute_roster_delta(members, prior).merge(compute_roster_delta(leaders, prior));

    let listed: HashSet<Uuid> = members
        .iter()
        .chain(leaders.iter())
        .map(|s| s.user_id)
        .collect();
    delta.unlisted = chosen_user_ids(prior)
        .into_iter()
        .filter(|id| !listed.contains(id))
        .collect();

    delta
}

/// The chosen user ids of a selection, in first-occurrence order.
pub fn chosen_user_ids(selection: &[RosterSelection]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(selection.len());
    selection
        .iter()
        .filter(|s| s.chosen && seen.insert(s.user_id))
        .map(|s| s.user_id)
        .collect()
}

/// Builds the "before" selection from the users currently holding an
/// invitation.
pub fn selection_from_invitees<I>(user_ids: I) -> Vec<RosterSelection>
where
    I: IntoIterator<Item = Uuid>,
{
    user_ids.into_iter().map(RosterSelection::chosen).collect()
}
