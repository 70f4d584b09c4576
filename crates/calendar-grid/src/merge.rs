//! Replace/append helpers for the caller-owned event list.
//!
//! The layout pass never merges results itself. A caller that refreshes one
//! calendar, or saves a single edited event, updates its event list with these
//! helpers and runs a new pass.

use std::collections::BTreeSet;

use crate::event::{Event, EventKey};

/// Replace the event with the same [`EventKey`], or append it.
///
/// Returns `true` when an existing event was replaced.
pub fn upsert_event(events: &mut Vec<Event>, event: Event) -> bool {
    let key = event.key();
    match events.iter_mut().find(|e| e.key() == key) {
        Some(existing) => {
            *existing = event;
            true
        }
        None => {
            events.push(event);
            false
        }
    }
}

/// Remove every event with `key`. Returns `true` if anything was removed.
pub fn remove_event(events: &mut Vec<Event>, key: &EventKey) -> bool {
    let before = events.len();
    events.retain(|e| &e.key() != key);
    events.len() != before
}

/// Combine a cached list with freshly fetched events.
///
/// Cached events from calendars outside `refreshed` are kept, then all of
/// `fresh` is appended. Cached events without a calendar id cannot be
/// attributed to any refresh and are discarded.
pub fn merge_refreshed(
    cached: Vec<Event>,
    fresh: Vec<Event>,
    refreshed: &BTreeSet<String>,
) -> Vec<Event> {
    let mut merged: Vec<Event> = cached
        .into_iter()
        .filter(|e| {
            e.calendar_id
                .as_ref()
                .is_some_and(|cal| !refreshed.contains(cal))
        })
        .collect();
    merged.extend(fresh);
    merged
}
