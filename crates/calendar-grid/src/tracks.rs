//! Lane ("track") allocation for multi-day event bars.
//!
//! Greedy interval partitioning over the priority order produced by
//! [`bucket`](crate::bucket): each event takes the lowest lane that is free on
//! every day of its span, and keeps it for the whole span. Lanes are not
//! guaranteed minimal across the range, but a bar never changes lane midway
//! and the result depends only on the priority order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::trace;

use crate::normalize::NormalizedEvent;

/// Lane of every multi-day event plus per-day occupancy.
///
/// Events are referred to by their index in the slice passed to
/// [`allocate_tracks`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackAssignment {
    lanes: Vec<usize>,
    occupancy: BTreeMap<NaiveDate, BTreeMap<usize, usize>>,
}

impl TrackAssignment {
    /// Lane of event `index`.
    pub fn lane(&self, index: usize) -> Option<usize> {
        self.lanes.get(index).copied()
    }

    /// All lanes, parallel to the allocated event slice.
    pub fn lanes(&self) -> &[usize] {
        &self.lanes
    }

    /// Event occupying `lane` on `day`, if any.
    pub fn occupant(&self, day: NaiveDate, lane: usize) -> Option<usize> {
        self.occupancy.get(&day)?.get(&lane).copied()
    }

    /// `(lane, event index)` pairs active on `day`, by ascending lane.
    pub fn active_on(&self, day: NaiveDate) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.occupancy
            .get(&day)
            .into_iter()
            .flat_map(|lanes| lanes.iter().map(|(&lane, &event)| (lane, event)))
    }

    fn is_free(&self, day: NaiveDate, lane: usize) -> bool {
        self.occupancy
            .get(&day)
            .is_none_or(|lanes| !lanes.contains_key(&lane))
    }

    fn reserve(&mut self, event: &NormalizedEvent, index: usize, lane: usize) {
        for day in event.days() {
            self.occupancy.entry(day).or_default().insert(lane, index);
        }
        self.lanes.push(lane);
    }
}

/// Result of [`allocate_tracks`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackLayout {
    pub assignment: TrackAssignment,
    /// Lanes needed per day: highest lane in use + 1.
    pub tracks_per_day: BTreeMap<NaiveDate, usize>,
}

/// Assign lanes to `events`, which must already be in priority order.
///
/// # Examples
///
/// ```
/// use calendar_grid::{allocate_tracks, normalize_event, Event, LayoutOptions};
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
/// let opts = LayoutOptions::default();
/// let events = vec![
///     normalize_event(&Event::all_day("a", "A", d(1), d(6)), &opts).unwrap(),
///     normalize_event(&Event::all_day("b", "B", d(1), d(6)), &opts).unwrap(),
/// ];
/// let layout = allocate_tracks(&events);
/// assert_eq!(layout.assignment.lanes(), &[0, 1]);
/// assert_eq!(layout.tracks_per_day[&d(3)], 2);
/// ```
pub fn allocate_tracks(events: &[NormalizedEvent]) -> TrackLayout {
    let mut assignment = TrackAssignment::default();

    for (index, event) in events.iter().enumerate() {
        let mut lane = 0;
        while !event.days().all(|day| assignment.is_free(day, lane)) {
            lane += 1;
        }
        trace!(event = %event.key(), lane, days = event.len_days(), "assigned lane");
        assignment.reserve(event, index, lane);
    }

    let tracks_per_day = assignment
        .occupancy
        .iter()
        .filter_map(|(&day, lanes)| lanes.keys().next_back().map(|&max| (day, max + 1)))
        .collect();

    TrackLayout {
        assignment,
        tracks_per_day,
    }
}
