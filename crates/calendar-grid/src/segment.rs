//! Month-row segments of multi-day bars and the per-day track cells.
//!
//! A bar crossing a month boundary is drawn once per row. Within a row the bar
//! is drawn from the cell of its first visible day; every later day it covers
//! gets a placeholder so the lanes stay vertically aligned.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::normalize::NormalizedEvent;
use crate::rows::MonthRow;
use crate::tracks::TrackAssignment;

/// The part of one multi-day event drawn on one month row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Index of the event in the multi-day list.
    pub event: usize,
    pub lane: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// `start` is the event's real first day (draw a start cap).
    pub is_true_start: bool,
    /// `end` is the event's real last day (draw an end cap).
    pub is_true_end: bool,
}

impl Segment {
    /// Width in day cells.
    pub fn span(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether the segment is a continuation from an earlier row.
    pub fn is_continuation(&self) -> bool {
        !self.is_true_start
    }
}

/// One lane of one day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackCell {
    /// Nothing in this lane on this day.
    Empty,
    /// Draw the segment's bar starting in this cell.
    Bar(Segment),
    /// Covered by a bar drawn from an earlier cell of the same row.
    Placeholder { event: usize },
}

/// Intersect `event` with the row `[row_start, row_end]`.
///
/// Returns `None` when they share no day.
pub fn segment_for_row(
    event: &NormalizedEvent,
    index: usize,
    lane: usize,
    row_start: NaiveDate,
    row_end: NaiveDate,
) -> Option<Segment> {
    if !event.intersects(row_start, row_end) {
        return None;
    }
    let start = event.start_day.max(row_start);
    let end = event.end_day.min(row_end);
    Some(Segment {
        event: index,
        lane,
        start,
        end,
        is_true_start: start == event.start_day,
        is_true_end: end == event.end_day,
    })
}

/// Segments of one event across all `rows`, in row order.
pub fn segments_for_event(
    event: &NormalizedEvent,
    index: usize,
    lane: usize,
    rows: &[MonthRow],
) -> Vec<Segment> {
    rows.iter()
        .filter_map(|row| segment_for_row(event, index, lane, row.start, row.end))
        .collect()
}

/// Segments of every event, in event order then row order.
pub fn all_segments(
    events: &[NormalizedEvent],
    assignment: &TrackAssignment,
    rows: &[MonthRow],
) -> Vec<Segment> {
    events
        .iter()
        .enumerate()
        .filter_map(|(index, event)| assignment.lane(index).map(|lane| (index, event, lane)))
        .flat_map(|(index, event, lane)| segments_for_event(event, index, lane, rows))
        .collect()
}

/// Per-day lane cells for every day of `rows`.
///
/// Each day gets one cell per lane up to its track count; days without any
/// multi-day event get no entry.
pub fn track_cells(
    segments: &[Segment],
    tracks_per_day: &BTreeMap<NaiveDate, usize>,
    rows: &[MonthRow],
) -> BTreeMap<NaiveDate, Vec<TrackCell>> {
    let mut cells: BTreeMap<NaiveDate, Vec<TrackCell>> = rows
        .iter()
        .flat_map(MonthRow::days)
        .filter_map(|day| {
            let count = tracks_per_day.get(&day).copied().unwrap_or(0);
            (count > 0).then(|| (day, vec![TrackCell::Empty; count]))
        })
        .collect();

    for segment in segments {
        for (offset, day) in segment.start.iter_days().take(segment.span() as usize).enumerate() {
            let Some(lanes) = cells.get_mut(&day) else {
                continue;
            };
            let Some(cell) = lanes.get_mut(segment.lane) else {
                continue;
            };
            *cell = if offset == 0 {
                TrackCell::Bar(*segment)
            } else {
                TrackCell::Placeholder {
                    event: segment.event,
                }
            };
        }
    }

    cells
}
