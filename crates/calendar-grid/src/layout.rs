//! The layout pass: events in, render model out.
//!
//! ```text
//! events ─ visibility ─ normalize ─ range filter ─ bucket ─ allocate lanes
//!                                                     │            │
//!                                      holiday overlay      month rows ─ segments ─ cells
//!                                                     └──── colors ┘
//! ```
//!
//! Every structure is rebuilt from scratch on each call and all maps are
//! ordered, so identical inputs always give an identical [`RenderModel`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::bucket::{build_day_buckets, Buckets};
use crate::color::{resolve_color, ColorMaps, EventColor, ViewMode};
use crate::config::LayoutOptions;
use crate::event::{Event, EventKey};
use crate::holiday::{self, DayDisplayMeta, HolidayEntry};
use crate::normalize::{normalize_events, Diagnostics, NormalizedEvent};
use crate::rows::{month_rows, DateRange, MonthRow};
use crate::segment::{all_segments, track_cells, Segment, TrackCell};
use crate::tracks::{allocate_tracks, TrackLayout};

/// A multi-day event with its lane and color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedEvent {
    pub event: NormalizedEvent,
    pub lane: usize,
    pub color: EventColor,
}

/// A single-day event with its color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayEvent {
    pub event: NormalizedEvent,
    pub color: EventColor,
}

/// Everything the presentation layer needs to draw the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderModel {
    pub range: DateRange,
    pub rows: Vec<MonthRow>,
    /// Multi-day events in priority order. [`Segment::event`] and
    /// [`TrackCell::Placeholder`] index into this list.
    pub events: Vec<PlacedEvent>,
    /// Single-day events per day, ordered by start time.
    pub day_buckets: BTreeMap<NaiveDate, Vec<DayEvent>>,
    /// Lanes needed per visible day; days without bars are absent.
    pub tracks_per_day: BTreeMap<NaiveDate, usize>,
    /// All bar segments, by event then row.
    pub segments: Vec<Segment>,
    /// Per visible day, one cell per lane.
    pub segments_by_day_and_track: BTreeMap<NaiveDate, Vec<TrackCell>>,
    pub display_meta_by_day: BTreeMap<NaiveDate, DayDisplayMeta>,
    pub diagnostics: Diagnostics,
}

impl RenderModel {
    /// Every event covering `day`, single-day and multi-day, by start instant.
    pub fn events_on(&self, day: NaiveDate) -> Vec<&NormalizedEvent> {
        let mut out: Vec<&NormalizedEvent> = self
            .day_buckets
            .get(&day)
            .into_iter()
            .flatten()
            .map(|e| &e.event)
            .chain(
                self.events
                    .iter()
                    .map(|p| &p.event)
                    .filter(|e| e.occupies(day)),
            )
            .collect();
        out.sort_by_key(|e| e.start_instant);
        out
    }

    /// Lane of the multi-day event with `key`.
    pub fn lane_of(&self, key: &EventKey) -> Option<usize> {
        self.events
            .iter()
            .find(|p| &p.event.key() == key)
            .map(|p| p.lane)
    }

    /// Segments of the multi-day event at `index`, in row order.
    pub fn segments_of(&self, index: usize) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(move |s| s.event == index)
    }

    /// Lanes needed on `day` (0 when no bar crosses it).
    pub fn tracks_on(&self, day: NaiveDate) -> usize {
        self.tracks_per_day.get(&day).copied().unwrap_or(0)
    }
}

/// Lay out `events` over `range` with default [`LayoutOptions`].
pub fn layout(
    events: &[Event],
    range: &DateRange,
    holidays: &[HolidayEntry],
    view_mode: ViewMode,
    colors: &ColorMaps,
) -> RenderModel {
    layout_with_options(
        events,
        range,
        holidays,
        view_mode,
        colors,
        &LayoutOptions::default(),
    )
}

/// Lay out `events` over `range`.
///
/// Never fails: invalid events are dropped and malformed ranges clamped, both
/// reported in [`RenderModel::diagnostics`]. Events outside `range` are
/// ignored; events crossing its edges keep lanes computed over their full span.
///
/// # Examples
///
/// ```
/// use calendar_grid::{layout_with_options, ColorMaps, DateRange, Event, LayoutOptions, ViewMode};
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
/// let events = vec![Event::all_day("trip", "Trip", d(1, 28), d(2, 4))];
/// let range = DateRange::year(2024).unwrap();
/// let model = layout_with_options(
///     &events, &range, &[], ViewMode::Single, &ColorMaps::default(), &LayoutOptions::default(),
/// );
/// assert_eq!(model.segments.len(), 2);
/// assert_eq!(model.tracks_on(d(2, 1)), 1);
/// ```
#[tracing::instrument(
    skip_all,
    fields(events = events.len(), holidays = holidays.len(), view_mode = ?view_mode)
)]
pub fn layout_with_options(
    events: &[Event],
    range: &DateRange,
    holidays: &[HolidayEntry],
    view_mode: ViewMode,
    colors: &ColorMaps,
    options: &LayoutOptions,
) -> RenderModel {
    let visible = events
        .iter()
        .filter(|e| options.is_visible(e.calendar_id.as_deref()));
    let (normalized, mut diagnostics) = normalize_events(visible, options);

    let (in_range, out_of_range): (Vec<_>, Vec<_>) = normalized
        .into_iter()
        .partition(|e| e.intersects(range.start(), range.end()));
    diagnostics.out_of_range = out_of_range.len();

    let Buckets {
        day_buckets,
        multi_day,
    } = build_day_buckets(in_range);
    let TrackLayout {
        assignment,
        tracks_per_day,
    } = allocate_tracks(&multi_day);

    let rows = month_rows(range, options.week_start);
    let segments = all_segments(&multi_day, &assignment, &rows);
    let segments_by_day_and_track = track_cells(&segments, &tracks_per_day, &rows);
    let display_meta_by_day = holiday::merge(&day_buckets, holidays, range, options);

    let tracks_per_day: BTreeMap<NaiveDate, usize> = tracks_per_day
        .into_iter()
        .filter(|(day, _)| range.contains(*day))
        .collect();

    let events: Vec<PlacedEvent> = multi_day
        .into_iter()
        .zip(assignment.lanes())
        .map(|(event, &lane)| PlacedEvent {
            color: resolve_color(&event.event, view_mode, colors),
            lane,
            event,
        })
        .collect();

    let day_buckets: BTreeMap<NaiveDate, Vec<DayEvent>> = day_buckets
        .into_iter()
        .map(|(day, bucket)| {
            let bucket = bucket
                .into_iter()
                .map(|event| DayEvent {
                    color: resolve_color(&event.event, view_mode, colors),
                    event,
                })
                .collect();
            (day, bucket)
        })
        .collect();

    debug!(
        multi_day = events.len(),
        single_day_days = day_buckets.len(),
        rows = rows.len(),
        max_tracks = tracks_per_day.values().max().copied().unwrap_or(0),
        dropped = diagnostics.dropped.len(),
        clamped = diagnostics.clamped.len(),
        out_of_range = diagnostics.out_of_range,
        "layout pass complete"
    );

    RenderModel {
        range: *range,
        rows,
        events,
        day_buckets,
        tracks_per_day,
        segments,
        segments_by_day_and_track,
        display_meta_by_day,
        diagnostics,
    }
}
