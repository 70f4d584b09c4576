//! # calendar-grid
//!
//! Deterministic layout of calendar events on a day-by-day month grid.
//!
//! Given a list of provider events and a visible date range, the engine
//! decides which events are single-day markers and which are multi-day bars,
//! assigns every bar a stable lane so concurrent bars never collide, splits
//! bars at month-row boundaries, resolves colors, and overlays pre-computed
//! holiday annotations. It never talks to the network and holds no state:
//! [`layout()`] is a pure function of its inputs.
//!
//! ## Modules
//!
//! - [`event`] — Provider-shaped input model (events, calendar sources)
//! - [`normalize`] — Exclusive/inclusive end dates → inclusive day spans
//! - [`bucket`] — Priority ordering and single-day buckets
//! - [`tracks`] — Greedy lane allocation for multi-day bars
//! - [`rows`] — Date range, month rows, week numbers
//! - [`segment`] — Per-row bar segments and per-day lane cells
//! - [`color`] — View-mode dependent color resolution
//! - [`holiday`] — Holiday overlay and per-day display metadata
//! - [`merge`] — Replace/append helpers for the caller's event list
//! - [`layout`](mod@layout) — The layout pass and its render model
//! - [`config`] — Layout options and their JSON form
//! - [`error`] — Error types

pub mod bucket;
pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod holiday;
pub mod layout;
pub mod merge;
pub mod normalize;
pub mod rows;
pub mod segment;
pub mod tracks;

pub use bucket::{build_day_buckets, priority_order, sort_by_priority, Buckets};
pub use color::{
    contrast_color, resolve_color, ColorDefinition, ColorMaps, ColorSource, EventColor, ViewMode,
    DEFAULT_ACCENT,
};
pub use config::{LayoutConfig, LayoutOptions, MidnightPolicy, WeekStartDay};
pub use error::LayoutError;
pub use event::{CalendarSource, Event, EventBoundary, EventKey};
pub use holiday::{DayDisplayMeta, DayTone, HolidayEntry, HolidayFlags};
pub use layout::{layout, layout_with_options, DayEvent, PlacedEvent, RenderModel};
pub use merge::{merge_refreshed, remove_event, upsert_event};
pub use normalize::{normalize_event, normalize_events, Diagnostics, DroppedEvent, NormalizedEvent};
pub use rows::{month_rows, week_number, DateRange, MonthRow, GRID_COLUMNS};
pub use segment::{segment_for_row, segments_for_event, Segment, TrackCell};
pub use tracks::{allocate_tracks, TrackAssignment, TrackLayout};
