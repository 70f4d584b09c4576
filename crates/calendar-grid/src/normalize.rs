//! Event normalization: provider boundaries to inclusive calendar-day ranges.
//!
//! All-day events use the provider's exclusive end-date convention (an event
//! on June 10-12 is stored with `end.date = 2024-06-13`); this module turns
//! every event into an inclusive `[start_day, end_day]` pair and decides
//! whether it is drawn as a multi-day bar.
//!
//! Problems are recovered locally: an event without a usable start is dropped
//! and an end before the start is clamped. Neither aborts the batch; both are
//! reported through [`Diagnostics`].

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::config::{LayoutOptions, MidnightPolicy};
use crate::error::LayoutError;
use crate::event::{Event, EventBoundary, EventKey};

/// An event with its inclusive calendar-day span resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedEvent {
    pub event: Event,
    /// First day the event occupies.
    pub start_day: NaiveDate,
    /// Last day the event occupies (inclusive).
    pub end_day: NaiveDate,
    /// Wall-clock start. Midnight for all-day events.
    pub start_at: NaiveDateTime,
    /// Wall-clock end (exclusive midnight for all-day events), never before
    /// `start_at`.
    pub end_at: NaiveDateTime,
    /// Absolute start used for ordering. All-day events start at midnight in
    /// the configured timezone, or UTC when none is set.
    pub start_instant: DateTime<Utc>,
    /// Absolute end, never before `start_instant`.
    pub end_instant: DateTime<Utc>,
    /// The start boundary is date-only.
    pub all_day: bool,
    /// `end_day > start_day`.
    pub is_multi_day: bool,
    /// The provided end was before the start (or unusable) and was clamped.
    pub was_clamped: bool,
}

impl NormalizedEvent {
    pub fn key(&self) -> EventKey {
        self.event.key()
    }

    /// Number of calendar days covered, at least 1.
    pub fn len_days(&self) -> i64 {
        (self.end_day - self.start_day).num_days() + 1
    }

    /// Every day of the span in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start_day.iter_days().take(self.len_days() as usize)
    }

    pub fn occupies(&self, day: NaiveDate) -> bool {
        self.start_day <= day && day <= self.end_day
    }

    /// Whether the span shares at least one day with `[first, last]`.
    pub fn intersects(&self, first: NaiveDate, last: NaiveDate) -> bool {
        self.start_day <= last && first <= self.end_day
    }
}

/// Events dropped or repaired during a layout pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub dropped: Vec<DroppedEvent>,
    pub clamped: Vec<EventKey>,
    /// Valid events that do not intersect the requested date range.
    pub out_of_range: usize,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.clamped.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedEvent {
    pub key: EventKey,
    pub reason: String,
}

// ── Boundaries ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Boundary {
    Date(NaiveDate),
    Instant {
        local: NaiveDateTime,
        utc: DateTime<Utc>,
    },
}

impl Boundary {
    fn day(self) -> NaiveDate {
        match self {
            Boundary::Date(d) => d,
            Boundary::Instant { local, .. } => local.date(),
        }
    }

    /// Last occupied day when used as an end. Dates are exclusive.
    fn last_day(self) -> NaiveDate {
        match self {
            Boundary::Date(d) => d.pred_opt().unwrap_or(d),
            Boundary::Instant { local, .. } => local.date(),
        }
    }

    fn at(self) -> NaiveDateTime {
        match self {
            Boundary::Date(d) => d.and_time(NaiveTime::MIN),
            Boundary::Instant { local, .. } => local,
        }
    }

    fn instant(self, tz: Option<Tz>) -> DateTime<Utc> {
        match self {
            Boundary::Instant { utc, .. } => utc,
            Boundary::Date(d) => {
                let midnight = d.and_time(NaiveTime::MIN);
                tz.and_then(|tz| tz.from_local_datetime(&midnight).earliest())
                    .map(|t| t.with_timezone(&Utc))
                    .unwrap_or_else(|| midnight.and_utc())
            }
        }
    }

    /// End assumed when none is usable: the whole start day for dates, zero
    /// length for instants.
    fn default_end(self) -> Boundary {
        match self {
            Boundary::Date(d) => Boundary::Date(d.succ_opt().unwrap_or(d)),
            instant => instant,
        }
    }
}

/// Parse one boundary. A date-time wins over a date when both are present.
fn parse_boundary(boundary: &EventBoundary, tz: Option<Tz>) -> Result<Boundary, LayoutError> {
    if let Some(s) = boundary.date_time.as_deref() {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| LayoutError::InvalidDatetime(format!("'{}': {}", s, e)))?;
        let local = match tz {
            Some(tz) => dt.with_timezone(&tz).naive_local(),
            None => dt.naive_local(),
        };
        return Ok(Boundary::Instant {
            local,
            utc: dt.with_timezone(&Utc),
        });
    }
    if let Some(s) = boundary.date.as_deref() {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| LayoutError::InvalidDatetime(format!("'{}': {}", s, e)))?;
        return Ok(Boundary::Date(date));
    }
    Err(LayoutError::InvalidDatetime("empty boundary".to_string()))
}

// ── Normalization ───────────────────────────────────────────────────────────

/// Normalize a single event.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidEvent`] if the event has no start boundary or
/// the start cannot be parsed. An unusable end is not an error: the event is
/// clamped to its start.
///
/// # Examples
///
/// ```
/// use calendar_grid::{normalize_event, Event, LayoutOptions};
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
/// let event = Event::all_day("offsite", "Offsite", d(10), d(13));
/// let n = normalize_event(&event, &LayoutOptions::default()).unwrap();
/// assert_eq!((n.start_day, n.end_day), (d(10), d(12)));
/// assert!(n.is_multi_day);
/// ```
pub fn normalize_event(
    event: &Event,
    options: &LayoutOptions,
) -> Result<NormalizedEvent, LayoutError> {
    let key = event.key();
    let start_raw = event
        .start
        .as_ref()
        .filter(|b| !b.is_empty())
        .ok_or_else(|| LayoutError::InvalidEvent(format!("'{}': missing start", key)))?;
    let start = parse_boundary(start_raw, options.timezone)
        .map_err(|e| LayoutError::InvalidEvent(format!("'{}': {}", key, e)))?;

    let tz = options.timezone;
    let fallback = start.default_end();
    let mut was_clamped = false;
    let mut end = match event.end.as_ref().filter(|b| !b.is_empty()) {
        Some(raw) => match parse_boundary(raw, tz) {
            Ok(end) => end,
            Err(e) => {
                debug!(event = %key, error = %e, "unusable end boundary, clamping to start");
                was_clamped = true;
                fallback
            }
        },
        None => fallback,
    };

    let start_day = start.day();
    let start_at = start.at();
    let start_instant = start.instant(tz);
    if end.last_day() < start_day || end.instant(tz) < start_instant {
        end = fallback;
        was_clamped = true;
    }

    let mut end_day = end.last_day().max(start_day);
    // Written offsets may differ, so wall clocks can disagree with instants.
    let end_at = end.at().max(start_at);
    let end_instant = end.instant(tz);

    if options.midnight_policy == MidnightPolicy::TrimShortOvernight
        && matches!(
            (start, end),
            (Boundary::Instant { .. }, Boundary::Instant { .. })
        )
        && start_day.succ_opt() == Some(end_day)
        && end_instant - start_instant < Duration::hours(24)
    {
        end_day = start_day;
    }

    Ok(NormalizedEvent {
        event: event.clone(),
        start_day,
        end_day,
        start_at,
        end_at,
        start_instant,
        end_instant,
        all_day: matches!(start, Boundary::Date(_)),
        is_multi_day: end_day > start_day,
        was_clamped,
    })
}

/// Normalize a batch, dropping invalid events and recording diagnostics.
///
/// Output order is input order.
pub fn normalize_events<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    options: &LayoutOptions,
) -> (Vec<NormalizedEvent>, Diagnostics) {
    let mut diagnostics = Diagnostics::default();
    let mut out = Vec::new();

    for event in events {
        match normalize_event(event, options) {
            Ok(normalized) => {
                if normalized.was_clamped {
                    debug!(event = %normalized.key(), "clamped malformed range");
                    diagnostics.clamped.push(normalized.key());
                }
                out.push(normalized);
            }
            Err(e) => {
                debug!(event = %event.key(), error = %e, "dropping invalid event");
                diagnostics.dropped.push(DroppedEvent {
                    key: event.key(),
                    reason: e.to_string(),
                });
            }
        }
    }

    (out, diagnostics)
}
