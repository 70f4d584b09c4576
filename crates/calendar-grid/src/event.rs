//! Input model: events and calendar sources as a calendar provider returns them.
//!
//! Field names follow the provider's JSON (`summary`, `start.dateTime`,
//! `colorId`, ...) so a fetched payload can be deserialized directly. Nothing
//! here is validated; the [`normalize`](crate::normalize) module decides what
//! a usable event is.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// One boundary (start or end) of an event.
///
/// Exactly one of the two fields is normally present: `date` for all-day
/// events, `date_time` for timed events. When both are present the date-time
/// wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBoundary {
    /// Date-only value (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// RFC 3339 date-time value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
}

impl EventBoundary {
    pub fn date(date: NaiveDate) -> Self {
        Self {
            date: Some(date.format("%Y-%m-%d").to_string()),
            date_time: None,
        }
    }

    pub fn date_time(dt: DateTime<FixedOffset>) -> Self {
        Self {
            date: None,
            date_time: Some(dt.to_rfc3339()),
        }
    }

    /// True when the boundary carries no usable value at all.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.date_time.is_none()
    }

    /// True when the boundary is date-only (no date-time present).
    pub fn is_date_only(&self) -> bool {
        self.date_time.is_none() && self.date.is_some()
    }
}

/// A single concrete event occurrence.
///
/// Recurrences must already be expanded by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Identifier, unique within one calendar source.
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "summary")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventBoundary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventBoundary>,
    /// Source calendar the event was fetched from.
    #[serde(default, alias = "_calendarId", skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
    /// Color category identifier (a key of the provider's event palette).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
}

impl Event {
    /// An all-day event. `end_exclusive` follows the provider convention: the
    /// day after the last day of the event.
    pub fn all_day(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start: Some(EventBoundary::date(start)),
            end: Some(EventBoundary::date(end_exclusive)),
            ..Self::default()
        }
    }

    /// A timed event between two instants.
    pub fn timed(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start: Some(EventBoundary::date_time(start)),
            end: Some(EventBoundary::date_time(end)),
            ..Self::default()
        }
    }

    pub fn with_calendar(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = Some(calendar_id.into());
        self
    }

    pub fn with_color(mut self, color_id: impl Into<String>) -> Self {
        self.color_id = Some(color_id.into());
        self
    }

    pub fn key(&self) -> EventKey {
        EventKey {
            calendar_id: self.calendar_id.clone(),
            id: self.id.clone(),
        }
    }
}

/// Identity of an event across sources: ids are only unique per calendar.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventKey {
    pub calendar_id: Option<String>,
    pub id: String,
}

impl std::fmt::Display for EventKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.calendar_id {
            Some(cal) => write!(f, "{}/{}", cal, self.id),
            None => f.write_str(&self.id),
        }
    }
}

/// An entry of the provider's calendar list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,
    #[serde(default)]
    pub primary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_provider_event() {
        let json = r#"{
            "id": "abc",
            "summary": "Offsite",
            "start": {"date": "2024-06-10"},
            "end": {"date": "2024-06-13"},
            "colorId": "5",
            "_calendarId": "team@example.com"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.title, "Offsite");
        assert_eq!(event.color_id.as_deref(), Some("5"));
        assert_eq!(event.calendar_id.as_deref(), Some("team@example.com"));
        assert!(event.start.as_ref().unwrap().is_date_only());
    }

    #[test]
    fn test_deserialize_timed_event_without_optional_fields() {
        let json = r#"{
            "id": "t1",
            "start": {"dateTime": "2024-03-01T09:00:00+02:00"},
            "end": {"dateTime": "2024-03-01T10:00:00+02:00"}
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.title, "");
        assert!(event.calendar_id.is_none());
        assert!(!event.end.as_ref().unwrap().is_date_only());
    }

    #[test]
    fn test_all_day_constructor_formats_dates() {
        let event = Event::all_day(
            "a",
            "A",
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
        );
        assert_eq!(
            event.start.unwrap().date.as_deref(),
            Some("2024-01-05")
        );
    }

    #[test]
    fn test_event_key_display() {
        let plain = Event {
            id: "x".into(),
            ..Event::default()
        };
        assert_eq!(plain.key().to_string(), "x");
        assert_eq!(plain.with_calendar("cal").key().to_string(), "cal/x");
    }

    #[test]
    fn test_calendar_source_from_provider_list() {
        let json = r##"{"id": "primary", "summary": "Me", "backgroundColor": "#9fe1e7", "primary": true}"##;
        let source: CalendarSource = serde_json::from_str(json).unwrap();
        assert_eq!(source.background_color.as_deref(), Some("#9fe1e7"));
        assert!(source.primary);
    }
}
