//! Layout configuration.
//!
//! [`LayoutConfig`] is the serializable form (every field optional, loadable
//! from JSON); [`LayoutConfig::into_options`] validates it into the typed
//! [`LayoutOptions`] the layout pass consumes.

use std::collections::BTreeSet;

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::color::{is_hex_color, DEFAULT_ACCENT};
use crate::error::LayoutError;

// ── Week start ──────────────────────────────────────────────────────────────

/// Which day occupies the first column of a grid week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    /// ISO 8601 convention.
    Monday,
    /// US/Israel convention.
    #[default]
    Sunday,
}

impl WeekStartDay {
    /// How many columns `weekday` sits after the week start.
    pub fn offset_of(self, weekday: Weekday) -> u32 {
        match self {
            WeekStartDay::Monday => weekday.num_days_from_monday(),
            WeekStartDay::Sunday => weekday.num_days_from_sunday(),
        }
    }

    pub fn weekday(self) -> Weekday {
        match self {
            WeekStartDay::Monday => Weekday::Mon,
            WeekStartDay::Sunday => Weekday::Sun,
        }
    }
}

// ── Midnight policy ─────────────────────────────────────────────────────────

/// How a timed event that crosses midnight by only a few minutes is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MidnightPolicy {
    /// Calendar dates decide: 23:50 to 00:10 occupies two days and is a bar.
    #[default]
    ByCalendarDate,
    /// A timed event shorter than 24 hours that ends on the day after it
    /// starts stays a single-day event on its start date.
    TrimShortOvernight,
}

// ── Options ─────────────────────────────────────────────────────────────────

/// Validated options for a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub week_start: WeekStartDay,
    /// Zone used to take the calendar date of timed events. `None` keeps the
    /// offset written in each timestamp.
    pub timezone: Option<Tz>,
    pub midnight_policy: MidnightPolicy,
    pub show_week_numbers: bool,
    /// Weekdays styled as rest days (like a major holiday).
    pub rest_days: Vec<Weekday>,
    /// Weekdays styled as eve days (like a festive day).
    pub eve_days: Vec<Weekday>,
    /// Calendars whose events are laid out. `None` shows every calendar.
    pub visible_calendars: Option<BTreeSet<String>>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            week_start: WeekStartDay::default(),
            timezone: None,
            midnight_policy: MidnightPolicy::default(),
            show_week_numbers: true,
            rest_days: vec![Weekday::Sat],
            eve_days: vec![Weekday::Fri],
            visible_calendars: None,
        }
    }
}

impl LayoutOptions {
    /// Whether an event from `calendar_id` takes part in the layout.
    ///
    /// Events without a source calendar are always shown.
    pub fn is_visible(&self, calendar_id: Option<&str>) -> bool {
        match (&self.visible_calendars, calendar_id) {
            (Some(visible), Some(id)) => visible.contains(id),
            _ => true,
        }
    }
}

// ── Serializable config ─────────────────────────────────────────────────────

/// Serializable layout configuration.
///
/// ```
/// use calendar_grid::config::LayoutConfig;
///
/// let config = LayoutConfig::from_json(r#"{"week_start": "monday", "timezone": "Asia/Jerusalem"}"#).unwrap();
/// let options = config.into_options().unwrap();
/// assert!(options.timezone.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub week_start: Option<WeekStartDay>,
    /// IANA timezone name.
    pub timezone: Option<String>,
    pub midnight_policy: Option<MidnightPolicy>,
    pub show_week_numbers: Option<bool>,
    /// Weekday names (`"saturday"`, `"sat"`, ...).
    pub rest_days: Option<Vec<String>>,
    pub eve_days: Option<Vec<String>>,
    pub visible_calendars: Option<Vec<String>>,
    /// Fallback bar color, `#rgb` or `#rrggbb`. Not part of [`LayoutOptions`];
    /// apply it with [`ColorMaps::with_config`](crate::color::ColorMaps::with_config).
    pub default_color: Option<String>,
}

impl LayoutConfig {
    /// Parse a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] if the document is not valid JSON
    /// or contains unknown fields.
    pub fn from_json(s: &str) -> Result<Self, LayoutError> {
        serde_json::from_str(s).map_err(|e| LayoutError::InvalidConfig(e.to_string()))
    }

    /// Validate into [`LayoutOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidTimezone`] for an unknown IANA name and
    /// [`LayoutError::InvalidConfig`] for a bad weekday name or color.
    pub fn into_options(self) -> Result<LayoutOptions, LayoutError> {
        let defaults = LayoutOptions::default();

        let timezone = self.timezone.as_deref().map(parse_timezone).transpose()?;
        let rest_days = match self.rest_days {
            Some(names) => parse_weekdays(&names)?,
            None => defaults.rest_days,
        };
        let eve_days = match self.eve_days {
            Some(names) => parse_weekdays(&names)?,
            None => defaults.eve_days,
        };

        Ok(LayoutOptions {
            week_start: self.week_start.unwrap_or(defaults.week_start),
            timezone,
            midnight_policy: self.midnight_policy.unwrap_or(defaults.midnight_policy),
            show_week_numbers: self.show_week_numbers.unwrap_or(defaults.show_week_numbers),
            rest_days,
            eve_days,
            visible_calendars: self
                .visible_calendars
                .map(|ids| ids.into_iter().collect()),
        })
    }

    /// The configured fallback color, validated.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] if the value is not a hex color.
    pub fn default_color(&self) -> Result<String, LayoutError> {
        match &self.default_color {
            Some(c) if is_hex_color(c) => Ok(c.clone()),
            Some(c) => Err(LayoutError::InvalidConfig(format!(
                "default_color '{}' is not a hex color",
                c
            ))),
            None => Ok(DEFAULT_ACCENT.to_string()),
        }
    }
}

/// Parse an IANA timezone string into `Tz`.
fn parse_timezone(s: &str) -> Result<Tz, LayoutError> {
    s.parse::<Tz>()
        .map_err(|_| LayoutError::InvalidTimezone(format!("'{}'", s)))
}

fn parse_weekdays(names: &[String]) -> Result<Vec<Weekday>, LayoutError> {
    names
        .iter()
        .map(|name| {
            name.trim().parse::<Weekday>().map_err(|_| {
                LayoutError::InvalidConfig(format!("unknown weekday '{}'", name))
            })
        })
        .collect()
}
