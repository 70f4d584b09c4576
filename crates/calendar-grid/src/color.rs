//! Event color resolution.
//!
//! When several calendars are visible, the source calendar's color identifies
//! each bar and per-event color categories are ignored. With a single calendar
//! visible, the event's color category (if known) is used instead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::event::{CalendarSource, Event};

/// Fallback bar color.
pub const DEFAULT_ACCENT: &str = "#3d7eff";

const DARK_TEXT: &str = "#000000";
const LIGHT_TEXT: &str = "#ffffff";

/// How many calendar sources are currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Single,
    Multi,
}

impl ViewMode {
    pub fn for_visible_count(count: usize) -> Self {
        if count > 1 {
            ViewMode::Multi
        } else {
            ViewMode::Single
        }
    }
}

/// A palette entry as the provider's color endpoint returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorDefinition {
    pub background: String,
    #[serde(default)]
    pub foreground: String,
}

/// Color lookup tables for a layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMaps {
    /// Calendar id → background color.
    pub calendar_colors: BTreeMap<String, String>,
    /// Color category id → background color.
    pub event_colors: BTreeMap<String, String>,
    pub default_color: String,
}

impl Default for ColorMaps {
    fn default() -> Self {
        Self {
            calendar_colors: BTreeMap::new(),
            event_colors: BTreeMap::new(),
            default_color: DEFAULT_ACCENT.to_string(),
        }
    }
}

impl ColorMaps {
    /// Calendar colors from the provider's calendar list; sources without a
    /// background color are skipped.
    pub fn from_sources(sources: &[CalendarSource]) -> Self {
        let calendar_colors = sources
            .iter()
            .filter_map(|s| {
                s.background_color
                    .as_ref()
                    .filter(|c| !s.id.is_empty() && !c.is_empty())
                    .map(|c| (s.id.clone(), c.clone()))
            })
            .collect();
        Self {
            calendar_colors,
            ..Self::default()
        }
    }

    /// Add the provider's event color palette (category id → definition).
    pub fn with_palette(mut self, palette: &BTreeMap<String, ColorDefinition>) -> Self {
        self.event_colors.extend(
            palette
                .iter()
                .map(|(id, def)| (id.clone(), def.background.clone())),
        );
        self
    }

    pub fn with_default(mut self, color: impl Into<String>) -> Self {
        self.default_color = color.into();
        self
    }

    /// Apply the color settings of a [`LayoutConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] if `default_color` is not a hex
    /// color.
    pub fn with_config(self, config: &LayoutConfig) -> Result<Self, LayoutError> {
        Ok(self.with_default(config.default_color()?))
    }

    fn calendar_color(&self, event: &Event) -> Option<&String> {
        self.calendar_colors.get(event.calendar_id.as_deref()?)
    }

    fn category_color(&self, event: &Event) -> Option<&String> {
        self.event_colors.get(event.color_id.as_deref()?)
    }
}

/// Which rule produced a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSource {
    Calendar,
    Category,
    Default,
}

/// Resolved bar color plus a readable text color on top of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventColor {
    pub background: String,
    pub text: String,
    pub source: ColorSource,
}

/// Resolve the display color of `event`. Always succeeds.
///
/// # Examples
///
/// ```
/// use calendar_grid::{resolve_color, ColorMaps, ColorSource, Event, ViewMode};
///
/// let mut maps = ColorMaps::default();
/// maps.calendar_colors.insert("work".into(), "#0b8043".into());
/// maps.event_colors.insert("5".into(), "#fbd75b".into());
///
/// let event = Event { id: "e".into(), ..Event::default() }.with_calendar("work").with_color("5");
/// assert_eq!(resolve_color(&event, ViewMode::Single, &maps).background, "#fbd75b");
/// assert_eq!(resolve_color(&event, ViewMode::Multi, &maps).source, ColorSource::Calendar);
/// ```
pub fn resolve_color(event: &Event, view_mode: ViewMode, maps: &ColorMaps) -> EventColor {
    let category = match view_mode {
        ViewMode::Multi => None,
        ViewMode::Single => maps
            .category_color(event)
            .map(|c| (c, ColorSource::Category)),
    };
    let (background, source) = category
        .or_else(|| maps.calendar_color(event).map(|c| (c, ColorSource::Calendar)))
        .map(|(c, source)| (c.clone(), source))
        .unwrap_or_else(|| (maps.default_color.clone(), ColorSource::Default));

    EventColor {
        text: contrast_color(&background).to_string(),
        background,
        source,
    }
}

/// Black or white text for a background, by YIQ brightness.
///
/// Anything that is not `#rgb` or `#rrggbb` gets white text.
pub fn contrast_color(background: &str) -> &'static str {
    let Some((r, g, b)) = parse_hex(background) else {
        return LIGHT_TEXT;
    };
    let brightness = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000;
    if brightness > 128 {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

/// Whether `s` is `#rgb` or `#rrggbb`.
pub fn is_hex_color(s: &str) -> bool {
    parse_hex(s).is_some()
}

fn parse_hex(s: &str) -> Option<(u8, u8, u8)> {
    let digits = s.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |hex: &str| u8::from_str_radix(hex, 16).ok();
    match digits.len() {
        3 => {
            let expand = |i: usize| channel(&digits[i..=i].repeat(2));
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Some((
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => None,
    }
}
