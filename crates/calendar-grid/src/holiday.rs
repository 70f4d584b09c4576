//! Holiday overlay and per-day display metadata.
//!
//! Holidays are computed elsewhere and arrive as date-keyed entries. They only
//! annotate days; they never become events and never affect lanes.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::LayoutOptions;
use crate::normalize::NormalizedEvent;
use crate::rows::{is_week_start, week_number, DateRange};

/// Styling categories of a holiday. Not mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolidayFlags {
    /// Major holiday, styled like a rest day.
    pub major: bool,
    /// Intermediate or festive day, styled like an eve.
    pub festive: bool,
    pub fast: bool,
}

/// One pre-computed holiday annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub text: String,
    #[serde(default)]
    pub flags: HolidayFlags,
}

impl HolidayEntry {
    pub fn new(date: NaiveDate, text: impl Into<String>, flags: HolidayFlags) -> Self {
        Self {
            date,
            text: text.into(),
            flags,
        }
    }
}

/// Visual class of a day cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayTone {
    #[default]
    Regular,
    /// Eve of a rest day or festive day.
    Eve,
    /// Rest day or major holiday.
    Rest,
}

/// Display metadata for one day, next to (not inside) the event layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayDisplayMeta {
    pub holiday: Option<HolidayEntry>,
    pub tone: DayTone,
    pub fast: bool,
    /// Number of single-day events on this day.
    pub single_day_count: usize,
    /// Set on the first day of each week when week numbers are enabled.
    pub week_number: Option<u32>,
}

/// Holiday lookup by date. A later entry for the same date replaces an
/// earlier one entirely; flags are not combined.
pub fn holidays_by_date(holidays: &[HolidayEntry]) -> BTreeMap<NaiveDate, &HolidayEntry> {
    holidays.iter().map(|h| (h.date, h)).collect()
}

/// Build the display metadata of every day in `range`.
pub fn merge(
    day_buckets: &BTreeMap<NaiveDate, Vec<NormalizedEvent>>,
    holidays: &[HolidayEntry],
    range: &DateRange,
    options: &LayoutOptions,
) -> BTreeMap<NaiveDate, DayDisplayMeta> {
    let by_date = holidays_by_date(holidays);

    range
        .days()
        .map(|day| {
            let holiday = by_date.get(&day).map(|&h| h.clone());
            let flags = holiday.as_ref().map(|h| h.flags).unwrap_or_default();
            let meta = DayDisplayMeta {
                tone: day_tone(day, flags, options),
                fast: flags.fast,
                holiday,
                single_day_count: day_buckets.get(&day).map_or(0, Vec::len),
                week_number: (options.show_week_numbers && is_week_start(day, options.week_start))
                    .then(|| week_number(day, options.week_start)),
            };
            (day, meta)
        })
        .collect()
}

fn day_tone(day: NaiveDate, flags: HolidayFlags, options: &LayoutOptions) -> DayTone {
    let weekday = day.weekday();
    if flags.major || options.rest_days.contains(&weekday) {
        DayTone::Rest
    } else if flags.festive || options.eve_days.contains(&weekday) {
        DayTone::Eve
    } else {
        DayTone::Regular
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeekStartDay;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn march() -> DateRange {
        DateRange::new(d(3, 1), d(3, 31)).unwrap()
    }

    #[test]
    fn test_last_entry_wins_without_union() {
        let holidays = vec![
            HolidayEntry::new(d(3, 24), "Purim", HolidayFlags { festive: true, ..HolidayFlags::default() }),
            HolidayEntry::new(d(3, 24), "Shushan Purim", HolidayFlags { fast: true, ..HolidayFlags::default() }),
        ];
        let meta = merge(&BTreeMap::new(), &holidays, &march(), &LayoutOptions::default());
        let day = &meta[&d(3, 24)];
        let holiday = day.holiday.as_ref().unwrap();
        assert_eq!(holiday.text, "Shushan Purim");
        assert!(!holiday.flags.festive);
        assert!(day.fast);
    }

    #[test]
    fn test_every_day_in_range_has_meta() {
        let meta = merge(&BTreeMap::new(), &[], &march(), &LayoutOptions::default());
        assert_eq!(meta.len(), 31);
        assert!(meta.values().all(|m| m.holiday.is_none()));
    }

    #[test]
    fn test_out_of_range_holidays_ignored() {
        let holidays = vec![HolidayEntry::new(d(4, 1), "Later", HolidayFlags::default())];
        let meta = merge(&BTreeMap::new(), &holidays, &march(), &LayoutOptions::default());
        assert!(!meta.contains_key(&d(4, 1)));
    }

    #[test]
    fn test_day_tone_from_weekday_and_flags() {
        let options = LayoutOptions::default();
        let holidays = vec![
            // Wednesday
            HolidayEntry::new(d(3, 6), "Major", HolidayFlags { major: true, ..HolidayFlags::default() }),
            // Thursday
            HolidayEntry::new(d(3, 7), "Festive", HolidayFlags { festive: true, ..HolidayFlags::default() }),
        ];
        let meta = merge(&BTreeMap::new(), &holidays, &march(), &options);
        assert_eq!(meta[&d(3, 6)].tone, DayTone::Rest);
        assert_eq!(meta[&d(3, 7)].tone, DayTone::Eve);
        // 2024-03-08 is a Friday, 03-09 a Saturday.
        assert_eq!(meta[&d(3, 8)].tone, DayTone::Eve);
        assert_eq!(meta[&d(3, 9)].tone, DayTone::Rest);
        assert_eq!(meta[&d(3, 11)].tone, DayTone::Regular);
    }

    #[test]
    fn test_week_numbers_on_week_start_only() {
        let meta = merge(&BTreeMap::new(), &[], &march(), &LayoutOptions::default());
        // Sundays in March 2024: 3, 10, 17, 24, 31.
        assert_eq!(meta[&d(3, 3)].week_number, Some(10));
        assert_eq!(meta[&d(3, 4)].week_number, None);

        let options = LayoutOptions {
            show_week_numbers: false,
            week_start: WeekStartDay::Monday,
            ..LayoutOptions::default()
        };
        let meta = merge(&BTreeMap::new(), &[], &march(), &options);
        assert!(meta.values().all(|m| m.week_number.is_none()));
    }

    #[test]
    fn test_holiday_entry_from_json() {
        let entries: Vec<HolidayEntry> = serde_json::from_str(
            r#"[{"date": "2024-04-23", "text": "Pesach I", "flags": {"major": true}},
                {"date": "2024-05-14", "text": "Independence Day"}]"#,
        )
        .unwrap();
        assert!(entries[0].flags.major);
        assert!(!entries[0].flags.fast);
        assert_eq!(entries[1].flags, HolidayFlags::default());
    }
}
