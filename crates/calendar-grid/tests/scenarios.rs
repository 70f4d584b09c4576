//! End-to-end layout scenarios on provider-shaped JSON.

use calendar_grid::{
    layout, layout_with_options, CalendarSource, ColorDefinition, ColorMaps, DateRange, DayTone,
    Event, HolidayEntry, LayoutConfig, TrackCell, ViewMode,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("calendar_grid=debug")
        .with_test_writer()
        .try_init();
}

fn events(json: &str) -> Vec<Event> {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_all_day_exclusive_end_round_trip() {
    let evs = events(
        r#"[{"id": "offsite", "summary": "Offsite",
             "start": {"date": "2024-06-10"}, "end": {"date": "2024-06-13"}}]"#,
    );
    let model = layout(
        &evs,
        &DateRange::year(2024).unwrap(),
        &[],
        ViewMode::Single,
        &ColorMaps::default(),
    );
    let placed = &model.events[0].event;
    assert_eq!(placed.start_day, d(2024, 6, 10));
    assert_eq!(placed.end_day, d(2024, 6, 12));
    assert_eq!(placed.len_days(), 3);
    assert_eq!(model.tracks_on(d(2024, 6, 13)), 0);
}

#[test]
fn test_equal_spans_get_lanes_zero_and_one() {
    let evs = events(
        r#"[{"id": "A", "start": {"date": "2024-03-01"}, "end": {"date": "2024-03-06"}},
            {"id": "B", "start": {"date": "2024-03-01"}, "end": {"date": "2024-03-06"}}]"#,
    );
    let model = layout(
        &evs,
        &DateRange::year(2024).unwrap(),
        &[],
        ViewMode::Single,
        &ColorMaps::default(),
    );
    let a = model.events.iter().find(|p| p.event.event.id == "A").unwrap();
    let b = model.events.iter().find(|p| p.event.event.id == "B").unwrap();
    assert_eq!((a.lane, b.lane), (0, 1));
    for day in d(2024, 3, 1).iter_days().take(5) {
        let cells = &model.segments_by_day_and_track[&day];
        assert_eq!(cells.len(), 2);
        assert!(!matches!(cells[0], TrackCell::Empty));
        assert!(!matches!(cells[1], TrackCell::Empty));
    }
}

#[test]
fn test_month_crossing_event_splits_into_two_segments() {
    init_tracing();
    let evs = events(
        r#"[{"id": "trip", "start": {"date": "2024-01-28"}, "end": {"date": "2024-02-04"}}]"#,
    );
    let model = layout(
        &evs,
        &DateRange::year(2024).unwrap(),
        &[],
        ViewMode::Single,
        &ColorMaps::default(),
    );
    let segs: Vec<_> = model.segments_of(0).collect();
    assert_eq!(segs.len(), 2);

    assert_eq!((segs[0].start, segs[0].end), (d(2024, 1, 28), d(2024, 1, 31)));
    assert!(segs[0].is_true_start && !segs[0].is_true_end);

    assert_eq!((segs[1].start, segs[1].end), (d(2024, 2, 1), d(2024, 2, 3)));
    assert!(!segs[1].is_true_start && segs[1].is_true_end);

    // Bars are drawn on the first visible day of each row only.
    assert!(matches!(model.segments_by_day_and_track[&d(2024, 1, 28)][0], TrackCell::Bar(_)));
    assert!(matches!(
        model.segments_by_day_and_track[&d(2024, 1, 29)][0],
        TrackCell::Placeholder { event: 0 }
    ));
    assert!(matches!(model.segments_by_day_and_track[&d(2024, 2, 1)][0], TrackCell::Bar(_)));
}

#[test]
fn test_multi_view_uses_calendar_color_over_category() {
    let evs = events(
        r#"[{"id": "e", "colorId": "5", "_calendarId": "work",
             "start": {"date": "2024-03-01"}, "end": {"date": "2024-03-04"}},
            {"id": "f", "_calendarId": "home",
             "start": {"dateTime": "2024-03-02T10:00:00Z"}, "end": {"dateTime": "2024-03-02T11:00:00Z"}}]"#,
    );
    let sources: Vec<CalendarSource> = serde_json::from_str(
        r##"[{"id": "work", "summary": "Work", "backgroundColor": "#0b8043"},
             {"id": "home", "summary": "Home", "backgroundColor": "#ffffff"}]"##,
    )
    .unwrap();
    let palette: BTreeMap<String, ColorDefinition> = serde_json::from_str(
        r##"{"5": {"background": "#fbd75b", "foreground": "#1d1d1d"}}"##,
    )
    .unwrap();
    let colors = ColorMaps::from_sources(&sources).with_palette(&palette);
    let range = DateRange::year(2024).unwrap();

    let model = layout(&evs, &range, &[], ViewMode::for_visible_count(2), &colors);
    assert_eq!(model.events[0].color.background, "#0b8043");
    let single = &model.day_buckets[&d(2024, 3, 2)][0];
    assert_eq!(single.color.background, "#ffffff");
    assert_eq!(single.color.text, "#000000");

    let model = layout(&evs, &range, &[], ViewMode::for_visible_count(1), &colors);
    assert_eq!(model.events[0].color.background, "#fbd75b");
}

#[test]
fn test_later_holiday_entry_wins() {
    let holidays: Vec<HolidayEntry> = serde_json::from_str(
        r#"[{"date": "2024-12-25", "text": "Chanukah: 1 Candle", "flags": {"festive": true}},
            {"date": "2024-12-25", "text": "Christmas", "flags": {"major": true}}]"#,
    )
    .unwrap();
    let model = layout(
        &[],
        &DateRange::year(2024).unwrap(),
        &holidays,
        ViewMode::Single,
        &ColorMaps::default(),
    );
    let meta = &model.display_meta_by_day[&d(2024, 12, 25)];
    assert_eq!(meta.holiday.as_ref().unwrap().text, "Christmas");
    assert_eq!(meta.tone, DayTone::Rest);
}

#[test]
fn test_config_drives_overnight_policy_and_timezone() {
    let evs = events(
        r#"[{"id": "late", "start": {"dateTime": "2024-03-01T21:50:00Z"},
             "end": {"dateTime": "2024-03-01T22:10:00Z"}}]"#,
    );
    let range = DateRange::new(d(2024, 3, 1), d(2024, 3, 31)).unwrap();

    // UTC: same day, single-day.
    let utc = layout(&evs, &range, &[], ViewMode::Single, &ColorMaps::default());
    assert!(utc.events.is_empty());
    assert_eq!(utc.day_buckets[&d(2024, 3, 1)].len(), 1);

    // Jerusalem (UTC+2 in early March): 23:50 to 00:10 crosses midnight.
    let by_date = LayoutConfig::from_json(r#"{"timezone": "Asia/Jerusalem"}"#)
        .unwrap()
        .into_options()
        .unwrap();
    let model = layout_with_options(
        &evs,
        &range,
        &[],
        ViewMode::Single,
        &ColorMaps::default(),
        &by_date,
    );
    assert_eq!(model.events.len(), 1);
    assert_eq!(model.tracks_on(d(2024, 3, 2)), 1);

    let trimmed = LayoutConfig::from_json(
        r#"{"timezone": "Asia/Jerusalem", "midnight_policy": "trim_short_overnight"}"#,
    )
    .unwrap()
    .into_options()
    .unwrap();
    let model = layout_with_options(
        &evs,
        &range,
        &[],
        ViewMode::Single,
        &ColorMaps::default(),
        &trimmed,
    );
    assert!(model.events.is_empty());
    assert_eq!(model.day_buckets[&d(2024, 3, 1)].len(), 1);
}

#[test]
fn test_malformed_events_are_reported_not_fatal() {
    let evs = events(
        r#"[{"id": "nostart", "end": {"date": "2024-05-02"}},
            {"id": "reversed", "start": {"dateTime": "2024-05-10T10:00:00Z"},
             "end": {"dateTime": "2024-05-08T10:00:00Z"}},
            {"id": "fine", "start": {"date": "2024-05-01"}, "end": {"date": "2024-05-03"}}]"#,
    );
    let model = layout(
        &evs,
        &DateRange::year(2024).unwrap(),
        &[],
        ViewMode::Single,
        &ColorMaps::default(),
    );
    assert_eq!(model.diagnostics.dropped.len(), 1);
    assert_eq!(model.diagnostics.clamped.len(), 1);
    assert_eq!(model.events.len(), 1);
    assert_eq!(model.day_buckets[&d(2024, 5, 10)][0].event.event.id, "reversed");
}

#[test]
fn test_config_default_color_applies_to_uncolored_events() {
    let evs = events(
        r#"[{"id": "plain", "start": {"date": "2024-04-01"}, "end": {"date": "2024-04-03"}}]"#,
    );
    let config = LayoutConfig::from_json(r##"{"default_color": "#222222"}"##).unwrap();
    let colors = ColorMaps::default().with_config(&config).unwrap();
    let options = config.into_options().unwrap();
    let model = layout_with_options(
        &evs,
        &DateRange::year(2024).unwrap(),
        &[],
        ViewMode::Single,
        &colors,
        &options,
    );
    assert_eq!(model.events[0].color.background, "#222222");
    assert_eq!(model.events[0].color.text, "#ffffff");
}

#[test]
fn test_mixed_offset_calendars_order_by_real_start() {
    let evs = events(
        r#"[{"id": "B", "_calendarId": "london",
             "start": {"dateTime": "2024-03-01T08:00:00Z"}, "end": {"dateTime": "2024-03-05T08:00:00Z"}},
            {"id": "A", "_calendarId": "karachi",
             "start": {"dateTime": "2024-03-01T10:00:00+05:00"}, "end": {"dateTime": "2024-03-03T10:00:00+05:00"}}]"#,
    );
    let model = layout(
        &evs,
        &DateRange::year(2024).unwrap(),
        &[],
        ViewMode::Multi,
        &ColorMaps::default(),
    );
    let lanes: Vec<_> = model
        .events
        .iter()
        .map(|p| (p.event.event.id.as_str(), p.lane))
        .collect();
    assert_eq!(lanes, vec![("A", 0), ("B", 1)]);
}
