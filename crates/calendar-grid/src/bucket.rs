//! Priority ordering and the single-day / multi-day split.
//!
//! The ordering here decides which event wins a low-numbered lane in
//! [`tracks`](crate::tracks): multi-day events first, then earlier start, then
//! longer duration. The sort is stable, so fully tied events keep input order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::normalize::NormalizedEvent;

/// Single-day events per date plus the multi-day events, both in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets {
    pub day_buckets: BTreeMap<NaiveDate, Vec<NormalizedEvent>>,
    pub multi_day: Vec<NormalizedEvent>,
}

/// Layout priority between two events.
///
/// 1. multi-day before single-day
/// 2. ascending start instant
/// 3. descending end instant (longer first)
///
/// Instants are absolute, so events written in different UTC offsets compare
/// by when they actually happen.
pub fn priority_order(a: &NormalizedEvent, b: &NormalizedEvent) -> Ordering {
    b.is_multi_day
        .cmp(&a.is_multi_day)
        .then_with(|| a.start_instant.cmp(&b.start_instant))
        .then_with(|| b.end_instant.cmp(&a.end_instant))
}

/// Stable sort by [`priority_order`].
pub fn sort_by_priority(events: &mut [NormalizedEvent]) {
    events.sort_by(priority_order);
}

/// Sort `events` by priority and split them into per-day buckets of
/// single-day events and the ordered multi-day list.
pub fn build_day_buckets(mut events: Vec<NormalizedEvent>) -> Buckets {
    sort_by_priority(&mut events);

    let mut buckets = Buckets::default();
    for event in events {
        if event.is_multi_day {
            buckets.multi_day.push(event);
        } else {
            buckets
                .day_buckets
                .entry(event.start_day)
                .or_default()
                .push(event);
        }
    }
    buckets
}
