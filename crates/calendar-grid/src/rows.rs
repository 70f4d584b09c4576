//! Visible date range and its partition into month rows.
//!
//! Each month is one grid row. Rows are aligned by weekday: a row starts with
//! enough empty leading cells that every day lands in the column of its
//! weekday, and is padded on the right up to [`GRID_COLUMNS`].

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

use crate::config::WeekStartDay;
use crate::error::LayoutError;

/// Columns of a month row: 31 days plus at most 6 leading empty cells.
pub const GRID_COLUMNS: u32 = 37;

/// Inclusive range of visible days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidRange`] if `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LayoutError> {
        if end < start {
            return Err(LayoutError::InvalidRange(format!(
                "end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// January 1 through December 31 of `year`.
    pub fn year(year: i32) -> Result<Self, LayoutError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| LayoutError::InvalidRange(format!("year {} out of range", year)))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| LayoutError::InvalidRange(format!("year {} out of range", year)))?;
        Self::new(start, end)
    }

    /// Whole months around `anchor`: from the first day of the month
    /// `months_back` months before it to the last day of the month
    /// `months_forward` months after it.
    pub fn around(anchor: NaiveDate, months_back: u32, months_forward: u32) -> Result<Self, LayoutError> {
        let out_of_range =
            || LayoutError::InvalidRange(format!("months around {} out of range", anchor));
        let first = first_day_of_month(anchor)
            .checked_sub_months(Months::new(months_back))
            .ok_or_else(out_of_range)?;
        let last_month = first_day_of_month(anchor)
            .checked_add_months(Months::new(months_forward))
            .ok_or_else(out_of_range)?;
        Self::new(first, last_day_of_month(last_month))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.len_days() as usize)
    }
}

/// One month of the grid, clipped to the visible range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthRow {
    pub year: i32,
    pub month: u32,
    /// First visible day of the row.
    pub start: NaiveDate,
    /// Last visible day of the row.
    pub end: NaiveDate,
    /// Empty cells before `start`.
    pub leading_padding: u32,
    /// Empty cells after `end`, up to [`GRID_COLUMNS`].
    pub trailing_padding: u32,
}

impl MonthRow {
    pub fn len_days(&self) -> u32 {
        (self.end - self.start).num_days() as u32 + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.len_days() as usize)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Grid column (0-based, padding included) of `day`.
    pub fn column_of(&self, day: NaiveDate) -> Option<u32> {
        self.contains(day)
            .then(|| self.leading_padding + (day - self.start).num_days() as u32)
    }
}

/// Split `range` into month rows.
pub fn month_rows(range: &DateRange, week_start: WeekStartDay) -> Vec<MonthRow> {
    let mut rows = Vec::new();
    let mut cursor = range.start();

    while cursor <= range.end() {
        let end = last_day_of_month(cursor).min(range.end());
        let leading_padding = week_start.offset_of(cursor.weekday());
        let len = (end - cursor).num_days() as u32 + 1;
        rows.push(MonthRow {
            year: cursor.year(),
            month: cursor.month(),
            start: cursor,
            end,
            leading_padding,
            trailing_padding: GRID_COLUMNS.saturating_sub(leading_padding + len),
        });
        match end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    rows
}

/// Week of the year, where week 1 is the week that contains January 1.
///
/// A late-December week that already contains the next January 1 is week 1.
pub fn week_number(date: NaiveDate, week_start: WeekStartDay) -> u32 {
    let week_begin = start_of_week(date, week_start);
    // A week running past the last representable date also runs past year end.
    match week_begin.checked_add_signed(Duration::days(6)) {
        Some(week_end) if week_end.year() <= date.year() => {}
        _ => return 1,
    }
    let Some(jan1) = NaiveDate::from_ymd_opt(date.year(), 1, 1) else {
        return 1;
    };
    let first_week = start_of_week(jan1, week_start);
    ((week_begin - first_week).num_days() / 7) as u32 + 1
}

/// Whether `day` is the first column of a week.
pub fn is_week_start(day: NaiveDate, week_start: WeekStartDay) -> bool {
    day.weekday() == week_start.weekday()
}

fn start_of_week(date: NaiveDate, week_start: WeekStartDay) -> NaiveDate {
    date.checked_sub_signed(Duration::days(week_start.offset_of(date.weekday()) as i64))
        .unwrap_or(date)
}

fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    first_day_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}
