//! Calendar arithmetic for the month and week views.
//!
//! Everything works on local calendar dates; there is no timezone
//! conversion. Weeks start on Sunday.

use chrono::{Datelike, Duration, Local, Months, NaiveDate};

use crate::models::DateKey;

/// Weekday headers in grid order.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn date_key(date: NaiveDate) -> DateKey {
    DateKey::from_date(date)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        // Only reachable at the very end of chrono's range, which is December.
        None => 31,
    }
}

/// Weekday of the first of the month, 0 = Sunday .. 6 = Saturday.
pub fn first_weekday_of_month(date: NaiveDate) -> u32 {
    first_of_month(date).weekday().num_days_from_sunday()
}

/// Cells of the month view: leading `None`s up to the first weekday, then
/// one entry per day. The last week is not padded.
pub fn month_grid(date: NaiveDate) -> Vec<Option<NaiveDate>> {
    let first = first_of_month(date);
    let leading = first_weekday_of_month(date) as usize;
    let days = days_in_month(date);

    let mut cells = Vec::with_capacity(leading + days as usize);
    cells.resize(leading, None);
    cells.extend((0..days).map(|offset| Some(first + Duration::days(offset as i64))));
    cells
}

/// The Sunday-start week containing `date`.
pub fn week_dates(date: NaiveDate) -> [NaiveDate; 7] {
    let start = date - Duration::days(date.weekday().num_days_from_sunday() as i64);
    std::array::from_fn(|i| start + Duration::days(i as i64))
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    date_key(a) == date_key(b)
}

pub fn is_today(date: NaiveDate) -> bool {
    is_same_day(date, Local::now().date_naive())
}

pub fn is_selected_date(date: NaiveDate, selected: NaiveDate) -> bool {
    is_same_day(date, selected)
}

/// First day of the month `delta` months away from `date`'s month.
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let first = first_of_month(date);
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    };
    shifted.unwrap_or(first)
}

/// `date` moved by `delta` whole weeks.
pub fn shift_week(date: NaiveDate, delta: i64) -> NaiveDate {
    date + Duration::weeks(delta)
}

/// Heading of the month view, e.g. "April 2026".
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
