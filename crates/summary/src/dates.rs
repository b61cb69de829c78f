//! Calendar arithmetic for contract runtimes.

use chrono::{Days, Months, NaiveDate};

/// Format a date as `DD.MM.YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Last day of a contract that starts on `start` and runs `months` months.
///
/// The day of month is clamped to the end of the target month before the
/// final day is subtracted, so Jan 31 + 1 month lands on Feb 28/29.
pub fn end_date(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start
        .checked_add_months(Months::new(months))?
        .checked_sub_days(Days::new(1))
}

/// Whole days between the start and end dates.
pub fn runtime_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}
