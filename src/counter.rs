use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use tracing::error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a strict `YYYY-MM-DD` date, the same shape the browser script accepts.
///
/// chrono alone would also take `2024-1-1` or `+2024-01-01`, which the page
/// rejects, so the shape is checked first.
pub fn parse_start_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let bytes = value.as_bytes();
    let iso_shape = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, byte)| match i {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !iso_shape {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Whole days elapsed from `start_date` to the calendar date of `now`.
///
/// Both ends are reduced to calendar dates in `now`'s zone before subtracting,
/// so a short or long day around a DST switch never changes the count.
/// Future or unparseable start dates yield 0.
pub fn days_between<Tz: TimeZone>(start_date: &str, now: &DateTime<Tz>) -> u64 {
    match parse_start_date(start_date) {
        Some(start) => days_between_dates(start, now.date_naive()),
        None => {
            error!("invalid start date: {start_date:?}");
            0
        }
    }
}

pub fn days_between_dates(start: NaiveDate, today: NaiveDate) -> u64 {
    u64::try_from((today - start).num_days()).unwrap_or(0)
}

/// Time left until the next calendar day starts in `now`'s zone.
pub fn until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let tomorrow = now.date_naive().succ_opt().unwrap_or(NaiveDate::MAX);
    let midnight = tomorrow.and_hms_opt(0, 0, 0).unwrap_or_default();
    let remaining = midnight - now.naive_local();
    if remaining <= Duration::zero() {
        Duration::days(1)
    } else {
        remaining
    }
}
