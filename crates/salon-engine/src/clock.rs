//! `HH:MM` time labels.
//!
//! Slots, schedules and reservations all carry wall-clock times as short
//! strings. Parsing is strict enough to reject garbage but tolerates a
//! single-digit hour (`"9:00"`), which is what hand-edited documents contain.

use chrono::{NaiveTime, Timelike};

use crate::error::{Result, SalonError};

/// Parse an `HH:MM` label into a [`NaiveTime`].
///
/// # Errors
/// Returns `SalonError::InvalidTime` when the label is empty, has the wrong
/// shape, or names a time outside `00:00`..=`23:59`.
pub fn parse_clock(label: &str) -> Result<NaiveTime> {
    let trimmed = label.trim();
    let invalid = || SalonError::InvalidTime(label.to_string());

    let (hours, minutes) = trimmed.split_once(':').ok_or_else(invalid)?;
    if hours.is_empty()
        || hours.len() > 2
        || minutes.len() != 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let hour: u32 = hours.parse().map_err(|_| invalid())?;
    let minute: u32 = minutes.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Render a time as a zero-padded `HH:MM` label.
pub fn format_clock(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Minutes elapsed since midnight.
pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Inverse of [`minutes_of_day`]; `None` past `23:59`.
pub fn from_minutes_of_day(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

