//! Availability resolution: which days can be booked and which times are free.
//!
//! Merges the weekly schedule with date overrides, excludes past dates, then
//! walks the effective opening hours in fixed steps and drops the times already
//! held by a non-canceled reservation.
//!
//! Everything here is a pure function of its arguments. Bad configuration never
//! surfaces as an error: a missing schedule opens no days and malformed hours
//! produce no slots.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::clock::{format_clock, from_minutes_of_day, minutes_of_day, parse_clock};
use crate::error::{Result, SalonError};
use crate::reservation::{booked_times, Reservation};
use crate::schedule::{AvailabilityRules, OpeningHours, OverrideMap, OverrideStatus, WeeklySchedule};

/// One calendar cell: a date and whether clients may book it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedDay {
    pub date: NaiveDate,
    pub bookable: bool,
}

/// A generated time label and whether it is still free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub time: String,
    pub available: bool,
}

/// Outcome of resolving the slot picker for a selected date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "slots", rename_all = "kebab-case")]
pub enum DaySlots {
    /// The day itself is not bookable.
    Closed,
    /// Open day, but no usable hours are configured for it.
    NoHours,
    /// Every generated slot is already reserved.
    FullyBooked,
    /// Free time labels in ascending order.
    Available(Vec<String>),
}

impl DaySlots {
    /// The free labels, empty for every variant but `Available`.
    pub fn slots(&self) -> &[String] {
        match self {
            DaySlots::Available(slots) => slots,
            _ => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DaySlots::Available(_))
    }

    /// The serialized `status` tag.
    pub fn status(&self) -> &'static str {
        match self {
            DaySlots::Closed => "closed",
            DaySlots::NoHours => "no-hours",
            DaySlots::FullyBooked => "fully-booked",
            DaySlots::Available(_) => "available",
        }
    }
}

/// Decide whether `date` can be booked.
///
/// Precedence, first match wins:
/// 1. dates before `today` are never bookable;
/// 2. an override for the date decides (`closed` => no, `open` => yes);
/// 3. otherwise the date is bookable iff its weekday is a weekly work day.
///
/// With no weekly schedule configured, only `open` overrides make a day bookable.
pub fn is_day_bookable(
    date: NaiveDate,
    weekly: Option<&WeeklySchedule>,
    overrides: &OverrideMap,
    today: NaiveDate,
) -> bool {
    if date < today {
        return false;
    }

    let base_open = weekly.is_some_and(|schedule| schedule.is_work_day(date.weekday()));

    match overrides.get(&date) {
        Some(day_override) => {
            tracing::debug!(%date, status = ?day_override.status, base_open, "override applied");
            day_override.status == OverrideStatus::Open
        }
        None => base_open,
    }
}

/// Resolve the opening hours that apply on `date`.
///
/// An override that carries its own start time supplies both bounds; otherwise
/// the weekly schedule does. Returns `None` when the chosen source is missing
/// or either of its times is blank or malformed: the caller must treat the day
/// as having zero slots.
pub fn effective_hours(
    date: NaiveDate,
    weekly: Option<&WeeklySchedule>,
    overrides: &OverrideMap,
) -> Option<OpeningHours> {
    match overrides.get(&date) {
        Some(day_override) if day_override.has_custom_hours() => OpeningHours::from_labels(
            day_override.start_time.as_deref(),
            day_override.end_time.as_deref(),
        ),
        _ => weekly.and_then(|schedule| {
            OpeningHours::from_labels(
                schedule.start_time.as_deref(),
                schedule.end_time.as_deref(),
            )
        }),
    }
}

/// Enumerate every slot start in `[start, end)` spaced `step_minutes` apart,
/// flagging the ones present in `booked_times`.
///
/// The last slot is the last start strictly before `end`; slots are never
/// clipped. A zero step or an empty window yields no slots. Booked labels are
/// compared as times, so `"9:00"` blocks `"09:00"`; unparseable entries are
/// ignored.
pub fn slot_grid<S: AsRef<str>>(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    step_minutes: u32,
    booked_times: &[S],
) -> Vec<TimeSlot> {
    if step_minutes == 0 {
        tracing::warn!(%date, "slot step of zero minutes, no slots generated");
        return Vec::new();
    }

    let booked: BTreeSet<NaiveTime> = booked_times
        .iter()
        .filter_map(|label| parse_clock(label.as_ref()).ok())
        .collect();

    let end_minutes = minutes_of_day(end);
    let mut cursor = minutes_of_day(start);
    let mut grid = Vec::new();

    while cursor < end_minutes {
        let Some(time) = from_minutes_of_day(cursor) else {
            break;
        };
        grid.push(TimeSlot {
            time: format_clock(time),
            available: !booked.contains(&time),
        });
        cursor = cursor.saturating_add(step_minutes);
    }

    grid
}

/// The free slot labels for `date`, in ascending order.
///
/// An empty result means the day is fully booked or has no usable window.
pub fn generate_slots<S: AsRef<str>>(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    step_minutes: u32,
    booked_times: &[S],
) -> Vec<String> {
    slot_grid(date, start, end, step_minutes, booked_times)
        .into_iter()
        .filter(|slot| slot.available)
        .map(|slot| slot.time)
        .collect()
}

/// Resolve every day of a calendar month, in date order.
///
/// # Errors
/// Returns `SalonError::InvalidMonth` if `month` is not in `1..=12` or the
/// year is outside chrono's range.
pub fn resolve_month(
    year: i32,
    month: u32,
    weekly: Option<&WeeklySchedule>,
    overrides: &OverrideMap,
    today: NaiveDate,
) -> Result<Vec<ResolvedDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(SalonError::InvalidMonth { year, month })?;
    Ok(resolve_days_of_month(first, weekly, overrides, today))
}

/// Same as [`resolve_month`] for a month already known to be valid.
pub(crate) fn resolve_days_of_month(
    first: NaiveDate,
    weekly: Option<&WeeklySchedule>,
    overrides: &OverrideMap,
    today: NaiveDate,
) -> Vec<ResolvedDay> {
    first
        .iter_days()
        .take_while(|date| date.month() == first.month())
        .map(|date| ResolvedDay {
            date,
            bookable: is_day_bookable(date, weekly, overrides, today),
        })
        .collect()
}

/// Build the slot picker for a selected date from the rules and the fetched
/// reservations.
///
/// Only reservations on `date` that are not canceled block a slot.
pub fn resolve_day_slots(
    date: NaiveDate,
    rules: &AvailabilityRules,
    step_minutes: u32,
    reservations: &[Reservation],
    today: NaiveDate,
) -> DaySlots {
    let weekly = rules.weekly_schedule.as_ref();

    if !is_day_bookable(date, weekly, &rules.overrides, today) {
        return DaySlots::Closed;
    }

    let Some(hours) = effective_hours(date, weekly, &rules.overrides) else {
        return DaySlots::NoHours;
    };

    let booked = booked_times(reservations, date);
    let grid = slot_grid(date, hours.start, hours.end, step_minutes, &booked);
    if grid.is_empty() {
        return DaySlots::NoHours;
    }

    let free: Vec<String> = grid
        .into_iter()
        .filter(|slot| slot.available)
        .map(|slot| slot.time)
        .collect();

    if free.is_empty() {
        DaySlots::FullyBooked
    } else {
        DaySlots::Available(free)
    }
}
