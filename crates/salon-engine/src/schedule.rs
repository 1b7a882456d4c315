//! Availability rules: the recurring weekly schedule plus per-date overrides.
//!
//! Times stay as the raw strings received from the settings document and are
//! parsed only when hours are resolved. A malformed time therefore means "no
//! hours" for the affected days instead of rejecting the whole document.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::parse_clock;
use crate::error::Result;

/// Default open days and hours, applied to every date without an override.
///
/// Every field may be missing from the stored document. Missing times leave
/// the work days with no hours; missing or out-of-range weekdays open nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedule {
    /// Open weekdays, `0` = Sunday through `6` = Saturday.
    #[serde(default, deserialize_with = "lenient_work_days")]
    pub work_days: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl WeeklySchedule {
    pub fn new(work_days: impl IntoIterator<Item = u8>, start_time: &str, end_time: &str) -> Self {
        Self {
            work_days: work_days.into_iter().collect(),
            start_time: Some(start_time.to_string()),
            end_time: Some(end_time.to_string()),
        }
    }

    /// Whether `weekday` is one of the default open days.
    pub fn is_work_day(&self, weekday: Weekday) -> bool {
        let index = weekday.num_days_from_sunday();
        self.work_days.iter().any(|&d| u32::from(d) == index)
    }
}

/// Accepts `null` or any array, keeping only integer entries in `0..=6`.
fn lenient_work_days<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    let days = raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match entry.as_u64() {
            Some(day @ 0..=6) => u8::try_from(day).ok(),
            _ => {
                tracing::warn!(%entry, "ignoring invalid work day");
                None
            }
        })
        .collect();
    Ok(days)
}

/// Whether an override forces its date open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideStatus {
    Open,
    Closed,
}

/// A date-specific exception to the weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOverride {
    pub status: OverrideStatus,
    /// Custom opening time; empty or absent means "use the weekly hours".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl DateOverride {
    pub fn closed() -> Self {
        Self {
            status: OverrideStatus::Closed,
            start_time: None,
            end_time: None,
        }
    }

    pub fn open() -> Self {
        Self {
            status: OverrideStatus::Open,
            start_time: None,
            end_time: None,
        }
    }

    pub fn open_with_hours(start_time: &str, end_time: &str) -> Self {
        Self {
            status: OverrideStatus::Open,
            start_time: Some(start_time.to_string()),
            end_time: Some(end_time.to_string()),
        }
    }

    /// True when the override carries its own, non-blank start time.
    pub fn has_custom_hours(&self) -> bool {
        self.start_time
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}

/// Overrides keyed by calendar date. A map guarantees at most one per date.
pub type OverrideMap = BTreeMap<NaiveDate, DateOverride>;

/// The resolved opening window for one day, `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpeningHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl OpeningHours {
    /// Parse a pair of raw labels; `None` if either is missing or malformed.
    pub fn from_labels(start: Option<&str>, end: Option<&str>) -> Option<Self> {
        let parse = |label: Option<&str>| match label {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => match parse_clock(raw) {
                Ok(time) => Some(time),
                Err(err) => {
                    tracing::warn!(%err, "ignoring malformed opening time");
                    None
                }
            },
            None => None,
        };
        Some(Self {
            start: parse(start)?,
            end: parse(end)?,
        })
    }
}

/// Everything the resolver needs about the salon's calendar, as stored in the
/// `settings/availability` document and the overrides collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRules {
    /// Absent until an administrator saves the weekly hours.
    #[serde(default)]
    pub weekly_schedule: Option<WeeklySchedule>,
    #[serde(default)]
    pub overrides: OverrideMap,
}

impl AvailabilityRules {
    pub fn new(weekly_schedule: Option<WeeklySchedule>, overrides: OverrideMap) -> Self {
        Self {
            weekly_schedule,
            overrides,
        }
    }

    /// Parse a rules document from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Insert or replace the override for `date`, returning the previous one.
    pub fn set_override(&mut self, date: NaiveDate, value: DateOverride) -> Option<DateOverride> {
        self.overrides.insert(date, value)
    }

    pub fn clear_override(&mut self, date: NaiveDate) -> Option<DateOverride> {
        self.overrides.remove(&date)
    }

    pub fn override_for(&self, date: NaiveDate) -> Option<&DateOverride> {
        self.overrides.get(&date)
    }
}

/// Weekday index used by the stored schedule, `0` = Sunday.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}
