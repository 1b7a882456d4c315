//! Calendar view state owned by the caller.
//!
//! Holds the displayed month and the client's current date/time selection as an
//! explicit value, so rendering and navigation are plain functions of it.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::clock::{format_clock, parse_clock};
use crate::error::{Result, SalonError};
use crate::resolver::{is_day_bookable, resolve_days_of_month, ResolvedDay};
use crate::schedule::{weekday_index, AvailabilityRules};

/// A rendered month: blank cells before day 1, then one cell per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st in a Sunday-first week row.
    pub leading_blanks: u32,
    pub days: Vec<ResolvedDay>,
}

impl MonthGrid {
    pub fn bookable_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().filter(|d| d.bookable).map(|d| d.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    /// First day of the displayed month.
    first_day: NaiveDate,
    selected_date: Option<NaiveDate>,
    selected_time: Option<String>,
}

impl CalendarView {
    /// A view showing the month that contains `date`, nothing selected.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
            selected_date: None,
            selected_time: None,
        }
    }

    pub fn new(year: i32, month: u32) -> Result<Self> {
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(SalonError::InvalidMonth { year, month })?;
        Ok(Self::containing(first_day))
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.selected_time.as_deref()
    }

    /// Move the displayed month by `delta` (negative goes back), clearing the
    /// selection.
    ///
    /// # Errors
    /// `InvalidMonth` if the target falls outside chrono's date range; the view
    /// is unchanged in that case.
    pub fn change_month(&mut self, delta: i32) -> Result<()> {
        let months = Months::new(delta.unsigned_abs());
        let moved = if delta >= 0 {
            self.first_day.checked_add_months(months)
        } else {
            self.first_day.checked_sub_months(months)
        };
        let invalid = SalonError::InvalidMonth {
            year: self.year(),
            month: self.month(),
        };
        self.first_day = moved.ok_or(invalid)?;
        self.clear_selection();
        Ok(())
    }

    /// Resolve the displayed month against `rules`.
    pub fn grid(&self, rules: &AvailabilityRules, today: NaiveDate) -> MonthGrid {
        MonthGrid {
            year: self.year(),
            month: self.month(),
            leading_blanks: weekday_index(self.first_day),
            days: resolve_days_of_month(
                self.first_day,
                rules.weekly_schedule.as_ref(),
                &rules.overrides,
                today,
            ),
        }
    }

    /// Select a bookable date, jumping to its month and dropping any selected
    /// time.
    pub fn select_date(
        &mut self,
        date: NaiveDate,
        rules: &AvailabilityRules,
        today: NaiveDate,
    ) -> Result<()> {
        if !is_day_bookable(date, rules.weekly_schedule.as_ref(), &rules.overrides, today) {
            return Err(SalonError::DayNotBookable(date));
        }
        self.first_day = date.with_day(1).unwrap_or(date);
        self.selected_date = Some(date);
        self.selected_time = None;
        Ok(())
    }

    /// Select one of the `offered` slot labels for the selected date.
    pub fn select_time(&mut self, label: &str, offered: &[String]) -> Result<()> {
        let date = self.selected_date.ok_or(SalonError::NoDateSelected)?;
        let wanted = parse_clock(label)?;
        let is_offered = offered
            .iter()
            .any(|slot| parse_clock(slot).is_ok_and(|t| t == wanted));
        if !is_offered {
            return Err(SalonError::SlotTaken {
                date,
                time: format_clock(wanted),
            });
        }
        self.selected_time = Some(format_clock(wanted));
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_date = None;
        self.selected_time = None;
    }
}
