//! Tests for calendar navigation, month grids and selection state.

use chrono::NaiveDate;
use salon_engine::calendar::CalendarView;
use salon_engine::schedule::{AvailabilityRules, DateOverride, OverrideMap, WeeklySchedule};
use salon_engine::SalonError;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn rules() -> AvailabilityRules {
    let mut rules = AvailabilityRules::new(
        Some(WeeklySchedule::new([1, 2, 3, 4, 5], "09:00", "18:00")),
        OverrideMap::new(),
    );
    rules.set_override(date("2026-10-20"), DateOverride::closed());
    rules
}

const TODAY: &str = "2026-10-19";

#[test]
fn view_starts_on_month_of_given_date() {
    let view = CalendarView::containing(date("2026-10-19"));
    assert_eq!((view.year(), view.month()), (2026, 10));
    assert_eq!(view.selected_date(), None);
    assert_eq!(view.selected_time(), None);
}

#[test]
fn new_rejects_invalid_month() {
    assert!(matches!(
        CalendarView::new(2026, 0),
        Err(SalonError::InvalidMonth { year: 2026, month: 0 })
    ));
    assert!(CalendarView::new(2026, 12).is_ok());
}

#[test]
fn change_month_rolls_over_year_boundaries() {
    let mut view = CalendarView::new(2026, 12).unwrap();
    view.change_month(1).unwrap();
    assert_eq!((view.year(), view.month()), (2027, 1));
    view.change_month(-2).unwrap();
    assert_eq!((view.year(), view.month()), (2026, 11));
    view.change_month(14).unwrap();
    assert_eq!((view.year(), view.month()), (2028, 1));
    view.change_month(0).unwrap();
    assert_eq!((view.year(), view.month()), (2028, 1));
}

#[test]
fn change_month_clears_selection() {
    let mut view = CalendarView::containing(date(TODAY));
    view.select_date(date("2026-10-21"), &rules(), date(TODAY)).unwrap();
    view.change_month(1).unwrap();
    assert_eq!(view.selected_date(), None);
}

#[test]
fn change_month_out_of_range_leaves_view_untouched() {
    let mut view = CalendarView::containing(NaiveDate::MAX);
    let before = view.clone();
    assert!(view.change_month(1).is_err());
    assert_eq!(view, before);
}

#[test]
fn grid_has_leading_blanks_for_sunday_first_week() {
    // October 2026 starts on a Thursday.
    let grid = CalendarView::new(2026, 10).unwrap().grid(&rules(), date(TODAY));
    assert_eq!(grid.leading_blanks, 4);
    assert_eq!(grid.days.len(), 31);

    // November 2026 starts on a Sunday.
    let grid = CalendarView::new(2026, 11).unwrap().grid(&rules(), date(TODAY));
    assert_eq!(grid.leading_blanks, 0);
    assert_eq!(grid.days.len(), 30);
}

#[test]
fn grid_marks_bookable_days() {
    let grid = CalendarView::new(2026, 10).unwrap().grid(&rules(), date(TODAY));
    let bookable: Vec<NaiveDate> = grid.bookable_days().collect();
    // Remaining weekdays from the 19th, minus the closed 20th.
    let expected: Vec<NaiveDate> = ["19", "21", "22", "23", "26", "27", "28", "29", "30"]
        .iter()
        .map(|d| date(&format!("2026-10-{d}")))
        .collect();
    assert_eq!(bookable, expected);
}

#[test]
fn select_date_refuses_closed_and_past_days() {
    let mut view = CalendarView::containing(date(TODAY));
    assert!(matches!(
        view.select_date(date("2026-10-20"), &rules(), date(TODAY)),
        Err(SalonError::DayNotBookable(_))
    ));
    assert!(view.select_date(date("2026-10-16"), &rules(), date(TODAY)).is_err());
    assert!(view.select_date(date("2026-10-24"), &rules(), date(TODAY)).is_err());
    assert_eq!(view.selected_date(), None);
}

#[test]
fn select_date_moves_view_to_that_month() {
    let mut view = CalendarView::containing(date(TODAY));
    view.select_date(date("2026-11-03"), &rules(), date(TODAY)).unwrap();
    assert_eq!((view.year(), view.month()), (2026, 11));
    assert_eq!(view.selected_date(), Some(date("2026-11-03")));
}

#[test]
fn select_time_requires_a_selected_date() {
    let mut view = CalendarView::containing(date(TODAY));
    let offered = vec!["09:00".to_string()];
    assert!(matches!(
        view.select_time("09:00", &offered),
        Err(SalonError::NoDateSelected)
    ));
}

#[test]
fn select_time_accepts_only_offered_labels() {
    let mut view = CalendarView::containing(date(TODAY));
    view.select_date(date("2026-10-21"), &rules(), date(TODAY)).unwrap();
    let offered = vec!["09:00".to_string(), "11:00".to_string()];

    view.select_time("9:00", &offered).unwrap();
    assert_eq!(view.selected_time(), Some("09:00"));

    assert!(matches!(
        view.select_time("10:00", &offered),
        Err(SalonError::SlotTaken { .. })
    ));
    assert_eq!(view.selected_time(), Some("09:00"));
}

#[test]
fn selecting_another_date_clears_time() {
    let mut view = CalendarView::containing(date(TODAY));
    view.select_date(date("2026-10-21"), &rules(), date(TODAY)).unwrap();
    view.select_time("09:00", &["09:00".to_string()]).unwrap();
    view.select_date(date("2026-10-22"), &rules(), date(TODAY)).unwrap();
    assert_eq!(view.selected_time(), None);
}
