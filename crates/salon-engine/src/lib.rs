//! # salon-engine
//!
//! Deterministic availability resolution and booking rules for a salon calendar.
//!
//! Given the salon's weekly schedule, per-date overrides and the reservations
//! already taken, the engine decides which days clients may book and which time
//! slots are still free. It also owns the reservation lifecycle and the small
//! amount of dashboard logic: agenda ordering, the client directory and stock
//! alerts. Storage, identity and rendering belong to the caller; every function
//! here works on data that has already been fetched.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use salon_engine::{resolve_day_slots, AvailabilityRules, DaySlots, WeeklySchedule};
//!
//! let rules = AvailabilityRules::new(
//!     Some(WeeklySchedule::new([1, 2, 3, 4, 5], "09:00", "18:00")),
//!     Default::default(),
//! );
//! let tuesday = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
//! let slots = resolve_day_slots(tuesday, &rules, 120, &[], tuesday);
//! assert_eq!(slots.slots(), ["09:00", "11:00", "13:00", "15:00", "17:00"]);
//! assert!(matches!(slots, DaySlots::Available(_)));
//! ```
//!
//! ## Modules
//!
//! - [`schedule`] — Weekly schedule, date overrides, rules document
//! - [`resolver`] — Bookable days and free slots
//! - [`reservation`] — Reservation lifecycle and double-booking guard
//! - [`calendar`] — Displayed month and selection state
//! - [`clients`] — Client directory
//! - [`inventory`] — Low-stock alerts
//! - [`clock`] — `HH:MM` labels
//! - [`error`] — Error types

pub mod calendar;
pub mod clients;
pub mod clock;
pub mod error;
pub mod inventory;
pub mod reservation;
pub mod resolver;
pub mod schedule;

pub use calendar::{CalendarView, MonthGrid};
pub use clients::{client_count, client_directory, Client};
pub use error::SalonError;
pub use reservation::{booked_times, reserve_slot, Reservation, ReservationBook, ReservationStatus};
pub use resolver::{
    effective_hours, generate_slots, is_day_bookable, resolve_day_slots, resolve_month, slot_grid,
    DaySlots, ResolvedDay, TimeSlot,
};
pub use schedule::{AvailabilityRules, DateOverride, OpeningHours, OverrideMap, OverrideStatus, WeeklySchedule};
