//! Error types for salon-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::reservation::ReservationStatus;

#[derive(Error, Debug)]
pub enum SalonError {
    #[error("Invalid time label: {0:?} (expected HH:MM)")]
    InvalidTime(String),

    #[error("Invalid date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    /// The input document was not valid JSON for the expected shape.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Cannot move reservation from {from} to {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    /// Completion requires a positive, finite price.
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    #[error("Slot {date} {time} is already taken")]
    SlotTaken { date: NaiveDate, time: String },

    #[error("Day {0} is not open for booking")]
    DayNotBookable(NaiveDate),

    #[error("Unknown reservation: {0}")]
    UnknownReservation(String),

    #[error("Reservation {0} already exists")]
    DuplicateReservation(String),

    #[error("No date selected")]
    NoDateSelected,
}

pub type Result<T> = std::result::Result<T, SalonError>;
