//! Reservations, their lifecycle, and the double-booking guard.
//!
//! A reservation starts `pending`. An administrator either completes it
//! (charging a price) or cancels it, and both outcomes are final. Pending and
//! completed reservations hold their (date, time) pair; canceled ones free it.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{format_clock, parse_clock};
use crate::error::{Result, SalonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Completed,
    Canceled,
}

impl ReservationStatus {
    /// Whether a reservation in this state blocks its slot.
    pub fn occupies_slot(self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Completed)
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, ReservationStatus::Pending)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Canceled => "canceled",
        };
        f.write_str(label)
    }
}

/// A client's claim on one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub date: NaiveDate,
    /// Slot label, `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Account of the client who booked, joined against the user directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, alias = "clientName", skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    /// Amount charged, set on completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// A new pending reservation with no client details.
    pub fn new(id: impl Into<String>, date: NaiveDate, time: &str) -> Self {
        Self {
            id: id.into(),
            date,
            time: time.to_string(),
            status: ReservationStatus::Pending,
            service: None,
            user_id: None,
            user_name: None,
            phone: None,
            allergies: None,
            price: None,
            completed_at: None,
            canceled_at: None,
        }
    }

    pub fn occupies_slot(&self) -> bool {
        self.status.occupies_slot()
    }

    /// The parsed slot time, if the stored label is well formed.
    pub fn start_time(&self) -> Option<NaiveTime> {
        parse_clock(&self.time).ok()
    }

    /// Whether this reservation currently blocks `date` at `time`.
    pub fn holds(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.occupies_slot() && self.date == date && self.start_time() == Some(time)
    }

    /// Mark a pending reservation as served.
    ///
    /// # Errors
    /// `InvalidTransition` unless the reservation is pending; `InvalidPrice`
    /// unless `price` is finite and greater than zero. The reservation is left
    /// untouched on error.
    pub fn complete(&mut self, price: f64, at: DateTime<Utc>) -> Result<()> {
        self.ensure_pending(ReservationStatus::Completed)?;
        if !price.is_finite() || price <= 0.0 {
            return Err(SalonError::InvalidPrice(price));
        }
        self.status = ReservationStatus::Completed;
        self.price = Some(price);
        self.completed_at = Some(at);
        Ok(())
    }

    /// Cancel a pending reservation, freeing its slot.
    pub fn cancel(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.ensure_pending(ReservationStatus::Canceled)?;
        self.status = ReservationStatus::Canceled;
        self.canceled_at = Some(at);
        Ok(())
    }

    fn ensure_pending(&self, to: ReservationStatus) -> Result<()> {
        if self.status == ReservationStatus::Pending {
            Ok(())
        } else {
            Err(SalonError::InvalidTransition {
                from: self.status,
                to,
            })
        }
    }
}

/// Labels held by non-canceled reservations on `date`, sorted and de-duplicated.
///
/// Well-formed labels are normalized to `HH:MM`; malformed ones are passed
/// through as-is so they remain visible to the caller.
pub fn booked_times(reservations: &[Reservation], date: NaiveDate) -> Vec<String> {
    reservations
        .iter()
        .filter(|r| r.date == date && r.occupies_slot())
        .map(|r| match r.start_time() {
            Some(time) => format_clock(time),
            None => r.time.clone(),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Check that nobody else holds `date` at `time`.
///
/// This is a read-side check only: against a remote store the answer can be
/// stale by the time the reservation is written.
///
/// # Errors
/// `InvalidTime` for a malformed label, `SlotTaken` if a pending or completed
/// reservation already occupies the pair.
pub fn reserve_slot(date: NaiveDate, time: &str, existing: &[Reservation]) -> Result<()> {
    let slot = parse_clock(time)?;
    if existing.iter().any(|r| r.holds(date, slot)) {
        tracing::warn!(%date, time = %format_clock(slot), "refusing double booking");
        return Err(SalonError::SlotTaken {
            date,
            time: format_clock(slot),
        });
    }
    Ok(())
}

/// An owned collection of reservations with an atomic check-and-book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationBook {
    reservations: Vec<Reservation>,
}

impl ReservationBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reservations(reservations: Vec<Reservation>) -> Self {
        Self { reservations }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    pub fn as_slice(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn get(&self, id: &str) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }

    /// Add a pending reservation if its slot is still free.
    ///
    /// The check and the insert happen under one `&mut self`, so two bookings
    /// for the same slot cannot both succeed. The stored time label is
    /// normalized to `HH:MM`.
    pub fn book(&mut self, mut reservation: Reservation) -> Result<&Reservation> {
        if self.get(&reservation.id).is_some() {
            return Err(SalonError::DuplicateReservation(reservation.id));
        }
        reserve_slot(reservation.date, &reservation.time, &self.reservations)?;

        let slot = parse_clock(&reservation.time)?;
        reservation.time = format_clock(slot);
        reservation.status = ReservationStatus::Pending;
        reservation.price = None;
        reservation.completed_at = None;
        reservation.canceled_at = None;

        tracing::debug!(id = %reservation.id, date = %reservation.date, time = %reservation.time, "booked");
        self.reservations.push(reservation);
        let last = self.reservations.len() - 1;
        Ok(&self.reservations[last])
    }

    pub fn complete(&mut self, id: &str, price: f64, at: DateTime<Utc>) -> Result<&Reservation> {
        let reservation = self.get_mut(id)?;
        reservation.complete(price, at)?;
        Ok(reservation)
    }

    pub fn cancel(&mut self, id: &str, at: DateTime<Utc>) -> Result<&Reservation> {
        let reservation = self.get_mut(id)?;
        reservation.cancel(at)?;
        Ok(reservation)
    }

    pub fn booked_times(&self, date: NaiveDate) -> Vec<String> {
        booked_times(&self.reservations, date)
    }

    /// Pending reservations ordered by date, then slot time.
    pub fn pending_agenda(&self) -> Vec<&Reservation> {
        pending_agenda(&self.reservations)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Reservation> {
        self.reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| SalonError::UnknownReservation(id.to_string()))
    }
}

/// Pending reservations ordered by date, then slot time.
///
/// Reservations with a malformed time sort after the well-formed ones of the
/// same day.
pub fn pending_agenda(reservations: &[Reservation]) -> Vec<&Reservation> {
    let mut pending: Vec<&Reservation> = reservations
        .iter()
        .filter(|r| r.status == ReservationStatus::Pending)
        .collect();
    pending.sort_by(|a, b| {
        let key = |r: &Reservation| (r.date, r.start_time().is_none(), r.start_time(), r.id.clone());
        key(a).cmp(&key(b))
    });
    pending
}
