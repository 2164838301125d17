//! Reservation aggregate and its value objects.
//!
//! Status only moves through the lifecycle methods on [`Reservation`]; there is
//! no setter. Every successful mutation appends exactly one [`HistoryRecord`]
//! and a failed guard leaves the reservation untouched.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::events::ReservationEvent;
use crate::utils::error::{ReservationError, Result};

pub const DEFAULT_DURATION_MINUTES: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(Uuid);

impl ReservationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReservationId {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| ReservationError::validation("reservation_id", e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
    /// Terminal state with no inbound transition yet.
    NoShow,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 6] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::CheckedIn,
        ReservationStatus::Completed,
        ReservationStatus::Cancelled,
        ReservationStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::CheckedIn => "CHECKED_IN",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                ReservationError::validation("status", format!("unknown status '{}'", s))
            })
    }
}

/// Snapshot of the booker's contact details at booking time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredReservationTime")]
pub struct ReservationTime {
    start_time: DateTime<Utc>,
    duration_minutes: u32,
}

#[derive(Deserialize)]
struct StoredReservationTime {
    start_time: DateTime<Utc>,
    duration_minutes: u32,
}

impl TryFrom<StoredReservationTime> for ReservationTime {
    type Error = ReservationError;

    fn try_from(stored: StoredReservationTime) -> Result<Self> {
        Self::new(stored.start_time, stored.duration_minutes)
    }
}

impl ReservationTime {
    pub fn new(start_time: DateTime<Utc>, duration_minutes: u32) -> Result<Self> {
        if duration_minutes == 0 {
            return Err(ReservationError::validation(
                "duration_minutes",
                "must be greater than zero",
            ));
        }
        // end_time() relies on this never overflowing
        if start_time
            .checked_add_signed(Duration::minutes(i64::from(duration_minutes)))
            .is_none()
        {
            return Err(ReservationError::validation(
                "duration_minutes",
                "end time is out of range",
            ));
        }
        Ok(Self {
            start_time,
            duration_minutes,
        })
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Always derived from start and duration.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(i64::from(self.duration_minutes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAssignment {
    pub table_id: String,
    pub capacity: u32,
    pub area: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetail {
    /// Minor currency units.
    pub amount: i64,
    #[serde(default)]
    pub status: PaymentStatus,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationReason {
    pub reason_code: String,
    pub description: String,
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason_code, self.description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryAction {
    Created,
    Confirmed,
    TableAssigned,
    CheckedIn,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Utc>,
    pub action: HistoryAction,
    pub note: String,
}

/// Input for a new booking.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub customer_id: String,
    pub contact_info: ContactInfo,
    pub start_time: DateTime<Utc>,
    /// Falls back to the policy default when absent.
    pub duration_minutes: Option<u32>,
    pub deposit: Option<PaymentDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    reservation_id: ReservationId,
    customer_id: String,
    contact_info: ContactInfo,
    reservation_time: ReservationTime,
    status: ReservationStatus,
    table_assignment: Option<TableAssignment>,
    payment_detail: Option<PaymentDetail>,
    history: Vec<HistoryRecord>,
    #[serde(skip)]
    pending_events: Vec<ReservationEvent>,
}

impl Reservation {
    pub fn new(
        customer_id: String,
        contact_info: ContactInfo,
        reservation_time: ReservationTime,
        payment_detail: Option<PaymentDetail>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut reservation = Self {
            reservation_id: ReservationId::new(),
            customer_id,
            contact_info,
            reservation_time,
            status: ReservationStatus::Pending,
            table_assignment: None,
            payment_detail,
            history: Vec::new(),
            pending_events: Vec::new(),
        };
        reservation.record(now, HistoryAction::Created, "Reservation created".to_string());
        reservation.pending_events.push(ReservationEvent::Created {
            reservation_id: reservation.reservation_id,
            customer_id: reservation.customer_id.clone(),
            start_time: reservation.reservation_time.start_time(),
            occurred_at: now,
        });
        reservation
    }

    pub fn id(&self) -> ReservationId {
        self.reservation_id
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn contact_info(&self) -> &ContactInfo {
        &self.contact_info
    }

    pub fn reservation_time(&self) -> &ReservationTime {
        &self.reservation_time
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn table_assignment(&self) -> Option<&TableAssignment> {
        self.table_assignment.as_ref()
    }

    pub fn payment_detail(&self) -> Option<&PaymentDetail> {
        self.payment_detail.as_ref()
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    pub fn confirm(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.guard_not(
            ReservationStatus::Cancelled,
            "cannot confirm a cancelled reservation",
        )?;

        self.status = ReservationStatus::Confirmed;
        self.record(
            now,
            HistoryAction::Confirmed,
            "Reservation confirmed by system/staff".to_string(),
        );
        self.pending_events.push(ReservationEvent::Confirmed {
            reservation_id: self.reservation_id,
            occurred_at: now,
        });
        Ok(())
    }

    /// Attaches (or replaces) the table. Status is left as is.
    pub fn assign_table(&mut self, assignment: TableAssignment, now: DateTime<Utc>) -> Result<()> {
        self.guard_not(
            ReservationStatus::Cancelled,
            "cannot assign table to a cancelled reservation",
        )?;

        let note = format!(
            "Assigned to Table ID {} ({})",
            assignment.table_id, assignment.area
        );
        self.pending_events.push(ReservationEvent::TableAssigned {
            reservation_id: self.reservation_id,
            table_id: assignment.table_id.clone(),
            area: assignment.area.clone(),
            occurred_at: now,
        });
        self.table_assignment = Some(assignment);
        self.record(now, HistoryAction::TableAssigned, note);
        Ok(())
    }

    pub fn check_in(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.guard_exactly(
            ReservationStatus::Confirmed,
            "reservation must be CONFIRMED to check in",
        )?;

        self.status = ReservationStatus::CheckedIn;
        self.record(now, HistoryAction::CheckedIn, "Customer checked in".to_string());
        self.pending_events.push(ReservationEvent::CheckedIn {
            reservation_id: self.reservation_id,
            occurred_at: now,
        });
        Ok(())
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.guard_exactly(
            ReservationStatus::CheckedIn,
            "customer must be CHECKED_IN to complete",
        )?;

        self.status = ReservationStatus::Completed;
        self.record(now, HistoryAction::Completed, "Reservation completed".to_string());
        self.pending_events.push(ReservationEvent::Completed {
            reservation_id: self.reservation_id,
            occurred_at: now,
        });
        Ok(())
    }

    /// The reason is flattened into the history note, not kept as state.
    pub fn cancel(&mut self, reason: &CancellationReason, now: DateTime<Utc>) -> Result<()> {
        self.guard_not(
            ReservationStatus::Completed,
            "cannot cancel a completed reservation",
        )?;

        self.status = ReservationStatus::Cancelled;
        self.record(now, HistoryAction::Cancelled, reason.to_string());
        self.pending_events.push(ReservationEvent::Cancelled {
            reservation_id: self.reservation_id,
            reason: reason.to_string(),
            occurred_at: now,
        });
        Ok(())
    }

    /// Hands over the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<ReservationEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn guard_not(&self, blocked: ReservationStatus, message: &'static str) -> Result<()> {
        if self.status == blocked {
            return Err(ReservationError::InvalidTransition {
                status: self.status,
                message,
            });
        }
        Ok(())
    }

    fn guard_exactly(&self, required: ReservationStatus, message: &'static str) -> Result<()> {
        if self.status != required {
            return Err(ReservationError::InvalidTransition {
                status: self.status,
                message,
            });
        }
        Ok(())
    }

    fn record(&mut self, timestamp: DateTime<Utc>, action: HistoryAction, note: String) {
        self.history.push(HistoryRecord {
            timestamp,
            action,
            note,
        });
    }
}
