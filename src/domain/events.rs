use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::model::ReservationId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReservationEvent {
    Created {
        reservation_id: ReservationId,
        customer_id: String,
        start_time: DateTime<Utc>,
        occurred_at: DateTime<Utc>,
    },
    Confirmed {
        reservation_id: ReservationId,
        occurred_at: DateTime<Utc>,
    },
    TableAssigned {
        reservation_id: ReservationId,
        table_id: String,
        area: String,
        occurred_at: DateTime<Utc>,
    },
    CheckedIn {
        reservation_id: ReservationId,
        occurred_at: DateTime<Utc>,
    },
    Completed {
        reservation_id: ReservationId,
        occurred_at: DateTime<Utc>,
    },
    Cancelled {
        reservation_id: ReservationId,
        reason: String,
        occurred_at: DateTime<Utc>,
    },
}

impl ReservationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "reservation_created",
            Self::Confirmed { .. } => "reservation_confirmed",
            Self::TableAssigned { .. } => "table_assigned",
            Self::CheckedIn { .. } => "reservation_checked_in",
            Self::Completed { .. } => "reservation_completed",
            Self::Cancelled { .. } => "reservation_cancelled",
        }
    }

    pub fn reservation_id(&self) -> ReservationId {
        match self {
            Self::Created { reservation_id, .. }
            | Self::Confirmed { reservation_id, .. }
            | Self::TableAssigned { reservation_id, .. }
            | Self::CheckedIn { reservation_id, .. }
            | Self::Completed { reservation_id, .. }
            | Self::Cancelled { reservation_id, .. } => *reservation_id,
        }
    }
}
