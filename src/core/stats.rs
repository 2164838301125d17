use serde::Serialize;

use crate::domain::model::{Reservation, ReservationStatus};
use crate::utils::error::{ReservationError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReservationStats {
    pub total: usize,
    pub pending_count: usize,
    pub confirmed_count: usize,
    pub checked_in_count: usize,
    pub completed_count: usize,
    pub cancelled_count: usize,
    pub no_show_count: usize,
    /// Sum of recorded payment amounts, in minor units.
    pub total_payment_amount: i64,
}

impl ReservationStats {
    /// Fails only when the payment total no longer fits in an `i64`.
    pub fn from_reservations(reservations: &[Reservation]) -> Result<Self> {
        reservations.iter().try_fold(Self::default(), |mut stats, r| {
            stats.total += 1;
            match r.status() {
                ReservationStatus::Pending => stats.pending_count += 1,
                ReservationStatus::Confirmed => stats.confirmed_count += 1,
                ReservationStatus::CheckedIn => stats.checked_in_count += 1,
                ReservationStatus::Completed => stats.completed_count += 1,
                ReservationStatus::Cancelled => stats.cancelled_count += 1,
                ReservationStatus::NoShow => stats.no_show_count += 1,
            }
            if let Some(payment) = r.payment_detail() {
                stats.total_payment_amount = stats
                    .total_payment_amount
                    .checked_add(payment.amount)
                    .ok_or_else(|| ReservationError::StorageError {
                        message: "total payment amount overflows i64".to_string(),
                    })?;
            }
            Ok(stats)
        })
    }

    pub fn count_for(&self, status: ReservationStatus) -> usize {
        match status {
            ReservationStatus::Pending => self.pending_count,
            ReservationStatus::Confirmed => self.confirmed_count,
            ReservationStatus::CheckedIn => self.checked_in_count,
            ReservationStatus::Completed => self.completed_count,
            ReservationStatus::Cancelled => self.cancelled_count,
            ReservationStatus::NoShow => self.no_show_count,
        }
    }
}
