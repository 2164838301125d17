//! Reservation lifecycle service.
//!
//! Loads a reservation through the [`ReservationStore`], runs one lifecycle
//! operation on it and persists the result.
//!
//! # Concurrency
//!
//! Every mutating call is a read-modify-write against the store and the
//! service does no locking of its own. Callers must serialize operations on
//! the same reservation id (one writer, or a store with transactional
//! guarantees); two unsynchronized writers can lose an update.

use chrono::{DateTime, Utc};

use crate::core::stats::ReservationStats;
use crate::domain::model::{
    CancellationReason, NewReservation, Reservation, ReservationId, ReservationStatus,
    ReservationTime, TableAssignment, DEFAULT_DURATION_MINUTES,
};
use crate::domain::ports::{Clock, ReservationStore, SystemClock};
use crate::utils::error::{ReservationError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationPolicy {
    pub default_duration_minutes: u32,
    /// No upper bound when `None`.
    pub max_duration_minutes: Option<u32>,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self {
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
            max_duration_minutes: None,
        }
    }
}

pub struct ReservationService<S: ReservationStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    policy: ReservationPolicy,
}

impl<S: ReservationStore> ReservationService<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: ReservationStore, C: Clock> ReservationService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            policy: ReservationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReservationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &ReservationPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create(&mut self, request: NewReservation) -> Result<Reservation> {
        let duration = request
            .duration_minutes
            .unwrap_or(self.policy.default_duration_minutes);

        if let Some(max) = self.policy.max_duration_minutes {
            if duration > max {
                return Err(ReservationError::validation(
                    "duration_minutes",
                    format!("{} exceeds the maximum of {} minutes", duration, max),
                ));
            }
        }

        if let Some(deposit) = &request.deposit {
            if deposit.amount < 0 {
                return Err(ReservationError::validation(
                    "deposit.amount",
                    "cannot be negative",
                ));
            }
        }

        let time = ReservationTime::new(request.start_time, duration)?;
        let reservation = Reservation::new(
            request.customer_id,
            request.contact_info,
            time,
            request.deposit,
            self.clock.now(),
        );

        tracing::debug!(
            reservation_id = %reservation.id(),
            customer_id = reservation.customer_id(),
            "Creating reservation"
        );
        self.persist(reservation)
    }

    pub fn get(&self, id: &ReservationId) -> Result<Reservation> {
        self.store
            .get(id)?
            .ok_or_else(|| ReservationError::NotFound { id: id.to_string() })
    }

    pub fn list(
        &self,
        status: Option<ReservationStatus>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Reservation>> {
        self.store.list(status, offset, limit)
    }

    pub fn confirm(&mut self, id: &ReservationId) -> Result<Reservation> {
        self.transition(id, "confirm", |reservation, now| reservation.confirm(now))
    }

    pub fn assign_table(
        &mut self,
        id: &ReservationId,
        table_id: String,
        capacity: u32,
        area: String,
    ) -> Result<Reservation> {
        let assignment = TableAssignment {
            table_id,
            capacity,
            area,
        };
        self.transition(id, "assign_table", move |reservation, now| {
            reservation.assign_table(assignment, now)
        })
    }

    pub fn check_in(&mut self, id: &ReservationId) -> Result<Reservation> {
        self.transition(id, "check_in", |reservation, now| reservation.check_in(now))
    }

    pub fn complete(&mut self, id: &ReservationId) -> Result<Reservation> {
        self.transition(id, "complete", |reservation, now| reservation.complete(now))
    }

    pub fn cancel(&mut self, id: &ReservationId, reason: CancellationReason) -> Result<Reservation> {
        self.transition(id, "cancel", move |reservation, now| {
            reservation.cancel(&reason, now)
        })
    }

    /// Recomputed from the store on every call.
    pub fn stats(&self) -> Result<ReservationStats> {
        let reservations = self.store.all()?;
        ReservationStats::from_reservations(&reservations)
    }

    fn transition<F>(&mut self, id: &ReservationId, operation: &str, apply: F) -> Result<Reservation>
    where
        F: FnOnce(&mut Reservation, DateTime<Utc>) -> Result<()>,
    {
        let mut reservation = self.get(id)?;

        if let Err(e) = apply(&mut reservation, self.clock.now()) {
            tracing::warn!(
                reservation_id = %id,
                operation,
                status = %reservation.status(),
                "Lifecycle operation rejected: {}",
                e
            );
            return Err(e);
        }

        self.persist(reservation)
    }

    fn persist(&mut self, mut reservation: Reservation) -> Result<Reservation> {
        let events = reservation.take_events();
        let stored = self.store.save(reservation)?;

        for event in &events {
            tracing::info!(
                target: "reservation_events",
                event = event.name(),
                reservation_id = %event.reservation_id(),
                status = %stored.status(),
                "{}",
                serde_json::to_string(event).unwrap_or_default()
            );
        }

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::model::{ContactInfo, HistoryAction, PaymentDetail, PaymentStatus};
    use crate::domain::ports::FixedClock;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    fn service() -> ReservationService<InMemoryStore, FixedClock> {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap();
        ReservationService::with_clock(InMemoryStore::new(), FixedClock(now))
    }

    fn booking(duration_minutes: Option<u32>) -> NewReservation {
        NewReservation {
            customer_id: "c1".to_string(),
            contact_info: ContactInfo {
                name: "Budi".to_string(),
                phone: "0812345".to_string(),
                email: "budi@test.com".to_string(),
            },
            start_time: Utc.with_ymd_and_hms(2025, 12, 31, 19, 0, 0).unwrap(),
            duration_minutes,
            deposit: None,
        }
    }

    #[test]
    fn test_create_uses_default_duration() {
        let mut service = service();
        let reservation = service.create(booking(None)).unwrap();

        assert_eq!(reservation.reservation_time().duration_minutes(), 90);
        assert_eq!(reservation.status(), ReservationStatus::Pending);
        assert_eq!(service.get(&reservation.id()).unwrap().history().len(), 1);
    }

    #[test]
    fn test_create_rejects_zero_duration() {
        let mut service = service();
        let result = service.create(booking(Some(0)));
        assert_matches!(result, Err(ReservationError::ValidationError { .. }));
        assert_eq!(service.stats().unwrap().total, 0);
    }

    #[test]
    fn test_policy_max_duration() {
        let mut service = service().with_policy(ReservationPolicy {
            default_duration_minutes: 90,
            max_duration_minutes: Some(120),
        });
        assert!(service.create(booking(Some(120))).is_ok());
        assert_matches!(
            service.create(booking(Some(121))),
            Err(ReservationError::ValidationError { field, .. }) if field == "duration_minutes"
        );
    }

    #[test]
    fn test_create_rejects_negative_deposit() {
        let mut service = service();
        let mut request = booking(None);
        request.deposit = Some(PaymentDetail {
            amount: -500,
            status: PaymentStatus::Unpaid,
            method: "card".to_string(),
        });

        assert_matches!(
            service.create(request),
            Err(ReservationError::ValidationError { field, .. }) if field == "deposit.amount"
        );
        assert_eq!(service.stats().unwrap().total, 0);
    }

    #[test]
    fn test_stats_surface_payment_overflow() {
        let mut service = service();
        for _ in 0..2 {
            let mut request = booking(None);
            request.deposit = Some(PaymentDetail {
                amount: i64::MAX,
                status: PaymentStatus::Unpaid,
                method: "card".to_string(),
            });
            service.create(request).unwrap();
        }

        assert_matches!(service.stats(), Err(ReservationError::StorageError { .. }));
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut service = service();
        let id = ReservationId::new();

        assert_matches!(service.get(&id), Err(ReservationError::NotFound { .. }));
        assert_matches!(service.confirm(&id), Err(ReservationError::NotFound { .. }));
        assert_matches!(service.check_in(&id), Err(ReservationError::NotFound { .. }));
        assert_matches!(service.complete(&id), Err(ReservationError::NotFound { .. }));
        assert_matches!(
            service.assign_table(&id, "T1".to_string(), 4, "Indoor".to_string()),
            Err(ReservationError::NotFound { .. })
        );
    }

    #[test]
    fn test_failed_guard_is_not_persisted() {
        let mut service = service();
        let id = service.create(booking(None)).unwrap().id();

        assert!(service.check_in(&id).is_err());

        let stored = service.get(&id).unwrap();
        assert_eq!(stored.status(), ReservationStatus::Pending);
        assert_eq!(stored.history().len(), 1);
    }

    #[test]
    fn test_history_stamped_with_clock() {
        let mut service = service();
        let id = service.create(booking(None)).unwrap().id();
        let confirmed = service.confirm(&id).unwrap();

        let last = confirmed.history().last().unwrap();
        assert_eq!(last.action, HistoryAction::Confirmed);
        assert_eq!(last.timestamp, Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap());
    }
}
