use crate::domain::model::{Reservation, ReservationId, ReservationStatus};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Keyed persistence for reservations.
///
/// Implementations are not required to be thread-safe. Callers serialize
/// writes per reservation; see [`crate::core::service::ReservationService`].
pub trait ReservationStore {
    /// Inserts or replaces by id and returns the stored value.
    fn save(&mut self, reservation: Reservation) -> Result<Reservation>;

    fn get(&self, id: &ReservationId) -> Result<Option<Reservation>>;

    /// Natural (insertion) order, optionally filtered by status.
    fn list(
        &self,
        status: Option<ReservationStatus>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Reservation>>;

    fn all(&self) -> Result<Vec<Reservation>>;
}

/// Resolves a caller token to an identity.
pub trait Authenticator {
    fn authenticate(&self, token: &str) -> Result<String>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
