pub mod service;
pub mod stats;

pub use crate::domain::model::{NewReservation, Reservation, ReservationId, ReservationStatus};
pub use crate::domain::ports::{Authenticator, Clock, ReservationStore};
pub use crate::utils::error::Result;
