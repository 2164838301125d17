pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{InMemoryStore, JsonFileStore, JwtAuthenticator};
pub use config::AppConfig;
#[cfg(feature = "cli")]
pub use config::Cli;
pub use crate::core::service::{ReservationPolicy, ReservationService};
pub use crate::core::stats::ReservationStats;
pub use domain::model::{
    CancellationReason, ContactInfo, NewReservation, PaymentDetail, PaymentStatus, Reservation,
    ReservationId, ReservationStatus,
};
pub use utils::error::{ReservationError, Result};
