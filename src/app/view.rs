use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::model::{HistoryRecord, PaymentDetail, Reservation, ReservationStatus};

/// Caller-facing shape of a reservation, with the derived end time filled in.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationView {
    pub reservation_id: String,
    pub customer_id: String,
    pub status: ReservationStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub table_id: Option<String>,
    pub table_area: Option<String>,
    pub table_capacity: Option<u32>,
    pub payment: Option<PaymentDetail>,
    pub history: Vec<HistoryRecord>,
}

impl From<&Reservation> for ReservationView {
    fn from(reservation: &Reservation) -> Self {
        let time = reservation.reservation_time();
        let contact = reservation.contact_info();
        let table = reservation.table_assignment();

        Self {
            reservation_id: reservation.id().to_string(),
            customer_id: reservation.customer_id().to_string(),
            status: reservation.status(),
            start_time: time.start_time(),
            end_time: time.end_time(),
            duration_minutes: time.duration_minutes(),
            contact_name: contact.name.clone(),
            contact_phone: contact.phone.clone(),
            contact_email: contact.email.clone(),
            table_id: table.map(|t| t.table_id.clone()),
            table_area: table.map(|t| t.area.clone()),
            table_capacity: table.map(|t| t.capacity),
            payment: reservation.payment_detail().cloned(),
            history: reservation.history().to_vec(),
        }
    }
}
