use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{json, Value};

use crate::adapters::auth::JwtAuthenticator;
use crate::adapters::password::hash_password;
use crate::app::view::ReservationView;
use crate::config::{Command, CreateArgs};
use crate::core::service::ReservationService;
use crate::domain::model::{
    CancellationReason, ContactInfo, NewReservation, PaymentDetail, PaymentStatus, Reservation,
    ReservationId, ReservationStatus,
};
use crate::domain::ports::{Authenticator, Clock, ReservationStore};
use crate::utils::error::{ReservationError, Result};

/// Runs one CLI command and returns the JSON body to print.
///
/// Everything except `login` and `hash-password` needs a valid token.
pub fn execute<S: ReservationStore, C: Clock>(
    service: &mut ReservationService<S, C>,
    auth: &JwtAuthenticator,
    token: Option<&str>,
    command: Command,
) -> Result<Value> {
    if !command.is_public() {
        let token = token.ok_or_else(|| ReservationError::unauthenticated("Not authenticated"))?;
        let caller = auth.authenticate(token)?;
        tracing::debug!(caller = %caller, "Caller authenticated");
    }

    match command {
        Command::Login { username, password } => {
            let token = auth.login(&username, &password)?;
            Ok(serde_json::to_value(token)?)
        }
        Command::HashPassword { password } => Ok(json!({ "password_hash": hash_password(&password)? })),
        Command::Create(args) => {
            let reservation = service.create(new_reservation(args)?)?;
            Ok(view(&reservation))
        }
        Command::Get { id } => {
            let reservation = service.get(&parse_id(&id)?)?;
            Ok(view(&reservation))
        }
        Command::List {
            status,
            offset,
            limit,
        } => {
            let status = status
                .as_deref()
                .map(str::parse::<ReservationStatus>)
                .transpose()?;
            let items: Vec<ReservationView> = service
                .list(status, offset, limit)?
                .iter()
                .map(ReservationView::from)
                .collect();
            Ok(json!({
                "offset": offset,
                "limit": limit,
                "count": items.len(),
                "items": items,
            }))
        }
        Command::Confirm { id } => {
            let reservation = service.confirm(&parse_id(&id)?)?;
            Ok(acknowledge("Reservation confirmed", &reservation))
        }
        Command::AssignTable {
            id,
            table_id,
            capacity,
            area,
        } => {
            let reservation = service.assign_table(&parse_id(&id)?, table_id, capacity, area)?;
            Ok(acknowledge("Table assigned successfully", &reservation))
        }
        Command::CheckIn { id } => {
            let reservation = service.check_in(&parse_id(&id)?)?;
            Ok(acknowledge("Customer checked in", &reservation))
        }
        Command::Complete { id } => {
            let reservation = service.complete(&parse_id(&id)?)?;
            Ok(acknowledge("Reservation completed", &reservation))
        }
        Command::Cancel {
            id,
            reason_code,
            description,
        } => {
            let reason = CancellationReason {
                reason_code,
                description,
            };
            let reservation = service.cancel(&parse_id(&id)?, reason)?;
            Ok(acknowledge("Reservation cancelled", &reservation))
        }
        Command::Stats => Ok(serde_json::to_value(service.stats()?)?),
    }
}

/// Accepts RFC 3339, or a naive `YYYY-MM-DDTHH:MM[:SS]` taken as UTC.
pub fn parse_start_time(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            ReservationError::validation("start_time", format!("cannot parse '{}'", value))
        })
}

fn parse_id(id: &str) -> Result<ReservationId> {
    id.parse()
}

fn new_reservation(args: CreateArgs) -> Result<NewReservation> {
    let deposit = match (args.deposit_amount, args.deposit_method) {
        (Some(amount), Some(method)) => Some(PaymentDetail {
            amount,
            status: PaymentStatus::Unpaid,
            method,
        }),
        _ => None,
    };

    Ok(NewReservation {
        customer_id: args.customer_id,
        contact_info: ContactInfo {
            name: args.name,
            phone: args.phone,
            email: args.email,
        },
        start_time: parse_start_time(&args.start)?,
        duration_minutes: args.duration,
        deposit,
    })
}

fn view(reservation: &Reservation) -> Value {
    json!(ReservationView::from(reservation))
}

fn acknowledge(message: &str, reservation: &Reservation) -> Value {
    json!({
        "message": message,
        "status": reservation.status(),
        "reservation": ReservationView::from(reservation),
    })
}
