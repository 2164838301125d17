use chrono::{TimeZone, Utc};
use restaurant_reservation::domain::model::PaymentStatus;
use restaurant_reservation::{
    CancellationReason, ContactInfo, JsonFileStore, NewReservation, PaymentDetail,
    ReservationService, ReservationStatus,
};
use tempfile::TempDir;

fn booking(customer_id: &str, deposit: Option<i64>) -> NewReservation {
    NewReservation {
        customer_id: customer_id.to_string(),
        contact_info: ContactInfo {
            name: "Dewi".to_string(),
            phone: "0813".to_string(),
            email: "dewi@test.com".to_string(),
        },
        start_time: Utc.with_ymd_and_hms(2026, 1, 10, 18, 30, 0).unwrap(),
        duration_minutes: None,
        deposit: deposit.map(|amount| PaymentDetail {
            amount,
            status: PaymentStatus::Unpaid,
            method: "card".to_string(),
        }),
    }
}

#[test]
fn test_lifecycle_persists_across_service_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reservations.json");

    let id = {
        let mut service = ReservationService::new(JsonFileStore::open(&path).unwrap());
        let id = service.create(booking("c1", Some(75_000))).unwrap().id();
        service.confirm(&id).unwrap();
        service
            .assign_table(&id, "T12".to_string(), 4, "Garden".to_string())
            .unwrap();
        id
    };

    let mut service = ReservationService::new(JsonFileStore::open(&path).unwrap());
    let reloaded = service.get(&id).unwrap();
    assert_eq!(reloaded.status(), ReservationStatus::Confirmed);
    assert_eq!(reloaded.table_assignment().unwrap().area, "Garden");
    assert_eq!(reloaded.history().len(), 3);
    assert_eq!(
        reloaded.reservation_time().end_time(),
        Utc.with_ymd_and_hms(2026, 1, 10, 20, 0, 0).unwrap()
    );

    service.check_in(&id).unwrap();
    service.complete(&id).unwrap();

    let stats = service.stats().unwrap();
    assert_eq!(stats.completed_count, 1);
    assert_eq!(stats.total_payment_amount, 75_000);
}

#[test]
fn test_failed_transition_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reservations.json");

    let mut service = ReservationService::new(JsonFileStore::open(&path).unwrap());
    let id = service.create(booking("c1", None)).unwrap().id();
    service
        .cancel(
            &id,
            CancellationReason {
                reason_code: "REQ".to_string(),
                description: "Changed mind".to_string(),
            },
        )
        .unwrap();

    let before = std::fs::read_to_string(&path).unwrap();
    assert!(service.confirm(&id).is_err());
    let after = std::fs::read_to_string(&path).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_file_contents_are_plain_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reservations.json");

    let mut service = ReservationService::new(JsonFileStore::open(&path).unwrap());
    service.create(booking("c1", None)).unwrap();
    service.create(booking("c2", None)).unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let records = document.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["customer_id"], "c1");
    assert_eq!(records[0]["status"], "PENDING");
    assert_eq!(records[0]["history"][0]["action"], "CREATED");
    assert_eq!(records[1]["customer_id"], "c2");
}
