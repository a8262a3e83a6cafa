use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::handlers::{
    create_booking, reschedule_booking, CreateBookingRequest, RescheduleBookingRequest,
};
use scheduling_cell::models::ServiceMode;
use shared_config::AppConfig;
use shared_models::error::AppError;

fn state_for(server: &MockServer) -> State<Arc<AppConfig>> {
    State(Arc::new(AppConfig {
        clinic_api_url: server.uri(),
        bind_port: 3000,
    }))
}

/// A weekday at least a week out, so the same-day cutoff never applies.
fn future_weekday() -> NaiveDate {
    let mut date = Local::now().date_naive() + Duration::days(7);
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date += Duration::days(1);
    }
    date
}

fn all_weekdays() -> Vec<String> {
    vec!["1".into(), "2".into(), "3".into(), "4".into(), "5".into()]
}

fn appointment_response(id: i64, date: NaiveDate, time_slot: i32) -> serde_json::Value {
    json!({
        "result": {
            "id": id,
            "patientId": 11,
            "doctorId": 7,
            "departmentId": null,
            "appointmentDate": date.format("%Y-%m-%d").to_string(),
            "timeSlot": time_slot,
            "status": "PENDING"
        }
    })
}

fn open_schedule(date: NaiveDate) -> serde_json::Value {
    json!({
        "result": {
            "id": 42,
            "date": date.format("%Y-%m-%d").to_string(),
            "doctorId": 7,
            "doctorTimeslotCapacityResponseDTO": [
                { "id": 1, "timeSlot": "SLOT_9_TO_10", "maxPatients": 5, "currentPatients": 1 },
                { "id": 2, "timeSlot": "SLOT_13_TO_14", "maxPatients": 5, "currentPatients": 5 }
            ]
        }
    })
}

#[tokio::test]
async fn booking_submits_the_ordinal_payload() {
    let mock_server = MockServer::start().await;
    let date = future_weekday();

    Mock::given(method("GET"))
        .and(path(format!("/schedules/doctor/7/date/{}", date.format("%Y-%m-%d"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(open_schedule(date)))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .and(body_partial_json(json!({
            "patientId": 11,
            "doctorId": 7,
            "appointmentDate": date.format("%Y-%m-%d").to_string(),
            "timeSlot": 2,
            "status": "PENDING"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(appointment_response(500, date, 2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = CreateBookingRequest {
        patient_id: 11,
        mode: ServiceMode::ByDoctor,
        doctor_id: Some(7),
        department_id: None,
        working_days: Some(all_weekdays()),
        date,
        time_slot: 2, // 9AM-10AM
    };

    let response = create_booking(state_for(&mock_server), Json(request)).await.unwrap();
    assert_eq!(response.0["result"]["id"], json!(500));
}

#[tokio::test]
async fn full_slot_is_a_conflict_and_never_submitted() {
    let mock_server = MockServer::start().await;
    let date = future_weekday();

    Mock::given(method("GET"))
        .and(path(format!("/schedules/doctor/7/date/{}", date.format("%Y-%m-%d"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(open_schedule(date)))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(appointment_response(500, date, 3)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let request = CreateBookingRequest {
        patient_id: 11,
        mode: ServiceMode::ByDoctor,
        doctor_id: Some(7),
        department_id: None,
        working_days: Some(all_weekdays()),
        date,
        time_slot: 3, // 1PM-2PM, fully booked in the mock
    };

    let result = create_booking(state_for(&mock_server), Json(request)).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn by_doctor_booking_requires_a_doctor_id() {
    let mock_server = MockServer::start().await;

    let request = CreateBookingRequest {
        patient_id: 11,
        mode: ServiceMode::ByDoctor,
        doctor_id: None,
        department_id: None,
        working_days: Some(all_weekdays()),
        date: future_weekday(),
        time_slot: 0,
    };

    let result = create_booking(state_for(&mock_server), Json(request)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn department_booking_skips_the_capacity_fetch() {
    let mock_server = MockServer::start().await;
    let date = future_weekday();

    // No schedule mock mounted: a by-department booking must not query
    // any doctor's capacity table.
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .and(body_partial_json(json!({ "departmentId": 3, "timeSlot": 0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "id": 501,
                "patientId": 11,
                "departmentId": 3,
                "appointmentDate": date.format("%Y-%m-%d").to_string(),
                "timeSlot": 0,
                "status": "PENDING"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = CreateBookingRequest {
        patient_id: 11,
        mode: ServiceMode::ByDepartment,
        doctor_id: None,
        department_id: Some(3),
        working_days: None,
        date,
        time_slot: 0,
    };

    let response = create_booking(state_for(&mock_server), Json(request)).await.unwrap();
    assert_eq!(response.0["result"]["id"], json!(501));
}

#[tokio::test]
async fn reschedule_to_the_original_slot_is_a_conflict() {
    let mock_server = MockServer::start().await;
    let date = future_weekday();

    Mock::given(method("GET"))
        .and(path(format!("/schedules/doctor/7/date/{}", date.format("%Y-%m-%d"))))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let request = RescheduleBookingRequest {
        patient_id: 11,
        mode: ServiceMode::ByDoctor,
        doctor_id: Some(7),
        department_id: None,
        working_days: Some(all_weekdays()),
        date,
        time_slot: 1,
        original_date: date,
        original_time_slot: 1,
    };

    let result = reschedule_booking(state_for(&mock_server), Path(99), Json(request)).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn reschedule_to_a_different_slot_goes_through() {
    let mock_server = MockServer::start().await;
    let date = future_weekday();

    Mock::given(method("GET"))
        .and(path(format!("/schedules/doctor/7/date/{}", date.format("%Y-%m-%d"))))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/appointments/99"))
        .and(body_partial_json(json!({ "timeSlot": 4 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(appointment_response(99, date, 4)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = RescheduleBookingRequest {
        patient_id: 11,
        mode: ServiceMode::ByDoctor,
        doctor_id: Some(7),
        department_id: None,
        working_days: Some(all_weekdays()),
        date,
        time_slot: 4,
        original_date: date,
        original_time_slot: 1,
    };

    let response = reschedule_booking(state_for(&mock_server), Path(99), Json(request))
        .await
        .unwrap();
    assert_eq!(response.0["result"]["id"], json!(99));
}

#[tokio::test]
async fn upstream_rejection_surfaces_as_conflict() {
    let mock_server = MockServer::start().await;
    let date = future_weekday();

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "slot already full" })),
        )
        .mount(&mock_server)
        .await;

    let request = CreateBookingRequest {
        patient_id: 11,
        mode: ServiceMode::ByDepartment,
        doctor_id: None,
        department_id: Some(3),
        working_days: None,
        date,
        time_slot: 0,
    };

    let result = create_booking(state_for(&mock_server), Json(request)).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}
