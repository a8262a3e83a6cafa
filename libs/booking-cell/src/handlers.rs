use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use scheduling_cell::models::{BookingContext, RescheduleContext, ServiceMode, SlotCapacity, TimeSlot};
use scheduling_cell::services::schedule::ScheduleService;

use crate::models::FlowError;
use crate::services::appointment::AppointmentService;
use crate::services::flow::{BookingFlow, RescheduleFlow};

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub patient_id: i64,
    pub mode: ServiceMode,
    pub doctor_id: Option<i64>,
    pub department_id: Option<i64>,
    pub working_days: Option<Vec<String>>,
    pub date: NaiveDate,
    pub time_slot: i32,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleBookingRequest {
    pub patient_id: i64,
    pub mode: ServiceMode,
    pub doctor_id: Option<i64>,
    pub department_id: Option<i64>,
    pub working_days: Option<Vec<String>>,
    pub date: NaiveDate,
    pub time_slot: i32,
    pub original_date: NaiveDate,
    pub original_time_slot: i32,
}

fn flow_error_to_app_error(err: FlowError) -> AppError {
    match err {
        FlowError::SlotNotSelectable(_) => AppError::Conflict(err.to_string()),
        _ => AppError::BadRequest(err.to_string()),
    }
}

fn submit_error_to_app_error(err: anyhow::Error) -> AppError {
    let message = err.to_string();
    if message.starts_with("Conflict") {
        AppError::Conflict(message)
    } else {
        AppError::ExternalService(message)
    }
}

async fn capacities_for(
    state: &AppConfig,
    doctor_id: Option<i64>,
    date: NaiveDate,
) -> Vec<SlotCapacity> {
    // Capacity tables are per-doctor; a by-department booking has no
    // table to consult and the server arbitrates at submission.
    match doctor_id {
        Some(doctor_id) => {
            let schedule_service = ScheduleService::new(state);
            schedule_service.day_schedule(doctor_id, date).await.slots
        }
        None => Vec::new(),
    }
}

/// POST / - validate a booking selection and submit it upstream.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let mut flow = BookingFlow::new(request.patient_id);

    match request.mode {
        ServiceMode::ByDoctor => {
            let doctor_id = request
                .doctor_id
                .ok_or_else(|| AppError::BadRequest("doctor_id is required".to_string()))?;
            flow.choose_doctor(doctor_id, request.working_days.clone().unwrap_or_default())
                .map_err(flow_error_to_app_error)?;
        }
        ServiceMode::ByDepartment => {
            let department_id = request
                .department_id
                .ok_or_else(|| AppError::BadRequest("department_id is required".to_string()))?;
            flow.choose_department(department_id).map_err(flow_error_to_app_error)?;
        }
    }

    flow.select_date(request.date, Local::now().date_naive())
        .map_err(flow_error_to_app_error)?;

    let slot = TimeSlot::by_ordinal(request.time_slot)
        .ok_or(FlowError::UnknownSlot(request.time_slot))
        .map_err(flow_error_to_app_error)?;

    let capacities = capacities_for(&state, request.doctor_id, request.date).await;
    flow.select_slot(slot.code, &capacities, Local::now().naive_local())
        .map_err(flow_error_to_app_error)?;

    let payload = flow.build_request().map_err(flow_error_to_app_error)?;
    let appointment_service = AppointmentService::new(&state);
    let created = appointment_service
        .create(&payload)
        .await
        .map_err(submit_error_to_app_error)?;

    Ok(Json(json!({ "result": created })))
}

/// PUT /{appointment_id} - validate and submit a reschedule.
#[axum::debug_handler]
pub async fn reschedule_booking(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<RescheduleBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let ctx = match request.mode {
        ServiceMode::ByDoctor => {
            let doctor_id = request
                .doctor_id
                .ok_or_else(|| AppError::BadRequest("doctor_id is required".to_string()))?;
            BookingContext::by_doctor(doctor_id, request.working_days.clone().unwrap_or_default())
        }
        ServiceMode::ByDepartment => {
            let department_id = request
                .department_id
                .ok_or_else(|| AppError::BadRequest("department_id is required".to_string()))?;
            BookingContext::by_department(department_id)
        }
    };

    let original_slot = TimeSlot::by_ordinal(request.original_time_slot)
        .ok_or(FlowError::UnknownSlot(request.original_time_slot))
        .map_err(flow_error_to_app_error)?;
    let reschedule = RescheduleContext {
        original_date: request.original_date,
        original_slot: original_slot.code,
    };

    let mut flow = RescheduleFlow::new(appointment_id, request.patient_id, ctx, reschedule);

    flow.select_date(request.date, Local::now().date_naive())
        .map_err(flow_error_to_app_error)?;

    let slot = TimeSlot::by_ordinal(request.time_slot)
        .ok_or(FlowError::UnknownSlot(request.time_slot))
        .map_err(flow_error_to_app_error)?;

    let capacities = capacities_for(&state, request.doctor_id, request.date).await;
    flow.select_slot(slot.code, &capacities, Local::now().naive_local())
        .map_err(flow_error_to_app_error)?;

    let payload = flow.build_request().map_err(flow_error_to_app_error)?;
    let appointment_service = AppointmentService::new(&state);
    let updated = appointment_service
        .reschedule(flow.appointment_id(), &payload)
        .await
        .map_err(submit_error_to_app_error)?;

    Ok(Json(json!({ "result": updated })))
}
