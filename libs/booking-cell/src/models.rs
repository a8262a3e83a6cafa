use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Appointment mutation payload. `time_slot` is the slot ORDINAL
/// (0-5); the wire-code strings only appear in capacity queries. The
/// flow builders are the only place this struct is constructed, which
/// keeps the two representations from being confused.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub patient_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    pub appointment_date: NaiveDate,
    pub time_slot: i32,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: Option<i64>,
    pub department_id: Option<i64>,
    pub appointment_date: NaiveDate,
    pub time_slot: i32,
    pub status: AppointmentStatus,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentEnvelope {
    pub result: Option<AppointmentDto>,
}

/// Rejections raised by the booking/reschedule flow. These never
/// advance the wizard; the screen surfaces them and stays put.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("Date {0} is not selectable")]
    DateNotSelectable(NaiveDate),

    #[error("Slot is not selectable on {0}")]
    SlotNotSelectable(NaiveDate),

    #[error("Unknown slot ordinal: {0}")]
    UnknownSlot(i32),

    #[error("No date has been selected yet")]
    NoDateSelected,

    #[error("No slot has been selected yet")]
    NoSlotSelected,

    #[error("Operation not valid in the current step")]
    WrongStep,
}
