use anyhow::{Result, anyhow};
use reqwest::Method;
use tracing::{debug, info};

use shared_config::AppConfig;
use clinic_api::ClinicApiClient;

use crate::models::{AppointmentDto, AppointmentEnvelope, AppointmentRequest};

pub struct AppointmentService {
    api: ClinicApiClient,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ClinicApiClient::new(config),
        }
    }

    /// Submit a new appointment. The server runs its own capacity check
    /// and stays authoritative; an over-booked slot is rejected there
    /// even when the client-side rules allowed the attempt.
    pub async fn create(&self, request: &AppointmentRequest) -> Result<AppointmentDto> {
        debug!(
            "Creating appointment for patient {} on {} (slot {})",
            request.patient_id, request.appointment_date, request.time_slot
        );

        let body = serde_json::to_value(request)?;
        let envelope: AppointmentEnvelope =
            self.api.request(Method::POST, "/appointments", Some(body)).await?;

        let appointment = envelope
            .result
            .ok_or_else(|| anyhow!("Appointment creation returned no record"))?;

        info!("Appointment {} created", appointment.id);
        Ok(appointment)
    }

    /// Move an existing appointment to a new (date, slot).
    pub async fn reschedule(
        &self,
        appointment_id: i64,
        request: &AppointmentRequest,
    ) -> Result<AppointmentDto> {
        debug!(
            "Rescheduling appointment {} to {} (slot {})",
            appointment_id, request.appointment_date, request.time_slot
        );

        let path = format!("/appointments/{}", appointment_id);
        let body = serde_json::to_value(request)?;
        let envelope: AppointmentEnvelope =
            self.api.request(Method::PUT, &path, Some(body)).await?;

        let appointment = envelope
            .result
            .ok_or_else(|| anyhow!("Appointment reschedule returned no record"))?;

        info!("Appointment {} rescheduled", appointment.id);
        Ok(appointment)
    }
}
