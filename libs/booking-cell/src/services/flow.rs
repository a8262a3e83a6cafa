use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use scheduling_cell::models::{BookingContext, RescheduleContext, SlotCapacity, SlotCode, TimeSlot};
use scheduling_cell::services::availability::{is_date_selectable, is_slot_selectable};

use crate::models::{AppointmentRequest, AppointmentStatus, FlowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    ChooseService,
    ChooseDateTime,
    Confirm,
    Submitted,
}

/// The booking wizard as a local state machine. The selection context
/// is owned here and passed explicitly to the availability rules; there
/// is no ambient store. Invalid selections return an error and leave
/// the step untouched.
#[derive(Debug, Clone)]
pub struct BookingFlow {
    step: BookingStep,
    patient_id: i64,
    ctx: Option<BookingContext>,
    selected_date: Option<NaiveDate>,
    selected_slot: Option<SlotCode>,
}

impl BookingFlow {
    pub fn new(patient_id: i64) -> Self {
        Self {
            step: BookingStep::ChooseService,
            patient_id,
            ctx: None,
            selected_date: None,
            selected_slot: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn context(&self) -> Option<&BookingContext> {
        self.ctx.as_ref()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn selected_slot(&self) -> Option<SlotCode> {
        self.selected_slot
    }

    pub fn choose_doctor(
        &mut self,
        doctor_id: i64,
        working_days: Vec<String>,
    ) -> Result<(), FlowError> {
        if self.step != BookingStep::ChooseService {
            return Err(FlowError::WrongStep);
        }
        self.ctx = Some(BookingContext::by_doctor(doctor_id, working_days));
        self.step = BookingStep::ChooseDateTime;
        Ok(())
    }

    pub fn choose_department(&mut self, department_id: i64) -> Result<(), FlowError> {
        if self.step != BookingStep::ChooseService {
            return Err(FlowError::WrongStep);
        }
        self.ctx = Some(BookingContext::by_department(department_id));
        self.step = BookingStep::ChooseDateTime;
        Ok(())
    }

    /// Pick a candidate date. Changing the date always clears any
    /// previously chosen slot; its availability no longer applies.
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), FlowError> {
        let ctx = self.ctx.as_ref().ok_or(FlowError::WrongStep)?;
        if self.step != BookingStep::ChooseDateTime && self.step != BookingStep::Confirm {
            return Err(FlowError::WrongStep);
        }
        if !is_date_selectable(date, today, ctx) {
            return Err(FlowError::DateNotSelectable(date));
        }
        self.selected_date = Some(date);
        self.selected_slot = None;
        self.step = BookingStep::ChooseDateTime;
        Ok(())
    }

    pub fn select_slot(
        &mut self,
        slot: SlotCode,
        capacities: &[SlotCapacity],
        now: NaiveDateTime,
    ) -> Result<(), FlowError> {
        let date = self.selected_date.ok_or(FlowError::NoDateSelected)?;
        if !is_slot_selectable(date, slot, capacities, None, now) {
            return Err(FlowError::SlotNotSelectable(date));
        }
        self.selected_slot = Some(slot);
        self.step = BookingStep::Confirm;
        Ok(())
    }

    /// The mutation payload for the confirmed selection. Converts the
    /// slot's wire code to its ordinal, the representation appointment
    /// mutations use.
    pub fn build_request(&self) -> Result<AppointmentRequest, FlowError> {
        let ctx = self.ctx.as_ref().ok_or(FlowError::WrongStep)?;
        let date = self.selected_date.ok_or(FlowError::NoDateSelected)?;
        let slot = self.selected_slot.ok_or(FlowError::NoSlotSelected)?;

        Ok(AppointmentRequest {
            patient_id: self.patient_id,
            doctor_id: ctx.doctor_id,
            department_id: ctx.department_id,
            appointment_date: date,
            time_slot: TimeSlot::by_code(slot).ordinal,
            status: AppointmentStatus::Pending,
        })
    }

    pub fn mark_submitted(&mut self) -> Result<(), FlowError> {
        if self.step != BookingStep::Confirm {
            return Err(FlowError::WrongStep);
        }
        debug!("Booking flow for patient {} submitted", self.patient_id);
        self.step = BookingStep::Submitted;
        Ok(())
    }
}

/// Reschedule dialog: same date/slot rules plus self-exclusion of the
/// appointment's current (date, slot) pair.
#[derive(Debug, Clone)]
pub struct RescheduleFlow {
    appointment_id: i64,
    patient_id: i64,
    ctx: BookingContext,
    reschedule: RescheduleContext,
    selected_date: Option<NaiveDate>,
    selected_slot: Option<SlotCode>,
}

impl RescheduleFlow {
    pub fn new(
        appointment_id: i64,
        patient_id: i64,
        ctx: BookingContext,
        reschedule: RescheduleContext,
    ) -> Self {
        Self {
            appointment_id,
            patient_id,
            ctx,
            reschedule,
            selected_date: None,
            selected_slot: None,
        }
    }

    pub fn appointment_id(&self) -> i64 {
        self.appointment_id
    }

    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), FlowError> {
        if !is_date_selectable(date, today, &self.ctx) {
            return Err(FlowError::DateNotSelectable(date));
        }
        self.selected_date = Some(date);
        self.selected_slot = None;
        Ok(())
    }

    pub fn select_slot(
        &mut self,
        slot: SlotCode,
        capacities: &[SlotCapacity],
        now: NaiveDateTime,
    ) -> Result<(), FlowError> {
        let date = self.selected_date.ok_or(FlowError::NoDateSelected)?;
        if !is_slot_selectable(date, slot, capacities, Some(&self.reschedule), now) {
            return Err(FlowError::SlotNotSelectable(date));
        }
        self.selected_slot = Some(slot);
        Ok(())
    }

    pub fn build_request(&self) -> Result<AppointmentRequest, FlowError> {
        let date = self.selected_date.ok_or(FlowError::NoDateSelected)?;
        let slot = self.selected_slot.ok_or(FlowError::NoSlotSelected)?;

        Ok(AppointmentRequest {
            patient_id: self.patient_id,
            doctor_id: self.ctx.doctor_id,
            department_id: self.ctx.department_id,
            appointment_date: date,
            time_slot: TimeSlot::by_code(slot).ordinal,
            status: AppointmentStatus::Pending,
        })
    }
}
