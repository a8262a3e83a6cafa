use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

/// Wire enumeration for the six clinic time slots, as used by the
/// schedule-query endpoint. Appointment mutation payloads use the slot
/// ordinal (0-5) instead; see `TimeSlot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotCode {
    #[serde(rename = "SLOT_7_TO_8")]
    Slot7To8,
    #[serde(rename = "SLOT_8_TO_9")]
    Slot8To9,
    #[serde(rename = "SLOT_9_TO_10")]
    Slot9To10,
    #[serde(rename = "SLOT_13_TO_14")]
    Slot13To14,
    #[serde(rename = "SLOT_14_TO_15")]
    Slot14To15,
    #[serde(rename = "SLOT_15_TO_16")]
    Slot15To16,
}

impl SlotCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotCode::Slot7To8 => "SLOT_7_TO_8",
            SlotCode::Slot8To9 => "SLOT_8_TO_9",
            SlotCode::Slot9To10 => "SLOT_9_TO_10",
            SlotCode::Slot13To14 => "SLOT_13_TO_14",
            SlotCode::Slot14To15 => "SLOT_14_TO_15",
            SlotCode::Slot15To16 => "SLOT_15_TO_16",
        }
    }
}

impl std::fmt::Display for SlotCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the static slot catalog. Every screen that shows slot
/// buttons shares this table; it is never fetched or mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub ordinal: i32,
    pub label: &'static str,
    pub code: SlotCode,
}

pub const TIME_SLOTS: [TimeSlot; 6] = [
    TimeSlot { ordinal: 0, label: "7AM-8AM", code: SlotCode::Slot7To8 },
    TimeSlot { ordinal: 1, label: "8AM-9AM", code: SlotCode::Slot8To9 },
    TimeSlot { ordinal: 2, label: "9AM-10AM", code: SlotCode::Slot9To10 },
    TimeSlot { ordinal: 3, label: "1PM-2PM", code: SlotCode::Slot13To14 },
    TimeSlot { ordinal: 4, label: "2PM-3PM", code: SlotCode::Slot14To15 },
    TimeSlot { ordinal: 5, label: "3PM-4PM", code: SlotCode::Slot15To16 },
];

impl TimeSlot {
    pub fn by_code(code: SlotCode) -> &'static TimeSlot {
        TIME_SLOTS
            .iter()
            .find(|slot| slot.code == code)
            .unwrap_or(&TIME_SLOTS[0])
    }

    pub fn by_ordinal(ordinal: i32) -> Option<&'static TimeSlot> {
        TIME_SLOTS.iter().find(|slot| slot.ordinal == ordinal)
    }

    /// Nominal start hour (24h) parsed from the label: leading hour
    /// token, +12 when the label carries a PM suffix and the hour is
    /// still on the 12-hour clock. `None` for a label that does not
    /// start with digits.
    pub fn start_hour(&self) -> Option<u32> {
        let digits: String = self.label.chars().take_while(|c| c.is_ascii_digit()).collect();
        let mut hour: u32 = digits.parse().ok()?;
        if self.label.contains("PM") && hour < 12 {
            hour += 12;
        }
        if hour < 24 {
            Some(hour)
        } else {
            None
        }
    }
}

/// Per-slot booking headroom for one doctor on one day, as reported by
/// the schedule-query endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCapacity {
    #[serde(rename = "timeSlot")]
    pub code: SlotCode,
    #[serde(rename = "currentPatients")]
    pub current_patients: i32,
    #[serde(rename = "maxPatients")]
    pub max_patients: i32,
}

impl SlotCapacity {
    pub fn has_room(&self) -> bool {
        self.current_patients < self.max_patients
    }
}

/// Capacity table for one (doctor, date). An empty `slots` vector means
/// the server holds no constraint data for the day; every slot is then
/// treated as open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorScheduleDay {
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub slots: Vec<SlotCapacity>,
}

impl DoctorScheduleDay {
    pub fn empty(doctor_id: i64, date: NaiveDate) -> Self {
        Self { doctor_id, date, slots: Vec::new() }
    }
}

// Wire envelope of GET /schedules/doctor/{doctorId}/date/{date}.

#[derive(Debug, Deserialize)]
pub struct ScheduleDayEnvelope {
    pub result: Option<ScheduleDayDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDayDto {
    pub id: i64,
    pub date: NaiveDate,
    pub doctor_id: i64,
    #[serde(rename = "doctorTimeslotCapacityResponseDTO", default)]
    pub slot_capacities: Vec<SlotCapacity>,
}

impl ScheduleDayDto {
    pub fn into_schedule_day(self) -> DoctorScheduleDay {
        DoctorScheduleDay {
            doctor_id: self.doctor_id,
            date: self.date,
            slots: self.slot_capacities,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceMode {
    ByDoctor,
    ByDepartment,
}

/// Selection context carried by the booking screens. `working_days`
/// arrives from the doctor profile as decimal strings, possibly
/// zero-padded; it only constrains by-doctor bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingContext {
    pub service_mode: ServiceMode,
    pub working_days: Option<Vec<String>>,
    pub doctor_id: Option<i64>,
    pub department_id: Option<i64>,
}

impl BookingContext {
    pub fn by_doctor(doctor_id: i64, working_days: Vec<String>) -> Self {
        Self {
            service_mode: ServiceMode::ByDoctor,
            working_days: Some(working_days),
            doctor_id: Some(doctor_id),
            department_id: None,
        }
    }

    pub fn by_department(department_id: i64) -> Self {
        Self {
            service_mode: ServiceMode::ByDepartment,
            working_days: None,
            doctor_id: None,
            department_id: Some(department_id),
        }
    }

    /// Working days as weekday numbers (0 = Sunday .. 6 = Saturday).
    /// Entries that fail to parse are dropped, not errors.
    pub fn normalized_working_days(&self) -> Vec<u32> {
        self.working_days
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .filter_map(|day| day.trim().parse::<u32>().ok())
            .filter(|day| *day <= 6)
            .collect()
    }
}

/// The slot an appointment currently occupies, inside its own
/// reschedule dialog. That exact (date, slot) pair must never be
/// offered as a new choice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RescheduleContext {
    pub original_date: NaiveDate,
    pub original_slot: SlotCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStyle {
    Open,
    Disabled,
}

/// Render state for one slot button on one date.
#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    pub ordinal: i32,
    pub label: &'static str,
    pub code: SlotCode,
    pub selectable: bool,
    pub style: SlotStyle,
}
