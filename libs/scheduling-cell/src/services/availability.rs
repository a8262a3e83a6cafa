use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Weekday};
use tracing::debug;

use crate::models::{
    BookingContext, RescheduleContext, ServiceMode, SlotCapacity, SlotCode, SlotStyle, SlotView,
    TimeSlot, TIME_SLOTS,
};

/// Minimum lead time before a same-day slot may still be booked.
const SAME_DAY_CUTOFF_HOURS: i64 = 4;

fn weekday_number(date: NaiveDate) -> u32 {
    match date.weekday() {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

/// Whether a calendar date may be offered at all.
///
/// Dates are compared as plain calendar days, so any time-of-day on
/// either side is ignored. Weekends are never bookable, and by-doctor
/// bookings are further restricted to the doctor's working days.
/// Total: malformed working-day entries are dropped, never errors.
pub fn is_date_selectable(candidate: NaiveDate, today: NaiveDate, ctx: &BookingContext) -> bool {
    if candidate < today {
        return false;
    }

    let weekday = weekday_number(candidate);
    if weekday == 0 || weekday == 6 {
        return false;
    }

    if ctx.service_mode == ServiceMode::ByDoctor {
        return ctx.normalized_working_days().contains(&weekday);
    }

    true
}

pub fn is_date_selectable_now(candidate: NaiveDate, ctx: &BookingContext) -> bool {
    is_date_selectable(candidate, Local::now().date_naive(), ctx)
}

/// Whether one slot on an already-eligible date may be selected.
///
/// Date eligibility is the caller's precondition and is not re-checked
/// here. The rules, in order:
/// - the reschedule dialog never re-offers the appointment's own
///   original (date, slot) pair;
/// - on the current day, slots starting within the cutoff window are
///   closed regardless of capacity;
/// - an empty capacity table means the server has no constraint data
///   for the day, so the slot is open;
/// - a non-empty table with no entry for this slot closes it;
/// - otherwise the slot is open while current < max patients.
pub fn is_slot_selectable(
    candidate: NaiveDate,
    slot: SlotCode,
    capacities: &[SlotCapacity],
    reschedule: Option<&RescheduleContext>,
    now: NaiveDateTime,
) -> bool {
    if let Some(reschedule) = reschedule {
        if candidate == reschedule.original_date && slot == reschedule.original_slot {
            return false;
        }
    }

    if candidate == now.date() {
        let slot_start = TimeSlot::by_code(slot)
            .start_hour()
            .and_then(|hour| candidate.and_hms_opt(hour, 0, 0));
        // An unparseable label skips the cutoff; capacity still applies.
        if let Some(slot_start) = slot_start {
            if slot_start - now <= Duration::hours(SAME_DAY_CUTOFF_HOURS) {
                return false;
            }
        }
    }

    if capacities.is_empty() {
        return true;
    }

    match capacities.iter().find(|capacity| capacity.code == slot) {
        Some(capacity) => capacity.has_room(),
        None => false,
    }
}

pub fn is_slot_selectable_now(
    candidate: NaiveDate,
    slot: SlotCode,
    capacities: &[SlotCapacity],
    reschedule: Option<&RescheduleContext>,
) -> bool {
    is_slot_selectable(candidate, slot, capacities, reschedule, Local::now().naive_local())
}

pub fn classify_slot_style(selectable: bool) -> SlotStyle {
    if selectable {
        SlotStyle::Open
    } else {
        SlotStyle::Disabled
    }
}

/// Render state for the full six-button slot grid on one date.
pub fn day_slot_view(
    candidate: NaiveDate,
    capacities: &[SlotCapacity],
    reschedule: Option<&RescheduleContext>,
    now: NaiveDateTime,
) -> Vec<SlotView> {
    let views: Vec<SlotView> = TIME_SLOTS
        .iter()
        .map(|slot| {
            let selectable = is_slot_selectable(candidate, slot.code, capacities, reschedule, now);
            SlotView {
                ordinal: slot.ordinal,
                label: slot.label,
                code: slot.code,
                selectable,
                style: classify_slot_style(selectable),
            }
        })
        .collect();

    debug!(
        "{} of {} slots selectable on {}",
        views.iter().filter(|view| view.selectable).count(),
        views.len(),
        candidate
    );

    views
}
