use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{BookingContext, RescheduleContext, ServiceMode, SlotCode, SlotStyle};
use crate::services::availability::{day_slot_view, is_date_selectable};
use crate::services::schedule::ScheduleService;

/// Longest calendar window a single request may ask for; callers page
/// by month.
const MAX_WINDOW_DAYS: i64 = 62;

#[derive(Debug, Deserialize)]
pub struct DaySlotsQuery {
    pub date: NaiveDate,
    pub mode: ServiceMode,
    pub working_days: Option<String>,
    pub original_date: Option<NaiveDate>,
    pub original_slot: Option<SlotCode>,
}

#[derive(Debug, Deserialize)]
pub struct SelectableDatesQuery {
    pub mode: ServiceMode,
    pub working_days: Option<String>,
    pub from: Option<NaiveDate>,
    pub days: Option<i64>,
}

fn split_working_days(raw: Option<&str>) -> Option<Vec<String>> {
    raw.map(|value| {
        value
            .split(',')
            .map(|day| day.trim().to_string())
            .filter(|day| !day.is_empty())
            .collect()
    })
}

fn booking_context(
    mode: ServiceMode,
    working_days: Option<&str>,
    doctor_id: Option<i64>,
) -> BookingContext {
    BookingContext {
        service_mode: mode,
        working_days: split_working_days(working_days),
        doctor_id,
        department_id: None,
    }
}

/// GET /doctors/{doctor_id}/slots - the six-button slot grid for one date.
#[axum::debug_handler]
pub async fn get_day_slots(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
    Query(query): Query<DaySlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let ctx = booking_context(query.mode, query.working_days.as_deref(), Some(doctor_id));

    let reschedule = match (query.original_date, query.original_slot) {
        (Some(original_date), Some(original_slot)) => {
            Some(RescheduleContext { original_date, original_slot })
        }
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "original_date and original_slot must be provided together".to_string(),
            ))
        }
    };

    let now = Local::now().naive_local();
    let date_selectable = is_date_selectable(query.date, now.date(), &ctx);

    // An ineligible date renders as a fully disabled grid; the slot
    // rules assume an eligible date and are not consulted.
    if !date_selectable {
        let slots: Vec<Value> = crate::models::TIME_SLOTS
            .iter()
            .map(|slot| {
                json!({
                    "ordinal": slot.ordinal,
                    "label": slot.label,
                    "code": slot.code,
                    "selectable": false,
                    "style": SlotStyle::Disabled,
                })
            })
            .collect();
        return Ok(Json(json!({
            "date": query.date,
            "date_selectable": false,
            "slots": slots,
        })));
    }

    let schedule_service = ScheduleService::new(&state);
    let day = schedule_service.day_schedule(doctor_id, query.date).await;

    let views = day_slot_view(query.date, &day.slots, reschedule.as_ref(), now);

    Ok(Json(json!({
        "date": query.date,
        "date_selectable": true,
        "slots": views,
    })))
}

/// GET /dates - per-date selectability for calendar rendering.
#[axum::debug_handler]
pub async fn get_selectable_dates(
    State(_state): State<Arc<AppConfig>>,
    Query(query): Query<SelectableDatesQuery>,
) -> Result<Json<Value>, AppError> {
    let days = query.days.unwrap_or(31);
    if days < 1 || days > MAX_WINDOW_DAYS {
        return Err(AppError::BadRequest(format!(
            "days must be between 1 and {}",
            MAX_WINDOW_DAYS
        )));
    }

    let ctx = booking_context(query.mode, query.working_days.as_deref(), None);

    let today = Local::now().date_naive();
    let from = query.from.unwrap_or(today);

    let dates: Vec<Value> = (0..days)
        .map(|offset| from + Duration::days(offset))
        .map(|date| {
            json!({
                "date": date,
                "selectable": is_date_selectable(date, today, &ctx),
            })
        })
        .collect();

    Ok(Json(json!({
        "from": from,
        "days": days,
        "dates": dates,
    })))
}
