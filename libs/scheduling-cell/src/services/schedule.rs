use anyhow::Result;
use chrono::NaiveDate;
use reqwest::Method;
use tracing::{debug, warn};

use shared_config::AppConfig;
use clinic_api::ClinicApiClient;

use crate::models::{DoctorScheduleDay, ScheduleDayEnvelope, SlotCapacity};

pub struct ScheduleService {
    api: ClinicApiClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ClinicApiClient::new(config),
        }
    }

    /// Capacity table for one (doctor, date), fail-open: no record for
    /// the day, a null result, or a transport failure all come back as
    /// an empty table, which the availability rules treat as "all slots
    /// open". The server re-checks capacity at submission time.
    pub async fn day_schedule(&self, doctor_id: i64, date: NaiveDate) -> DoctorScheduleDay {
        match self.fetch_day(doctor_id, date).await {
            Ok(day) => day,
            Err(e) => {
                warn!(
                    "Schedule query failed for doctor {} on {}: {} - treating day as open",
                    doctor_id, date, e
                );
                DoctorScheduleDay::empty(doctor_id, date)
            }
        }
    }

    async fn fetch_day(&self, doctor_id: i64, date: NaiveDate) -> Result<DoctorScheduleDay> {
        debug!("Fetching schedule for doctor {} on {}", doctor_id, date);

        let path = format!("/schedules/doctor/{}/date/{}", doctor_id, date.format("%Y-%m-%d"));
        let envelope: Option<ScheduleDayEnvelope> =
            self.api.request_optional(Method::GET, &path, None).await?;

        Ok(match envelope.and_then(|envelope| envelope.result) {
            Some(dto) => dto.into_schedule_day(),
            None => DoctorScheduleDay::empty(doctor_id, date),
        })
    }
}

/// Identity of one in-flight schedule fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTag {
    pub doctor_id: i64,
    pub date: NaiveDate,
}

impl FetchTag {
    pub fn new(doctor_id: i64, date: NaiveDate) -> Self {
        Self { doctor_id, date }
    }
}

/// Latest-request-wins holder for the capacity table the booking screen
/// is currently rendering against.
///
/// Rapid date changes can let an older fetch resolve after a newer one;
/// each fetch is tagged with its (doctor, date) and a response whose tag
/// no longer matches the current selection is discarded. Capacities are
/// replaced wholesale, never merged. Until a fetch resolves, the
/// previously resolved table stays in place (stale-while-revalidate).
#[derive(Debug, Default)]
pub struct CapacityState {
    current: Option<FetchTag>,
    slots: Vec<SlotCapacity>,
}

impl CapacityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a fetch for `tag` is now the one whose answer we
    /// want. Any response carrying an older tag will be ignored.
    pub fn begin_fetch(&mut self, tag: FetchTag) {
        self.current = Some(tag);
    }

    /// Apply a resolved fetch. Returns false when the response is stale
    /// and was discarded.
    pub fn apply(&mut self, tag: FetchTag, slots: Vec<SlotCapacity>) -> bool {
        if self.current != Some(tag) {
            debug!(
                "Discarding stale schedule response for doctor {} on {}",
                tag.doctor_id, tag.date
            );
            return false;
        }
        self.slots = slots;
        true
    }

    pub fn slots(&self) -> &[SlotCapacity] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotCode;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn capacity(current: i32) -> SlotCapacity {
        SlotCapacity {
            code: SlotCode::Slot7To8,
            current_patients: current,
            max_patients: 5,
        }
    }

    #[test]
    fn matching_response_replaces_capacities_wholesale() {
        let mut state = CapacityState::new();
        let tag = FetchTag::new(7, date(10));

        state.begin_fetch(tag);
        assert!(state.apply(tag, vec![capacity(1), capacity(2)]));
        assert_eq!(state.slots().len(), 2);

        state.begin_fetch(tag);
        assert!(state.apply(tag, vec![capacity(3)]));
        assert_eq!(state.slots().len(), 1);
        assert_eq!(state.slots()[0].current_patients, 3);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state = CapacityState::new();
        let first = FetchTag::new(7, date(10));
        let second = FetchTag::new(7, date(11));

        state.begin_fetch(first);
        state.begin_fetch(second);

        // The older fetch resolves late.
        assert!(!state.apply(first, vec![capacity(5)]));
        assert!(state.slots().is_empty());

        assert!(state.apply(second, vec![capacity(2)]));
        assert_eq!(state.slots()[0].current_patients, 2);
    }

    #[test]
    fn previous_capacities_survive_until_the_new_fetch_resolves() {
        let mut state = CapacityState::new();
        let first = FetchTag::new(7, date(10));
        state.begin_fetch(first);
        state.apply(first, vec![capacity(4)]);

        // New selection, fetch still in flight.
        state.begin_fetch(FetchTag::new(7, date(11)));
        assert_eq!(state.slots().len(), 1);
    }

    #[test]
    fn doctor_change_also_invalidates_the_tag() {
        let mut state = CapacityState::new();
        let first = FetchTag::new(7, date(10));
        let other_doctor = FetchTag::new(8, date(10));

        state.begin_fetch(first);
        state.begin_fetch(other_doctor);
        assert!(!state.apply(first, vec![capacity(1)]));
    }
}
