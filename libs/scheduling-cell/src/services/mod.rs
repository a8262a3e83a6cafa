pub mod availability;
pub mod schedule;

pub use availability::{
    classify_slot_style, day_slot_view, is_date_selectable, is_date_selectable_now,
    is_slot_selectable, is_slot_selectable_now,
};
pub use schedule::{CapacityState, FetchTag, ScheduleService};
