use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn scheduling_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/dates", get(handlers::get_selectable_dates))
        .route("/doctors/{doctor_id}/slots", get(handlers::get_day_slots))
        .with_state(state)
}
