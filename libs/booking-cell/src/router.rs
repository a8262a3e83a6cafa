use std::sync::Arc;

use axum::{
    routing::{post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_booking))
        .route("/{appointment_id}", put(handlers::reschedule_booking))
        .with_state(state)
}
