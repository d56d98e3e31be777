//! REST endpoint handlers organized by resource.

pub mod booking;
pub mod showing;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Read-only resource routes.
pub fn read_routes() -> Router<AppState> {
    showing::read_routes()
}

/// Mutating resource routes, each of which must pass admission.
pub fn write_routes() -> Router<AppState> {
    Router::new()
        .merge(showing::write_routes())
        .merge(booking::routes())
}
