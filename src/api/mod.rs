//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`. Every mutating route
//! runs behind [`crate::admission::middleware::admit`]; reads and the
//! health check do not.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::middleware;

use crate::admission::middleware::admit;
use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router(state: &AppState) -> Router<AppState> {
    let writes =
        handlers::write_routes().route_layer(middleware::from_fn_with_state(state.clone(), admit));

    Router::new()
        .nest(
            "/api/v1",
            Router::new().merge(handlers::read_routes()).merge(writes),
        )
        .merge(handlers::system::routes())
}
