//! Maintenance API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/maintenance/hierarchy-issues",
        get(handler::hierarchy_issues),
    )
}
