//! Promotional Page API module
//!
//! Offer pages and gaming-zone pages share the same routes; the `{kind}`
//! path segment selects the family.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/pages/{kind}/{page_slug}", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/categories",
            get(handler::list_associations).post(handler::create_association),
        )
        .route(
            "/categories/{id}",
            axum::routing::put(handler::update_association).delete(handler::delete_association),
        )
        .route("/products", get(handler::page_products))
}
