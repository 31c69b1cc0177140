//! Product API module
//!
//! Only the hierarchy-relevant surface: the multi-level node matcher plus
//! the minimal admin CRUD needed to place products in the tree.

mod handler;

pub use handler::PagedProducts;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", axum::routing::post(handler::create))
        // Must be registered before /{id} to avoid path conflicts
        .route("/by-nodes", get(handler::by_nodes))
        .route("/{id}", get(handler::get_by_id))
}
