//! Category API module

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Must be registered before /{id} to avoid path conflicts
        .route("/tree", get(handler::tree))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/restore", post(handler::restore))
        .route("/{id}/impact", get(handler::impact))
        .route("/{id}/cascade", delete(handler::cascade))
}
