//! API routing module
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`categories`] - category management and the navigation tree
//! - [`subcategories`] - subcategory management
//! - [`products`] - hierarchy-relevant product surface
//! - [`pages`] - promotional page associations and listings
//! - [`maintenance`] - hierarchy integrity audit
//!
//! Storefront reads are public; everything else is wrapped by the admin
//! guard in [`crate::auth`].

pub mod convert;

pub mod categories;
pub mod health;
pub mod maintenance;
pub mod pages;
pub mod products;
pub mod subcategories;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_admin;
use crate::core::ServerState;

/// Assemble the application router with auth, tracing and CORS layers
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(subcategories::router())
        .merge(products::router())
        .merge(pages::router())
        .merge(maintenance::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
