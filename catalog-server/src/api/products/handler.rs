//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use crate::api::convert::ProductView;
use crate::core::ServerState;
use crate::db::models::ProductCreate;
use crate::db::repository::{ProductRepository, parse_node_ref};
use crate::utils::{AppError, AppResult};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ByNodesParams {
    /// Comma-separated node refs ("category:c1,subcategory:s2,...")
    pub ids: String,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Paginated product listing
#[derive(Debug, Serialize)]
pub struct PagedProducts {
    pub items: Vec<ProductView>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

/// GET /api/products/by-nodes - multi-level slot matcher
///
/// Matches active products holding any of the given nodes in any of the
/// five hierarchy slots, most-recent-first. The node set is taken as-is:
/// callers wanting subtree semantics expand descendants before calling
/// (the page-products endpoint does exactly that).
pub async fn by_nodes(
    State(state): State<ServerState>,
    Query(params): Query<ByNodesParams>,
) -> AppResult<Json<PagedProducts>> {
    let nodes: Vec<Thing> = params
        .ids
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_node_ref)
        .collect::<Result<_, _>>()?;
    if nodes.is_empty() {
        return Err(AppError::validation("At least one node id is required"));
    }

    let page = params.page.unwrap_or(1).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let repo = ProductRepository::new(state.db.clone());
    let total = repo.count_by_hierarchy_nodes(nodes.clone()).await?;
    let items = repo.find_by_hierarchy_nodes(nodes, page, page_size).await?;

    Ok(Json(PagedProducts {
        items: items.into_iter().map(|p| p.into()).collect(),
        total,
        page,
        page_size,
    }))
}

/// GET /api/products/{id} - single product (admin)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductView>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;
    Ok(Json(product.into()))
}

/// POST /api/products - create product
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ProductView>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).await?;
    Ok(Json(product.into()))
}
