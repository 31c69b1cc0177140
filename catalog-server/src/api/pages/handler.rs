//! Promotional Page API Handlers
//!
//! The page-products read is where associations meet the matcher: every
//! attached node is descendant-expanded first, so attaching "Electronics"
//! surfaces products assigned anywhere inside that subtree.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::convert::{PageCategoryView, ProductView};
use crate::api::products::PagedProducts;
use crate::core::ServerState;
use crate::db::models::{PageCategoryCreate, PageCategoryUpdate, PageKind};
use crate::db::repository::{PageCategoryRepository, ProductRepository};
use crate::utils::{AppError, AppResult};

fn parse_kind(kind: &str) -> AppResult<PageKind> {
    PageKind::parse(kind)
        .ok_or_else(|| AppError::validation(format!("Unknown page kind '{}'", kind)))
}

/// GET /api/pages/{kind}/{page_slug}/categories - active associations
pub async fn list_associations(
    State(state): State<ServerState>,
    Path((kind, page_slug)): Path<(String, String)>,
) -> AppResult<Json<Vec<PageCategoryView>>> {
    let kind = parse_kind(&kind)?;
    let repo = PageCategoryRepository::new(state.db.clone());
    let rows = repo.list_by_page(kind, &page_slug, true).await?;
    Ok(Json(rows.into_iter().map(|r| r.into()).collect()))
}

/// POST /api/pages/{kind}/{page_slug}/categories - attach a node
pub async fn create_association(
    State(state): State<ServerState>,
    Path((kind, page_slug)): Path<(String, String)>,
    Json(payload): Json<PageCategoryCreate>,
) -> AppResult<Json<PageCategoryView>> {
    let kind = parse_kind(&kind)?;
    let repo = PageCategoryRepository::new(state.db.clone());
    let row = repo.create(kind, &page_slug, payload).await?;
    Ok(Json(row.into()))
}

/// PUT /api/pages/{kind}/{page_slug}/categories/{id} - display flags
pub async fn update_association(
    State(state): State<ServerState>,
    Path((kind, _page_slug, id)): Path<(String, String, String)>,
    Json(payload): Json<PageCategoryUpdate>,
) -> AppResult<Json<PageCategoryView>> {
    parse_kind(&kind)?;
    let repo = PageCategoryRepository::new(state.db.clone());
    let row = repo.update(&id, payload).await?;
    Ok(Json(row.into()))
}

/// DELETE /api/pages/{kind}/{page_slug}/categories/{id} - detach a node
pub async fn delete_association(
    State(state): State<ServerState>,
    Path((kind, _page_slug, id)): Path<(String, String, String)>,
) -> AppResult<Json<bool>> {
    parse_kind(&kind)?;
    let repo = PageCategoryRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct PageProductsParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// GET /api/pages/{kind}/{page_slug}/products - products of a page
///
/// Expands every attached node to its full descendant set, then runs the
/// multi-level matcher over the union. A page with no associations serves
/// an empty listing rather than an error.
pub async fn page_products(
    State(state): State<ServerState>,
    Path((kind, page_slug)): Path<(String, String)>,
    Query(params): Query<PageProductsParams>,
) -> AppResult<Json<PagedProducts>> {
    let kind = parse_kind(&kind)?;
    let repo = PageCategoryRepository::new(state.db.clone());
    let associations = repo.list_by_page(kind, &page_slug, true).await?;

    let nodes = state.cascade_engine().expand_associations(&associations).await?;

    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(20).clamp(1, 100);

    if nodes.is_empty() {
        return Ok(Json(PagedProducts {
            items: Vec::new(),
            total: 0,
            page,
            page_size,
        }));
    }

    let products = ProductRepository::new(state.db.clone());
    let total = products.count_by_hierarchy_nodes(nodes.clone()).await?;
    let items = products.find_by_hierarchy_nodes(nodes, page, page_size).await?;

    Ok(Json(PagedProducts {
        items: items.into_iter().map(ProductView::from).collect(),
        total,
        page,
        page_size,
    }))
}
