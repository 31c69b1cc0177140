//! Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::convert::CategoryView;
use crate::core::ServerState;
use crate::db::models::{CategoryCreate, CategoryUpdate};
use crate::db::repository::{CategoryRepository, SubCategoryRepository};
use crate::hierarchy::{CascadeOutcome, CategoryNode, DeletionImpact, build_tree};
use crate::utils::{AppError, AppResult};

/// GET /api/categories - list active categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<CategoryView>>> {
    let repo = CategoryRepository::new(state.db.clone());
    let categories = repo.find_all_active().await?;
    Ok(Json(categories.into_iter().map(|c| c.into()).collect()))
}

/// GET /api/categories/tree - nested navigation forest
///
/// Navigation must never 500 the storefront: a load failure is logged and
/// served as an empty forest instead.
pub async fn tree(State(state): State<ServerState>) -> Json<Vec<CategoryNode>> {
    let categories = CategoryRepository::new(state.db.clone());
    let subcategories = SubCategoryRepository::new(state.db.clone());

    let roots = match categories.find_all_active().await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load categories for tree");
            return Json(Vec::new());
        }
    };
    let subs = match subcategories.find_all_active().await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load subcategories for tree");
            return Json(Vec::new());
        }
    };

    Json(build_tree(&roots, &subs))
}

/// GET /api/categories/{id} - single category (admin, includes soft-deleted)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CategoryView>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;
    Ok(Json(category.into()))
}

/// POST /api/categories - create category
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<CategoryView>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.create(payload).await?;
    Ok(Json(category.into()))
}

/// PUT /api/categories/{id} - update category
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<CategoryView>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.update(&id, payload).await?;
    Ok(Json(category.into()))
}

/// DELETE /api/categories/{id} - soft delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CategoryRepository::new(state.db.clone());
    let result = repo.soft_delete(&id).await?;
    Ok(Json(result))
}

/// POST /api/categories/{id}/restore - undo a soft delete
pub async fn restore(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CategoryRepository::new(state.db.clone());
    let result = repo.restore(&id).await?;
    Ok(Json(result))
}

/// GET /api/categories/{id}/impact - read-only cascade preview
pub async fn impact(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeletionImpact>> {
    let engine = state.cascade_engine();
    let impact = engine.impact(&id).await?;
    Ok(Json(impact))
}

#[derive(Debug, Deserialize)]
pub struct CascadeParams {
    /// When true, nothing is deleted; the response carries the descendant
    /// ids so products can be reassigned first.
    #[serde(default)]
    pub move_products: bool,
}

/// DELETE /api/categories/{id}/cascade - permanent subtree deletion
pub async fn cascade(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(params): Query<CascadeParams>,
) -> AppResult<Json<CascadeOutcome>> {
    let engine = state.cascade_engine();
    let outcome = engine.cascade_delete(&id, params.move_products).await?;
    Ok(Json(outcome))
}
