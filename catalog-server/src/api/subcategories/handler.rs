//! SubCategory API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::collections::HashSet;

use crate::api::convert::SubCategoryView;
use crate::core::ServerState;
use crate::db::models::{SubCategoryCreate, SubCategoryUpdate};
use crate::db::repository::SubCategoryRepository;
use crate::hierarchy::{node_map, resolve_level};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Restrict to one root category ("category:xxx" or bare id)
    pub category: Option<String>,
}

/// GET /api/subcategories - list active subcategories, optionally by root
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<SubCategoryView>>> {
    let repo = SubCategoryRepository::new(state.db.clone());
    let subs = match params.category.as_deref() {
        Some(cat) => repo.find_by_category(cat).await?,
        None => repo.find_all_active().await?,
    };
    Ok(Json(subs.into_iter().map(|s| s.into()).collect()))
}

/// GET /api/subcategories/{id} - single subcategory (admin)
///
/// The served `level` is recomputed from the parent chain rather than read
/// from the cached column, so directly-edited data still reports depth
/// truthfully.
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SubCategoryView>> {
    let repo = SubCategoryRepository::new(state.db.clone());
    let sub = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("SubCategory {} not found", id)))?;

    let mut view = SubCategoryView::from(sub.clone());
    if let Some(node_id) = sub.id.as_ref() {
        let siblings = repo.find_children_of_category(&sub.category).await?;
        let map = node_map(&siblings);
        let mut visited = HashSet::new();
        view.level = resolve_level(&node_id.to_string(), &map, &mut visited);
    }
    Ok(Json(view))
}

/// POST /api/subcategories - create subcategory
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SubCategoryCreate>,
) -> AppResult<Json<SubCategoryView>> {
    let repo = SubCategoryRepository::new(state.db.clone());
    let sub = repo.create(payload).await?;
    Ok(Json(sub.into()))
}

/// PUT /api/subcategories/{id} - update (re-parenting included)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SubCategoryUpdate>,
) -> AppResult<Json<SubCategoryView>> {
    let repo = SubCategoryRepository::new(state.db.clone());
    let sub = repo.update(&id, payload).await?;
    Ok(Json(sub.into()))
}

/// DELETE /api/subcategories/{id} - soft delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = SubCategoryRepository::new(state.db.clone());
    let result = repo.soft_delete(&id).await?;
    Ok(Json(result))
}
