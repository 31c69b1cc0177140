//! Maintenance API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::{
    CategoryRepository, PageCategoryRepository, SubCategoryRepository,
};
use crate::hierarchy::{IssueReport, validate};
use crate::utils::AppResult;

/// GET /api/maintenance/hierarchy-issues - referential-integrity audit
///
/// Runs over the raw tables (soft-deleted rows included): damage hides in
/// deleted rows too, and a restore would bring it back.
pub async fn hierarchy_issues(State(state): State<ServerState>) -> AppResult<Json<IssueReport>> {
    let categories = CategoryRepository::new(state.db.clone())
        .find_all_raw()
        .await?;
    let subcategories = SubCategoryRepository::new(state.db.clone())
        .find_all_raw()
        .await?;
    let associations = PageCategoryRepository::new(state.db.clone())
        .find_all_raw()
        .await?;

    let report = validate(&categories, &subcategories, &associations);
    if !report.is_clean() {
        tracing::warn!(
            missing_category = report.missing_category.len(),
            missing_parent = report.missing_parent.len(),
            self_parent = report.self_parent.len(),
            cycles = report.cycles.len(),
            dangling_associations = report.dangling_associations.len(),
            "Hierarchy integrity issues found"
        );
    }
    Ok(Json(report))
}
