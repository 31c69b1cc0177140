//! Page Category-Association Repository
//!
//! Offer pages and gaming-zone pages attach hierarchy nodes through the
//! same `page_category` table; the polymorphic target is resolved against
//! the table named by its type tag before anything is written.

use super::{BaseRepository, RepoError, RepoResult, make_thing, strip_table_prefix};
use crate::db::models::{
    Category, CategoryTargetType, PageCategory, PageCategoryCreate, PageCategoryUpdate, PageKind,
    SubCategory,
};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const TABLE: &str = "page_category";

#[derive(Clone)]
pub struct PageCategoryRepository {
    base: BaseRepository,
}

impl PageCategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Associations for one promotional page, ordered for display
    pub async fn list_by_page(
        &self,
        kind: PageKind,
        page_slug: &str,
        active_only: bool,
    ) -> RepoResult<Vec<PageCategory>> {
        let query = if active_only {
            "SELECT * FROM page_category WHERE page_kind = $kind AND page_slug = $slug AND is_active = true ORDER BY sort_order"
        } else {
            "SELECT * FROM page_category WHERE page_kind = $kind AND page_slug = $slug ORDER BY sort_order"
        };
        let rows: Vec<PageCategory> = self
            .base
            .db()
            .query(query)
            .bind(("kind", kind))
            .bind(("slug", page_slug.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Every association row (validator input)
    pub async fn find_all_raw(&self) -> RepoResult<Vec<PageCategory>> {
        let rows: Vec<PageCategory> = self
            .base
            .db()
            .query("SELECT * FROM page_category")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<PageCategory>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let row: Option<PageCategory> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(row)
    }

    /// Attach a node to a page. The target must resolve against the store
    /// named by `category_type`, and the (page_slug, category) pair must be
    /// new.
    pub async fn create(
        &self,
        kind: PageKind,
        page_slug: &str,
        data: PageCategoryCreate,
    ) -> RepoResult<PageCategory> {
        if page_slug.trim().is_empty() {
            return Err(RepoError::Validation("page_slug cannot be empty".to_string()));
        }

        let target = make_thing(data.category_type.table(), &data.category);
        self.resolve_target(&target, data.category_type).await?;

        // Uniqueness: one attachment per (page, node)
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM page_category WHERE page_slug = $slug AND category = $cat GROUP ALL")
            .bind(("slug", page_slug.to_string()))
            .bind(("cat", target.clone()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        if count.unwrap_or(0) > 0 {
            return Err(RepoError::Duplicate(format!(
                "Node {} is already attached to page '{}'",
                target, page_slug
            )));
        }

        let row = PageCategory {
            id: None,
            page_kind: kind,
            page_slug: page_slug.to_string(),
            category: target,
            category_type: data.category_type,
            is_active: true,
            sort_order: data.sort_order.unwrap_or(0),
        };

        let created: Option<PageCategory> = self.base.db().create(TABLE).content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create page association".to_string()))
    }

    /// Update display flags of an association
    pub async fn update(&self, id: &str, data: PageCategoryUpdate) -> RepoResult<PageCategory> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Page association {} not found", id)))?;

        #[derive(Serialize)]
        struct PageCategoryUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            sort_order: Option<i32>,
        }

        let update_data = PageCategoryUpdateDb {
            is_active: data.is_active,
            sort_order: data.sort_order,
        };

        let pure_id = strip_table_prefix(TABLE, id);
        let thing = make_thing(TABLE, pure_id);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", update_data))
            .await?;

        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Page association {} not found", id)))
    }

    /// Detach a node from a page
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(TABLE, id);
        let deleted: Option<PageCategory> = self.base.db().delete((TABLE, pure_id)).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Page association {} not found", id)));
        }
        Ok(true)
    }

    /// Dispatch the polymorphic lookup to the table named by the type tag;
    /// a target is never probed against both stores.
    async fn resolve_target(&self, target: &Thing, ty: CategoryTargetType) -> RepoResult<()> {
        let key = target.id.to_raw();
        let found = match ty {
            CategoryTargetType::Category => {
                let row: Option<Category> = self.base.db().select(("category", key)).await?;
                row.map(|c| !c.is_deleted).unwrap_or(false)
            }
            CategoryTargetType::Subcategory => {
                let row: Option<SubCategory> = self.base.db().select(("subcategory", key)).await?;
                row.map(|s| !s.is_deleted).unwrap_or(false)
            }
        };
        if !found {
            return Err(RepoError::NotFound(format!(
                "{} {} not found",
                ty.table(),
                target
            )));
        }
        Ok(())
    }
}
