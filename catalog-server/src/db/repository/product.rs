//! Product Repository
//!
//! Owns the multi-level hierarchy-slot query used by promotional pages and
//! the membership queries the cascade engine fans out to.

use super::{BaseRepository, RepoError, RepoResult, parse_node_ref, strip_table_prefix};
use crate::db::models::{Product, ProductCreate};
use crate::utils::slug::slugify;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const TABLE: &str = "product";

/// Disjunction over all five hierarchy slots: a product matches when at
/// least one slot holds at least one of the supplied node ids.
const SLOT_MATCH: &str = "(parent_category IN $nodes OR category IN $nodes \
     OR sub_category2 IN $nodes OR sub_category3 IN $nodes OR sub_category4 IN $nodes)";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let product: Option<Product> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(RepoError::Validation("Product name cannot be empty".to_string()));
        }

        let slug = match data.slug.as_deref() {
            Some(s) => slugify(s),
            None => slugify(&name),
        };
        if slug.is_empty() {
            return Err(RepoError::Validation(format!(
                "Cannot derive a slug from name '{}'",
                name
            )));
        }

        let product = Product {
            id: None,
            name,
            slug,
            images: data.images,
            parent_category: parse_slot(data.parent_category.as_deref())?,
            category: parse_slot(data.category.as_deref())?,
            sub_category2: parse_slot(data.sub_category2.as_deref())?,
            sub_category3: parse_slot(data.sub_category3.as_deref())?,
            sub_category4: parse_slot(data.sub_category4.as_deref())?,
            is_active: true,
            is_deleted: false,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Multi-level matcher: active, non-deleted products occupying at least
    /// one of the given nodes in at least one slot. Callers are expected to
    /// have descendant-expanded the node set already. Most-recent-first,
    /// paginated.
    pub async fn find_by_hierarchy_nodes(
        &self,
        nodes: Vec<Thing>,
        page: u32,
        page_size: u32,
    ) -> RepoResult<Vec<Product>> {
        if nodes.is_empty() {
            return Ok(Vec::new());
        }
        // Widen before multiplying: page is unbounded caller input, and
        // u32 math here would overflow. A start past the table just pages
        // into emptiness.
        let start = (u64::from(page.max(1)) - 1) * u64::from(page_size);
        let start = i64::try_from(start).unwrap_or(i64::MAX);
        let query = format!(
            "SELECT * FROM product WHERE is_active = true AND is_deleted != true AND {SLOT_MATCH} \
             ORDER BY created_at DESC LIMIT $limit START $start"
        );
        let products: Vec<Product> = self
            .base
            .db()
            .query(query)
            .bind(("nodes", nodes))
            .bind(("limit", page_size as i64))
            .bind(("start", start))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Total match count for the same condition as [`find_by_hierarchy_nodes`]
    pub async fn count_by_hierarchy_nodes(&self, nodes: Vec<Thing>) -> RepoResult<i64> {
        if nodes.is_empty() {
            return Ok(0);
        }
        let query = format!(
            "SELECT count() FROM product WHERE is_active = true AND is_deleted != true AND {SLOT_MATCH} GROUP ALL"
        );
        let mut result = self.base.db().query(query).bind(("nodes", nodes)).await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Products attached anywhere in a category subtree: root match on
    /// `parent_category`, descendant match on `category`. Soft-deleted rows
    /// are included - the cascade removes the whole subtree's products.
    pub async fn find_for_cascade(
        &self,
        root: Thing,
        descendants: Vec<Thing>,
    ) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE parent_category = $root OR category IN $descendants")
            .bind(("root", root))
            .bind(("descendants", descendants))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Count for the same membership test as [`find_for_cascade`]
    /// (the deletion-impact read)
    pub async fn count_for_cascade(
        &self,
        root: Thing,
        descendants: Vec<Thing>,
    ) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM product WHERE parent_category = $root OR category IN $descendants GROUP ALL")
            .bind(("root", root))
            .bind(("descendants", descendants))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Hard delete a batch of products (cascade engine path)
    pub async fn delete_by_ids(&self, ids: Vec<Thing>) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let count = ids.len();
        self.base
            .db()
            .query("DELETE product WHERE id IN $ids")
            .bind(("ids", ids))
            .await?;
        Ok(count)
    }
}

fn parse_slot(slot: Option<&str>) -> RepoResult<Option<Thing>> {
    match slot {
        None | Some("") => Ok(None),
        Some(id) => parse_node_ref(id).map(Some),
    }
}
