//! Cascade Deletion Engine
//!
//! Removes a root category together with its full descendant subtree and
//! everything attached inside it: products first, then subcategories, then
//! the category itself, with each entity's media files removed before its
//! record.
//!
//! The store gives no cross-document transaction, so this ordering is the
//! only safety net: a crash mid-operation leaves orphaned media files (a
//! missing image degrades gracefully) rather than records pointing at
//! nothing. Media cleanup is best-effort per file; record deletion is not.
//!
//! Impact inspection (`impact`) is a separate read-only call so callers can
//! warn an operator before committing to the destructive path.

use crate::db::models::{CategoryTargetType, PageCategory, Product, SubCategory};
use crate::db::repository::{
    CategoryRepository, ProductRepository, RepoError, RepoResult, SubCategoryRepository,
    make_thing,
};
use crate::media::MediaStore;
use serde::Serialize;
use std::collections::HashSet;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

/// Full descendant enumeration of one root category, kept per hop so the
/// impact report can break counts down by level.
///
/// Exactly three hops are enumerated beyond the root - the product schema
/// caps nesting at four levels, so the engine never recurses unboundedly.
#[derive(Debug, Default)]
pub struct DescendantSet {
    pub level1: Vec<SubCategory>,
    pub level2: Vec<SubCategory>,
    pub level3: Vec<SubCategory>,
}

impl DescendantSet {
    /// Union of all three hops as record links. Every node carries the root
    /// category link, so the hop sets overlap; the union deduplicates.
    pub fn ids(&self) -> Vec<Thing> {
        self.unique_rows()
            .into_iter()
            .filter_map(|s| s.id.clone())
            .collect()
    }

    /// Distinct descendant rows, level order
    pub fn unique_rows(&self) -> Vec<&SubCategory> {
        let mut seen = HashSet::new();
        self.level1
            .iter()
            .chain(self.level2.iter())
            .chain(self.level3.iter())
            .filter(|s| match s.id.as_ref() {
                Some(id) => seen.insert(id.to_string()),
                None => false,
            })
            .collect()
    }

    /// Distinct descendant count
    pub fn count(&self) -> usize {
        self.ids().len()
    }
}

/// Read-only deletion preview
#[derive(Debug, Clone, Serialize)]
pub struct DeletionImpact {
    pub child_count: usize,
    pub level1_count: usize,
    pub level2_count: usize,
    pub level3_count: usize,
    pub product_count: i64,
}

/// What a committed cascade actually removed
#[derive(Debug, Clone, Serialize)]
pub struct DeletionReport {
    pub deleted_subcategories: usize,
    pub deleted_products: usize,
}

/// Result of a cascade request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CascadeOutcome {
    /// The caller asked to move products out first: nothing was deleted,
    /// and this carries the descendant set to reassign against.
    MoveRequired { descendant_ids: Vec<String> },
    /// The permanent path ran to completion.
    Deleted(DeletionReport),
}

#[derive(Clone)]
pub struct CascadeEngine {
    categories: CategoryRepository,
    subcategories: SubCategoryRepository,
    products: ProductRepository,
    media: MediaStore,
}

impl CascadeEngine {
    pub fn new(db: Surreal<Db>, media: MediaStore) -> Self {
        Self {
            categories: CategoryRepository::new(db.clone()),
            subcategories: SubCategoryRepository::new(db.clone()),
            products: ProductRepository::new(db),
            media,
        }
    }

    /// Enumerate the full descendant set of a root category: level 1 by the
    /// root link, levels 2 and 3 by parent membership in the previous hop.
    /// Soft-deleted rows are included - the cascade clears the whole subtree.
    pub async fn descendants(&self, category_id: &str) -> RepoResult<DescendantSet> {
        let root = make_thing("category", category_id);

        let level1 = self.subcategories.find_children_of_category(&root).await?;
        let level2 = self
            .subcategories
            .find_children_of_parents(ids_of(&level1))
            .await?;
        let level3 = self
            .subcategories
            .find_children_of_parents(ids_of(&level2))
            .await?;

        Ok(DescendantSet {
            level1,
            level2,
            level3,
        })
    }

    /// Descendant subtree of a single subcategory (promotional pages expand
    /// subcategory selections through this), up to the same depth ceiling.
    pub async fn descendants_of_subcategory(
        &self,
        subcategory_id: &str,
    ) -> RepoResult<Vec<SubCategory>> {
        let node = make_thing("subcategory", subcategory_id);

        let hop1 = self
            .subcategories
            .find_children_of_parents(vec![node])
            .await?;
        let hop2 = self
            .subcategories
            .find_children_of_parents(ids_of(&hop1))
            .await?;
        let hop3 = self
            .subcategories
            .find_children_of_parents(ids_of(&hop2))
            .await?;

        let mut all = hop1;
        all.extend(hop2);
        all.extend(hop3);
        let mut seen = HashSet::new();
        all.retain(|s| match s.id.as_ref() {
            Some(id) => seen.insert(id.to_string()),
            None => false,
        });
        Ok(all)
    }

    /// Read-only preview of what a cascade on this category would remove.
    /// Idempotent: identical counts when called twice without intervening
    /// writes.
    pub async fn impact(&self, category_id: &str) -> RepoResult<DeletionImpact> {
        self.require_category(category_id).await?;

        let set = self.descendants(category_id).await?;
        let root = make_thing("category", category_id);
        let product_count = self.products.count_for_cascade(root, set.ids()).await?;

        Ok(DeletionImpact {
            child_count: set.count(),
            level1_count: set.level1.len(),
            level2_count: set.level2.len(),
            level3_count: set.level3.len(),
            product_count,
        })
    }

    /// Execute (or refuse) the cascade.
    ///
    /// With `move_products_first` the engine performs no deletion at all and
    /// hands the descendant ids back so the caller can reassign products
    /// out-of-band before retrying the permanent path.
    pub async fn cascade_delete(
        &self,
        category_id: &str,
        move_products_first: bool,
    ) -> RepoResult<CascadeOutcome> {
        let root_row = self.require_category(category_id).await?;
        let set = self.descendants(category_id).await?;
        let descendant_ids = set.ids();

        if move_products_first {
            return Ok(CascadeOutcome::MoveRequired {
                descendant_ids: descendant_ids.iter().map(|t| t.to_string()).collect(),
            });
        }

        let root = make_thing("category", category_id);
        let matched = self
            .products
            .find_for_cascade(root, descendant_ids.clone())
            .await?;

        // Products first: media, then records
        self.delete_product_media(&matched).await;
        let product_ids: Vec<Thing> = matched.iter().filter_map(|p| p.id.clone()).collect();
        let deleted_products = self.products.delete_by_ids(product_ids).await?;

        // Then descendant subcategories, same media-first ordering
        for sub in set.unique_rows() {
            if !sub.image.is_empty() {
                self.media.delete_image(&sub.image).await;
            }
        }
        let deleted_subcategories = self.subcategories.delete_by_ids(descendant_ids).await?;

        // Finally the root itself
        if !root_row.image.is_empty() {
            self.media.delete_image(&root_row.image).await;
        }
        self.categories.hard_delete(category_id).await?;

        tracing::info!(
            category = %category_id,
            subcategories = deleted_subcategories,
            products = deleted_products,
            "Category subtree cascade-deleted"
        );

        Ok(CascadeOutcome::Deleted(DeletionReport {
            deleted_subcategories,
            deleted_products,
        }))
    }

    /// Expand page associations into the matcher's node set: every target
    /// plus its full descendant subtree, deduped. Attaching a root category
    /// to a page surfaces products assigned anywhere inside it.
    pub async fn expand_associations(
        &self,
        associations: &[PageCategory],
    ) -> RepoResult<Vec<Thing>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut nodes: Vec<Thing> = Vec::new();

        for assoc in associations {
            let key = assoc.category.id.to_raw();
            if seen.insert(assoc.category.to_string()) {
                nodes.push(assoc.category.clone());
            }
            match assoc.category_type {
                CategoryTargetType::Category => {
                    for id in self.descendants(&key).await?.ids() {
                        if seen.insert(id.to_string()) {
                            nodes.push(id);
                        }
                    }
                }
                CategoryTargetType::Subcategory => {
                    for sub in self.descendants_of_subcategory(&key).await? {
                        if let Some(id) = sub.id
                            && seen.insert(id.to_string())
                        {
                            nodes.push(id);
                        }
                    }
                }
            }
        }

        Ok(nodes)
    }

    async fn require_category(&self, category_id: &str) -> RepoResult<crate::db::models::Category> {
        self.categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", category_id)))
    }

    /// Best-effort media fan-out: one failed file is logged and skipped,
    /// never aborts the cascade.
    async fn delete_product_media(&self, products: &[Product]) {
        for product in products {
            for hash in &product.images {
                self.media.delete_image(hash).await;
            }
        }
    }
}

fn ids_of(subs: &[SubCategory]) -> Vec<Thing> {
    subs.iter().filter_map(|s| s.id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_wire_shape() {
        let moved = CascadeOutcome::MoveRequired {
            descendant_ids: vec!["subcategory:s1".to_string()],
        };
        let json = serde_json::to_value(&moved).unwrap();
        assert_eq!(json["outcome"], "move_required");
        assert_eq!(json["descendant_ids"][0], "subcategory:s1");

        let deleted = CascadeOutcome::Deleted(DeletionReport {
            deleted_subcategories: 2,
            deleted_products: 1,
        });
        let json = serde_json::to_value(&deleted).unwrap();
        assert_eq!(json["outcome"], "deleted");
        assert_eq!(json["deleted_subcategories"], 2);
        assert_eq!(json["deleted_products"], 1);
    }

    #[test]
    fn test_descendant_set_dedups_overlapping_hops() {
        fn node(id: &str, parent: Option<&str>) -> SubCategory {
            SubCategory {
                id: Some(surrealdb::sql::Thing::from(("subcategory", id))),
                name: id.to_string(),
                slug: id.to_string(),
                image: String::new(),
                category: surrealdb::sql::Thing::from(("category", "c1")),
                parent_subcategory: parent
                    .map(|p| surrealdb::sql::Thing::from(("subcategory", p))),
                level: 1,
                is_active: true,
                is_deleted: false,
                created_at: 0,
            }
        }

        // The level-1 hop matches on the root link, which every descendant
        // carries, so s2 shows up there *and* as a child of s1.
        let set = DescendantSet {
            level1: vec![node("s1", None), node("s2", Some("s1"))],
            level2: vec![node("s2", Some("s1"))],
            level3: Vec::new(),
        };
        assert_eq!(set.count(), 2);
        assert_eq!(set.unique_rows().len(), 2);
    }
}
