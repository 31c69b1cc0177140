//! SubCategory Repository

use super::{BaseRepository, RepoError, RepoResult, make_thing, strip_table_prefix};
use crate::db::models::{MAX_LEVEL, SubCategory, SubCategoryCreate, SubCategoryUpdate};
use crate::hierarchy::level::{node_map, resolve_level};
use crate::utils::slug::slugify;
use serde::Serialize;
use std::collections::HashSet;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const TABLE: &str = "subcategory";

#[derive(Clone)]
pub struct SubCategoryRepository {
    base: BaseRepository,
}

impl SubCategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active (non-deleted) subcategories ordered by name
    pub async fn find_all_active(&self) -> RepoResult<Vec<SubCategory>> {
        let subs: Vec<SubCategory> = self
            .base
            .db()
            .query("SELECT * FROM subcategory WHERE is_active = true AND is_deleted != true ORDER BY name")
            .await?
            .take(0)?;
        Ok(subs)
    }

    /// Find every subcategory row, including soft-deleted ones (validator input)
    pub async fn find_all_raw(&self) -> RepoResult<Vec<SubCategory>> {
        let subs: Vec<SubCategory> = self
            .base
            .db()
            .query("SELECT * FROM subcategory")
            .await?
            .take(0)?;
        Ok(subs)
    }

    /// Find subcategory by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<SubCategory>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let sub: Option<SubCategory> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(sub)
    }

    /// Find a non-deleted subcategory by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<SubCategory>> {
        let slug_owned = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM subcategory WHERE slug = $slug AND is_deleted != true LIMIT 1")
            .bind(("slug", slug_owned))
            .await?;
        let subs: Vec<SubCategory> = result.take(0)?;
        Ok(subs.into_iter().next())
    }

    /// Non-deleted subcategories under a root category (flat, any level)
    pub async fn find_by_category(&self, category_id: &str) -> RepoResult<Vec<SubCategory>> {
        let cat_thing = make_thing("category", category_id);
        let subs: Vec<SubCategory> = self
            .base
            .db()
            .query("SELECT * FROM subcategory WHERE category = $cat AND is_deleted != true ORDER BY name")
            .bind(("cat", cat_thing))
            .await?
            .take(0)?;
        Ok(subs)
    }

    /// Every row whose root link is the given category, soft-deleted included.
    /// Cascade enumeration must see the whole subtree, not just the live part.
    pub async fn find_children_of_category(&self, category: &Thing) -> RepoResult<Vec<SubCategory>> {
        let subs: Vec<SubCategory> = self
            .base
            .db()
            .query("SELECT * FROM subcategory WHERE category = $cat")
            .bind(("cat", category.clone()))
            .await?
            .take(0)?;
        Ok(subs)
    }

    /// Every row whose parent link is one of the given subcategories
    pub async fn find_children_of_parents(&self, parents: Vec<Thing>) -> RepoResult<Vec<SubCategory>> {
        if parents.is_empty() {
            return Ok(Vec::new());
        }
        let subs: Vec<SubCategory> = self
            .base
            .db()
            .query("SELECT * FROM subcategory WHERE parent_subcategory IN $parents")
            .bind(("parents", parents))
            .await?
            .take(0)?;
        Ok(subs)
    }

    /// Create a new subcategory
    ///
    /// Validates the root category link, resolves the parent chain to cache
    /// `level`, and rejects nesting deeper than [`MAX_LEVEL`].
    pub async fn create(&self, data: SubCategoryCreate) -> RepoResult<SubCategory> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(RepoError::Validation("SubCategory name cannot be empty".to_string()));
        }

        let category = make_thing("category", &data.category);
        let root: Option<crate::db::models::Category> = self
            .base
            .db()
            .select(("category", category.id.to_raw()))
            .await?;
        let root = root.ok_or_else(|| {
            RepoError::NotFound(format!("Category {} not found", data.category))
        })?;
        if root.is_deleted {
            return Err(RepoError::Validation(format!(
                "Category {} is deleted",
                data.category
            )));
        }

        let (parent, level) = match data.parent_subcategory.as_deref() {
            None | Some("") => (None, 1),
            Some(parent_id) => {
                let parent = self
                    .find_by_id(parent_id)
                    .await?
                    .ok_or_else(|| {
                        RepoError::NotFound(format!("Parent subcategory {} not found", parent_id))
                    })?;
                if parent.category != category {
                    return Err(RepoError::Validation(
                        "Parent subcategory belongs to a different category".to_string(),
                    ));
                }
                let level = 1 + self.resolved_level_of(&parent).await?;
                if level > MAX_LEVEL {
                    return Err(RepoError::Validation(format!(
                        "Maximum nesting depth is {} levels",
                        MAX_LEVEL
                    )));
                }
                (parent.id.clone(), level)
            }
        };

        let slug = self.resolve_slug(data.slug.as_deref(), &name).await?;

        let sub = SubCategory {
            id: None,
            name,
            slug,
            image: data.image.unwrap_or_default(),
            category,
            parent_subcategory: parent,
            level,
            is_active: data.is_active.unwrap_or(true),
            is_deleted: false,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let created: Option<SubCategory> = self.base.db().create(TABLE).content(sub).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create subcategory".to_string()))
    }

    /// Update a subcategory; re-parenting recomputes the cached `level` of
    /// this node (descendants keep their cache and are recomputed on read).
    pub async fn update(&self, id: &str, data: SubCategoryUpdate) -> RepoResult<SubCategory> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("SubCategory {} not found", id)))?;

        if let Some(ref new_slug) = data.slug
            && new_slug != &existing.slug
            && self.find_by_slug(new_slug).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Slug '{}' already exists",
                new_slug
            )));
        }

        let pure_id = strip_table_prefix(TABLE, id);
        let thing = make_thing(TABLE, pure_id);

        // Resolve re-parenting fully before any write, depth check
        // included: a rejected update must leave the row untouched, so no
        // validation may run after the first UPDATE statement. An empty
        // string clears the parent.
        enum ParentChange {
            Clear,
            Set { parent: Thing, level: i32 },
        }
        let parent_change: Option<ParentChange> = match data.parent_subcategory.as_deref() {
            None => None,
            Some("") => Some(ParentChange::Clear),
            Some(parent_id) => {
                let parent = self
                    .find_by_id(parent_id)
                    .await?
                    .ok_or_else(|| {
                        RepoError::NotFound(format!("Parent subcategory {} not found", parent_id))
                    })?;
                if parent.id.as_ref() == Some(&thing) {
                    return Err(RepoError::Validation(
                        "A subcategory cannot be its own parent".to_string(),
                    ));
                }
                if parent.category != existing.category {
                    return Err(RepoError::Validation(
                        "Parent subcategory belongs to a different category".to_string(),
                    ));
                }
                if self.chain_contains(&parent, &thing).await? {
                    return Err(RepoError::Validation(
                        "Re-parenting would create a cycle".to_string(),
                    ));
                }
                let level = 1 + self.resolved_level_of(&parent).await?;
                if level > MAX_LEVEL {
                    return Err(RepoError::Validation(format!(
                        "Maximum nesting depth is {} levels",
                        MAX_LEVEL
                    )));
                }
                let parent = parent.id.ok_or_else(|| {
                    RepoError::Database("Parent subcategory has no id".to_string())
                })?;
                Some(ParentChange::Set { parent, level })
            }
        };

        #[derive(Serialize)]
        struct SubCategoryUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            slug: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
        }

        let update_data = SubCategoryUpdateDb {
            name: data.name,
            slug: data.slug,
            image: data.image,
            is_active: data.is_active,
        };

        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing.clone()))
            .bind(("data", update_data))
            .await?;

        match parent_change {
            None => {}
            Some(ParentChange::Clear) => {
                self.base
                    .db()
                    .query("UPDATE $thing SET parent_subcategory = NONE, level = 1")
                    .bind(("thing", thing.clone()))
                    .await?;
            }
            Some(ParentChange::Set { parent, level }) => {
                self.base
                    .db()
                    .query("UPDATE $thing SET parent_subcategory = $parent, level = $level")
                    .bind(("thing", thing.clone()))
                    .bind(("parent", parent))
                    .bind(("level", level))
                    .await?;
            }
        }

        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("SubCategory {} not found", id)))
    }

    /// Soft-delete a subcategory
    pub async fn soft_delete(&self, id: &str) -> RepoResult<bool> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("SubCategory {} not found", id)))?;

        let thing = make_thing(TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing SET is_deleted = true, is_active = false")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    /// Hard delete a batch of subcategories (cascade engine path)
    pub async fn delete_by_ids(&self, ids: Vec<Thing>) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let count = ids.len();
        self.base
            .db()
            .query("DELETE subcategory WHERE id IN $ids")
            .bind(("ids", ids))
            .await?;
        Ok(count)
    }

    /// Recompute a node's level from the stored graph, ignoring the cached
    /// value (which may have drifted).
    async fn resolved_level_of(&self, node: &SubCategory) -> RepoResult<i32> {
        let Some(id) = node.id.as_ref() else {
            return Ok(node.level.max(1));
        };
        let siblings = self.find_children_of_category(&node.category).await?;
        let map = node_map(&siblings);
        let mut visited = HashSet::new();
        Ok(resolve_level(&id.to_string(), &map, &mut visited))
    }

    /// Walk the parent chain of `start` looking for `target` (cycle guard
    /// for re-parenting). Bounded by a visited set, so corrupt chains
    /// terminate too.
    async fn chain_contains(&self, start: &SubCategory, target: &Thing) -> RepoResult<bool> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = start.parent_subcategory.clone();
        while let Some(parent_id) = current {
            if &parent_id == target {
                return Ok(true);
            }
            if !visited.insert(parent_id.to_string()) {
                return Ok(false); // pre-existing cycle upstream; validator's job
            }
            current = match self.find_by_id(&parent_id.to_string()).await? {
                Some(node) => node.parent_subcategory,
                None => None,
            };
        }
        Ok(false)
    }

    async fn resolve_slug(&self, explicit: Option<&str>, name: &str) -> RepoResult<String> {
        if let Some(s) = explicit {
            let slug = slugify(s);
            if slug.is_empty() {
                return Err(RepoError::Validation(format!("Invalid slug '{}'", s)));
            }
            if self.find_by_slug(&slug).await?.is_some() {
                return Err(RepoError::Duplicate(format!("Slug '{}' already exists", slug)));
            }
            return Ok(slug);
        }

        let derived = slugify(name);
        if derived.is_empty() {
            return Err(RepoError::Validation(format!(
                "Cannot derive a slug from name '{}'",
                name
            )));
        }
        if self.find_by_slug(&derived).await?.is_none() {
            return Ok(derived);
        }
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Ok(format!("{}-{}", derived, &suffix[..8]))
    }
}
