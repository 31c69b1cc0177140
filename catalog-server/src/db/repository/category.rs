//! Category Repository

use super::{BaseRepository, RepoError, RepoResult, make_thing, strip_table_prefix};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::utils::slug::slugify;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active (non-deleted) categories ordered by name
    pub async fn find_all_active(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE is_active = true AND is_deleted != true ORDER BY name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find every category row, including soft-deleted ones (validator input)
    pub async fn find_all_raw(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self.base.db().query("SELECT * FROM category").await?.take(0)?;
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let category: Option<Category> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(category)
    }

    /// Find a non-deleted category by name, case-insensitively
    pub async fn find_by_name_ci(&self, name: &str) -> RepoResult<Option<Category>> {
        let lowered = name.to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE string::lowercase(name) = $name AND is_deleted != true LIMIT 1")
            .bind(("name", lowered))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Find a non-deleted category by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let slug_owned = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE slug = $slug AND is_deleted != true LIMIT 1")
            .bind(("slug", slug_owned))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Create a new category
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(RepoError::Validation("Category name cannot be empty".to_string()));
        }

        // Name unique case-insensitively among non-deleted rows
        if self.find_by_name_ci(&name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let slug = self.resolve_slug(data.slug.as_deref(), &name).await?;

        let mut category = Category::new(name, slug);
        category.image = data.image.unwrap_or_default();
        category.show_in_slider = data.show_in_slider.unwrap_or(false);
        category.is_active = data.is_active.unwrap_or(true);

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update a category
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        // Check duplicate name if changing
        if let Some(ref new_name) = data.name
            && new_name.to_lowercase() != existing.name.to_lowercase()
            && self.find_by_name_ci(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                new_name
            )));
        }

        // Check duplicate slug if changing
        if let Some(ref new_slug) = data.slug
            && new_slug != &existing.slug
            && self.find_by_slug(new_slug).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Slug '{}' already exists",
                new_slug
            )));
        }

        #[derive(Serialize)]
        struct CategoryUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            slug: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            show_in_slider: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
        }

        let update_data = CategoryUpdateDb {
            name: data.name,
            slug: data.slug,
            image: data.image,
            show_in_slider: data.show_in_slider,
            is_active: data.is_active,
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
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Soft-delete a category (kept for audit/restore)
    pub async fn soft_delete(&self, id: &str) -> RepoResult<bool> {
        self.set_deleted(id, true).await
    }

    /// Restore a soft-deleted category
    pub async fn restore(&self, id: &str) -> RepoResult<bool> {
        self.set_deleted(id, false).await
    }

    async fn set_deleted(&self, id: &str, deleted: bool) -> RepoResult<bool> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        let thing = make_thing(TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing SET is_deleted = $deleted, is_active = $active")
            .bind(("thing", thing))
            .bind(("deleted", deleted))
            .bind(("active", !deleted))
            .await?;
        Ok(true)
    }

    /// Hard delete a category row. Only the cascade engine calls this, after
    /// products and descendant subcategories are already gone.
    pub async fn hard_delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(TABLE, id);
        let deleted: Option<Category> = self.base.db().delete((TABLE, pure_id)).await?;
        Ok(deleted.is_some())
    }

    /// Resolve the slug for a new category: explicit slugs must be free,
    /// derived slugs get a unique suffix on collision.
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
