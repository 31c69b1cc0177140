//! Category Model
//!
//! Root hierarchy node (depth 0). Categories never reference a parent; the
//! nesting lives entirely in the `subcategory` table.

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

pub type CategoryId = Thing;

/// Root category record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<CategoryId>,
    /// Unique case-insensitively among non-deleted categories
    pub name: String,
    /// Unique URL-safe slug, derived from name when not supplied
    pub slug: String,
    /// Media hash of the category image, empty when none
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Soft-delete flag; deleted rows are excluded from active queries but
    /// kept for audit/restore until a cascade hard-deletes them
    #[serde(default)]
    pub is_deleted: bool,
    /// Presentation flag, irrelevant to hierarchy logic
    #[serde(default)]
    pub show_in_slider: bool,
    /// Unix millis
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

impl Category {
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: None,
            name,
            slug,
            image: String::new(),
            is_active: true,
            is_deleted: false,
            show_in_slider: false,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    /// Explicit slug; derived from name when absent
    pub slug: Option<String>,
    pub image: Option<String>,
    pub show_in_slider: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_in_slider: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
