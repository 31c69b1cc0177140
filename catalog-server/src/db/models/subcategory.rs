//! SubCategory Model
//!
//! Self-referencing hierarchy node (depth 1-4). Every subcategory links to
//! exactly one root category and optionally to a parent subcategory.
//!
//! Nothing in the storage layer prevents structurally invalid states
//! (self-parent, dangling parent, cycles), so every traversal over these
//! records carries an explicit visited set. The maintenance validator
//! surfaces the violations; the read paths merely tolerate them.

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

pub type SubCategoryId = Thing;

/// Maximum nesting depth supported by the product schema
/// (root category + subcategory levels 1-4)
pub const MAX_LEVEL: i32 = 4;

/// Subcategory record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: Option<SubCategoryId>,
    pub name: String,
    /// Unique URL-safe slug
    pub slug: String,
    /// Media hash of the subcategory image, empty when none
    #[serde(default)]
    pub image: String,
    /// Record link to the root category this node belongs to (required)
    pub category: Thing,
    /// Record link to the parent subcategory; absent means a direct
    /// (level-1) child of `category`
    pub parent_subcategory: Option<Thing>,
    /// Cached nesting depth (1-4): `1 + level(parent)` when a parent exists.
    /// A denormalization that can drift when data is edited directly; read
    /// paths recompute via `hierarchy::level` instead of trusting it.
    #[serde(default = "default_level")]
    pub level: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_deleted: bool,
    /// Unix millis
    #[serde(default)]
    pub created_at: i64,
}

fn default_level() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategoryCreate {
    pub name: String,
    pub slug: Option<String>,
    pub image: Option<String>,
    /// Root category id ("category:xxx" or bare id)
    pub category: String,
    /// Parent subcategory id; absent creates a level-1 node
    pub parent_subcategory: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Re-parent the node; an empty string clears the parent (level 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
