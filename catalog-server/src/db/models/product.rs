//! Product Model
//!
//! Products occupy the hierarchy through five *independent* slot references,
//! not a single path: `parent_category` points at a root category while the
//! remaining four slots may point at any node at any depth. The multi-level
//! matcher queries all five slots disjunctively; the cascade engine matches
//! on `parent_category` and `category`.

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

pub type ProductId = Thing;

/// Product record (hierarchy-relevant surface)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<ProductId>,
    pub name: String,
    pub slug: String,
    /// Media hashes of owned images
    #[serde(default)]
    pub images: Vec<String>,
    /// Hierarchy slot: root category
    pub parent_category: Option<Thing>,
    /// Hierarchy slot: primary category/subcategory assignment
    pub category: Option<Thing>,
    /// Hierarchy slots: additional assignments at any depth
    pub sub_category2: Option<Thing>,
    pub sub_category3: Option<Thing>,
    pub sub_category4: Option<Thing>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_deleted: bool,
    /// Unix millis, most-recent-first ordering key for display consumers
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Hierarchy slots, each "category:xxx" or "subcategory:xxx"
    pub parent_category: Option<String>,
    pub category: Option<String>,
    pub sub_category2: Option<String>,
    pub sub_category3: Option<String>,
    pub sub_category4: Option<String>,
}
