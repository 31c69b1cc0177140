//! Page Category-Association Model
//!
//! Attaches a category or subcategory node to a promotional page (offer
//! pages and gaming-zone pages share the same record shape). The target is
//! polymorphic: `category_type` names the table to resolve against, and the
//! lookup is dispatched to that table only - never tried against both.
//!
//! Uniqueness invariant: a (page_slug, category) pair exists at most once.

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

/// Which store the association target resolves against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryTargetType {
    Category,
    Subcategory,
}

impl CategoryTargetType {
    pub fn table(&self) -> &'static str {
        match self {
            CategoryTargetType::Category => "category",
            CategoryTargetType::Subcategory => "subcategory",
        }
    }
}

/// Promotional page family the association belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Offer,
    GamingZone,
}

impl PageKind {
    /// Parse the URL path segment ("offer" / "gaming-zone")
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "offer" => Some(PageKind::Offer),
            "gaming-zone" | "gaming_zone" => Some(PageKind::GamingZone),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Offer => "offer",
            PageKind::GamingZone => "gaming-zone",
        }
    }
}

/// Category-association record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageCategory {
    pub id: Option<Thing>,
    pub page_kind: PageKind,
    /// Which promotional page the node is attached to
    pub page_slug: String,
    /// Polymorphic target; table named by `category_type`
    pub category: Thing,
    pub category_type: CategoryTargetType,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageCategoryCreate {
    /// Target node id ("category:xxx" or "subcategory:xxx" or bare id)
    pub category: String,
    pub category_type: CategoryTargetType,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageCategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}
