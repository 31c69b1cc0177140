//! Model/View conversion
//!
//! Stored records carry `surrealdb::sql::Thing` record links; the HTTP
//! surface exposes them as "table:id" strings. These view structs are the
//! only place the conversion happens.

use serde::Serialize;
use surrealdb::sql::Thing;

use crate::db::models::{Category, PageCategory, Product, SubCategory};

fn thing_str(t: &Thing) -> String {
    t.to_string()
}

fn opt_thing_str(t: &Option<Thing>) -> Option<String> {
    t.as_ref().map(Thing::to_string)
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub is_active: bool,
    pub is_deleted: bool,
    pub show_in_slider: bool,
    pub created_at: i64,
}

impl From<Category> for CategoryView {
    fn from(c: Category) -> Self {
        Self {
            id: opt_thing_str(&c.id).unwrap_or_default(),
            name: c.name,
            slug: c.slug,
            image: c.image,
            is_active: c.is_active,
            is_deleted: c.is_deleted,
            show_in_slider: c.show_in_slider,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubCategoryView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub category: String,
    pub parent_subcategory: Option<String>,
    pub level: i32,
    pub is_active: bool,
    pub created_at: i64,
}

impl From<SubCategory> for SubCategoryView {
    fn from(s: SubCategory) -> Self {
        Self {
            id: opt_thing_str(&s.id).unwrap_or_default(),
            name: s.name,
            slug: s.slug,
            image: s.image,
            category: thing_str(&s.category),
            parent_subcategory: opt_thing_str(&s.parent_subcategory),
            level: s.level,
            is_active: s.is_active,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub images: Vec<String>,
    pub parent_category: Option<String>,
    pub category: Option<String>,
    pub sub_category2: Option<String>,
    pub sub_category3: Option<String>,
    pub sub_category4: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

impl From<Product> for ProductView {
    fn from(p: Product) -> Self {
        Self {
            id: opt_thing_str(&p.id).unwrap_or_default(),
            name: p.name,
            slug: p.slug,
            images: p.images,
            parent_category: opt_thing_str(&p.parent_category),
            category: opt_thing_str(&p.category),
            sub_category2: opt_thing_str(&p.sub_category2),
            sub_category3: opt_thing_str(&p.sub_category3),
            sub_category4: opt_thing_str(&p.sub_category4),
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageCategoryView {
    pub id: String,
    pub page_kind: String,
    pub page_slug: String,
    pub category: String,
    pub category_type: crate::db::models::CategoryTargetType,
    pub is_active: bool,
    pub sort_order: i32,
}

impl From<PageCategory> for PageCategoryView {
    fn from(a: PageCategory) -> Self {
        Self {
            id: opt_thing_str(&a.id).unwrap_or_default(),
            page_kind: a.page_kind.as_str().to_string(),
            page_slug: a.page_slug,
            category: thing_str(&a.category),
            category_type: a.category_type,
            is_active: a.is_active,
            sort_order: a.sort_order,
        }
    }
}
