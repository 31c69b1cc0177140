//! Database Models
//!
//! Stored shapes for the catalog hierarchy. Record links are
//! `surrealdb::sql::Thing`; HTTP views with string ids live in
//! [`crate::api::convert`].

pub mod category;
pub mod page_category;
pub mod product;
pub mod subcategory;

pub use category::{Category, CategoryCreate, CategoryId, CategoryUpdate};
pub use page_category::{
    CategoryTargetType, PageCategory, PageCategoryCreate, PageCategoryUpdate, PageKind,
};
pub use product::{Product, ProductCreate, ProductId};
pub use subcategory::{
    MAX_LEVEL, SubCategory, SubCategoryCreate, SubCategoryId, SubCategoryUpdate,
};
