//! Repository Module
//!
//! CRUD operations for the SurrealDB tables backing the category hierarchy.

pub mod category;
pub mod page_category;
pub mod product;
pub mod subcategory;

// Re-exports
pub use category::CategoryRepository;
pub use page_category::PageCategoryRepository;
pub use product::ProductRepository;
pub use subcategory::SubCategoryRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID convention: the wire uses "table:id" strings throughout.
// Repositories accept either the full form or a bare id and normalize with
// strip_table_prefix / make_thing before touching the store.
// =============================================================================

/// Strip a known table prefix from an id ("category:xxx" -> "xxx")
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    match id.split_once(':') {
        Some((tb, rest)) if tb == table => rest,
        _ => id,
    }
}

/// Build a record link for `table` from a bare or prefixed id
pub fn make_thing(table: &str, id: &str) -> Thing {
    Thing::from((table.to_string(), strip_table_prefix(table, id).to_string()))
}

/// Parse a hierarchy node reference that must carry its table prefix
/// ("category:xxx" or "subcategory:xxx"); products and page associations may
/// point at either table, so the prefix disambiguates.
pub fn parse_node_ref(id: &str) -> RepoResult<Thing> {
    match id.split_once(':') {
        Some((tb @ ("category" | "subcategory"), rest)) if !rest.is_empty() => {
            Ok(Thing::from((tb.to_string(), rest.to_string())))
        }
        _ => Err(RepoError::Validation(format!(
            "Malformed node reference '{id}' (expected category:<id> or subcategory:<id>)"
        ))),
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
