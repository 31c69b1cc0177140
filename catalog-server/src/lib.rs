//! Catalog Server - e-commerce category hierarchy engine
//!
//! An embedded-database HTTP service around a four-level category tree:
//! root categories plus a self-referencing `subcategory` table, with
//! products attached through five independent hierarchy slots and
//! promotional pages attached through association records.
//!
//! # Module structure
//!
//! ```text
//! catalog-server/src/
//! ├── core/       # configuration, state, server shell
//! ├── auth/       # admin guard middleware
//! ├── db/         # embedded SurrealDB models and repositories
//! ├── hierarchy/  # level resolver, tree builder, cascade engine, validator
//! ├── media/      # image file store
//! ├── api/        # HTTP routes and handlers
//! └── utils/      # errors, logging, slugs
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod hierarchy;
pub mod media;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use hierarchy::{CascadeEngine, CascadeOutcome, DeletionImpact, IssueReport};
pub use media::MediaStore;
pub use utils::{AppError, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};
