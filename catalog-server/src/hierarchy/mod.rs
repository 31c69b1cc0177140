//! Category Hierarchy Engine
//!
//! The interesting part of the catalog: a self-referencing tree stored as a
//! flat table of parent links, which the data model does not keep
//! well-formed on its own.
//!
//! - [`level`] - recompute a node's depth, cycle-tolerant
//! - [`tree`] - assemble the nested forest for read consumers
//! - [`cascade`] - subtree deletion with product/media fan-out
//! - [`validate`] - maintenance audit of referential integrity

pub mod cascade;
pub mod level;
pub mod tree;
pub mod validate;

pub use cascade::{CascadeEngine, CascadeOutcome, DeletionImpact, DeletionReport, DescendantSet};
pub use level::{node_map, resolve_level};
pub use tree::{CategoryNode, build_tree};
pub use validate::{IssueReport, validate};
