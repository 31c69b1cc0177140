//! Level Resolver
//!
//! Recomputes a subcategory's nesting depth by walking `parent_subcategory`
//! links over an in-memory id lookup. The cached `level` column can drift
//! when ancestors are re-parented or rows are edited directly, so display
//! paths call this instead of trusting the cache.
//!
//! Cycle tolerance is a first-class parameter: the caller passes the
//! visited set, and a revisit short-circuits to 1 rather than recursing
//! forever on corrupt data. That is a defensive fallback, not a
//! correctness guarantee - the maintenance validator reports the cycle.

use crate::db::models::SubCategory;
use std::collections::{HashMap, HashSet};

/// Index subcategories by their record-id string ("subcategory:xxx")
pub fn node_map(nodes: &[SubCategory]) -> HashMap<String, &SubCategory> {
    nodes
        .iter()
        .filter_map(|n| n.id.as_ref().map(|id| (id.to_string(), n)))
        .collect()
}

/// Resolve the nesting depth of the node with the given record-id key.
///
/// Returns 1 for root-level nodes, nodes whose parent reference dangles,
/// unknown ids, and revisited ids (cycle guard). Always >= 1, always
/// terminates.
pub fn resolve_level(
    id: &str,
    nodes: &HashMap<String, &SubCategory>,
    visited: &mut HashSet<String>,
) -> i32 {
    if visited.contains(id) {
        return 1;
    }
    let Some(node) = nodes.get(id) else {
        return 1;
    };
    let Some(parent) = node.parent_subcategory.as_ref() else {
        return 1;
    };
    let parent_key = parent.to_string();
    if !nodes.contains_key(&parent_key) {
        // Dangling parent: degrade to a root-level node
        return 1;
    }
    visited.insert(id.to_string());
    1 + resolve_level(&parent_key, nodes, visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::sql::Thing;

    fn sub(id: &str, parent: Option<&str>) -> SubCategory {
        SubCategory {
            id: Some(Thing::from(("subcategory", id))),
            name: id.to_string(),
            slug: id.to_string(),
            image: String::new(),
            category: Thing::from(("category", "c1")),
            parent_subcategory: parent.map(|p| Thing::from(("subcategory", p))),
            level: 1,
            is_active: true,
            is_deleted: false,
            created_at: 0,
        }
    }

    fn key(id: &str) -> String {
        Thing::from(("subcategory", id)).to_string()
    }

    #[test]
    fn test_chain_levels() {
        let nodes = vec![sub("a", None), sub("b", Some("a")), sub("c", Some("b"))];
        let map = node_map(&nodes);
        assert_eq!(resolve_level(&key("a"), &map, &mut HashSet::new()), 1);
        assert_eq!(resolve_level(&key("b"), &map, &mut HashSet::new()), 2);
        assert_eq!(resolve_level(&key("c"), &map, &mut HashSet::new()), 3);
    }

    #[test]
    fn test_dangling_parent_is_level_one() {
        let nodes = vec![sub("a", Some("ghost"))];
        let map = node_map(&nodes);
        assert_eq!(resolve_level(&key("a"), &map, &mut HashSet::new()), 1);
    }

    #[test]
    fn test_cycle_terminates() {
        // a -> b -> c -> a
        let nodes = vec![sub("a", Some("b")), sub("b", Some("c")), sub("c", Some("a"))];
        let map = node_map(&nodes);
        let level = resolve_level(&key("a"), &map, &mut HashSet::new());
        assert!(level >= 1);
    }

    #[test]
    fn test_self_parent_terminates() {
        let nodes = vec![sub("a", Some("a"))];
        let map = node_map(&nodes);
        assert_eq!(resolve_level(&key("a"), &map, &mut HashSet::new()), 2);
    }

    #[test]
    fn test_unknown_id() {
        let map = node_map(&[]);
        assert_eq!(resolve_level("subcategory:nope", &map, &mut HashSet::new()), 1);
    }
}
