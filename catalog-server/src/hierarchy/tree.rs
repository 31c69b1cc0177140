//! Tree Builder
//!
//! Assembles the flat category/subcategory tables into the nested forest
//! consumed by storefront navigation and admin pickers.
//!
//! The data model allows cycles, self-parents and dangling parents, so the
//! builder never assumes a well-formed graph: every node is attached at
//! most once (per-call seen set), a self-parented node falls back to its
//! root category, and recursion stops at a hard depth ceiling. Pathological
//! input degrades to a partial tree instead of crashing.
//!
//! Failure semantics live in the HTTP handler: if loading the rows fails it
//! logs and serves an empty forest, which consumers must read as
//! "unavailable", not "no categories exist".

use crate::db::models::{Category, SubCategory};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Last-resort circuit breaker for cyclic or pathological input
const MAX_DEPTH: usize = 10;

/// One node of the serialized forest; subcategories nest recursively into
/// the same shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub children: Vec<CategoryNode>,
}

/// Build the nested forest from active rows.
///
/// Linking rule: a subcategory attaches under its `parent_subcategory` when
/// that parent is itself in the active set; otherwise it attaches directly
/// under its root category (graceful degradation for orphaned parents).
/// Children are sorted by name at every level.
pub fn build_tree(categories: &[Category], subcategories: &[SubCategory]) -> Vec<CategoryNode> {
    let active_subs: Vec<&SubCategory> = subcategories
        .iter()
        .filter(|s| s.is_active && !s.is_deleted && s.id.is_some())
        .collect();
    let active_ids: HashSet<String> = active_subs
        .iter()
        .filter_map(|s| s.id.as_ref().map(|id| id.to_string()))
        .collect();

    // Bucket children under their effective parent key (a subcategory id or
    // a root category id).
    let mut children_of: HashMap<String, Vec<&SubCategory>> = HashMap::new();
    for sub in &active_subs {
        let own_key = sub.id.as_ref().map(|id| id.to_string());
        let parent_key = match sub.parent_subcategory.as_ref() {
            Some(parent) => {
                let pk = parent.to_string();
                // Self-reference guard + orphan degradation
                if Some(&pk) != own_key.as_ref() && active_ids.contains(&pk) {
                    pk
                } else {
                    sub.category.to_string()
                }
            }
            None => sub.category.to_string(),
        };
        children_of.entry(parent_key).or_default().push(sub);
    }

    let mut roots: Vec<CategoryNode> = categories
        .iter()
        .filter(|c| c.is_active && !c.is_deleted)
        .filter_map(|c| {
            let id = c.id.as_ref()?.to_string();
            let mut seen = HashSet::new();
            let children = attach_children(&id, &children_of, &mut seen, 1);
            Some(CategoryNode {
                id,
                name: c.name.clone(),
                slug: c.slug.clone(),
                children,
            })
        })
        .collect();

    sort_by_name(&mut roots);
    roots
}

fn attach_children(
    parent_key: &str,
    children_of: &HashMap<String, Vec<&SubCategory>>,
    seen: &mut HashSet<String>,
    depth: usize,
) -> Vec<CategoryNode> {
    if depth >= MAX_DEPTH {
        return Vec::new();
    }
    let Some(kids) = children_of.get(parent_key) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for sub in kids {
        let Some(id) = sub.id.as_ref() else { continue };
        let key = id.to_string();
        // A node already placed elsewhere is never attached again; this is
        // what keeps cyclic parent chains from recursing.
        if !seen.insert(key.clone()) {
            continue;
        }
        let children = attach_children(&key, children_of, seen, depth + 1);
        out.push(CategoryNode {
            id: key,
            name: sub.name.clone(),
            slug: sub.slug.clone(),
            children,
        });
    }
    sort_by_name(&mut out);
    out
}

fn sort_by_name(nodes: &mut [CategoryNode]) {
    nodes.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::sql::Thing;

    fn cat(id: &str, name: &str) -> Category {
        Category {
            id: Some(Thing::from(("category", id))),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            image: String::new(),
            is_active: true,
            is_deleted: false,
            show_in_slider: false,
            created_at: 0,
        }
    }

    fn sub(id: &str, name: &str, category: &str, parent: Option<&str>) -> SubCategory {
        SubCategory {
            id: Some(Thing::from(("subcategory", id))),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            image: String::new(),
            category: Thing::from(("category", category)),
            parent_subcategory: parent.map(|p| Thing::from(("subcategory", p))),
            level: 1,
            is_active: true,
            is_deleted: false,
            created_at: 0,
        }
    }

    #[test]
    fn test_nested_scenario() {
        // Electronics -> Laptops -> Gaming Laptops
        let cats = vec![cat("c1", "Electronics")];
        let subs = vec![
            sub("s1", "Laptops", "c1", None),
            sub("s2", "Gaming Laptops", "c1", Some("s1")),
        ];
        let tree = build_tree(&cats, &subs);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "Electronics");
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].name, "Laptops");
        assert_eq!(tree[0].children[0].children[0].name, "Gaming Laptops");
    }

    #[test]
    fn test_inactive_and_deleted_excluded() {
        let mut hidden = cat("c2", "Hidden");
        hidden.is_deleted = true;
        let cats = vec![cat("c1", "Electronics"), hidden];
        let mut off = sub("s2", "Off", "c1", None);
        off.is_active = false;
        let subs = vec![sub("s1", "Laptops", "c1", None), off];

        let tree = build_tree(&cats, &subs);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children.len(), 1);
    }

    #[test]
    fn test_orphan_parent_degrades_to_root() {
        let cats = vec![cat("c1", "Electronics")];
        let subs = vec![sub("s1", "Laptops", "c1", Some("ghost"))];
        let tree = build_tree(&cats, &subs);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].name, "Laptops");
    }

    #[test]
    fn test_self_parent_never_its_own_child() {
        let cats = vec![cat("c1", "Electronics")];
        let subs = vec![sub("s1", "Laptops", "c1", Some("s1"))];
        let tree = build_tree(&cats, &subs);
        assert_eq!(tree[0].children.len(), 1);
        assert!(tree[0].children[0].children.is_empty());
    }

    #[test]
    fn test_cycle_degrades_without_duplicates() {
        // s1 -> s2 -> s1
        let cats = vec![cat("c1", "Electronics")];
        let subs = vec![
            sub("s1", "A", "c1", Some("s2")),
            sub("s2", "B", "c1", Some("s1")),
        ];
        let tree = build_tree(&cats, &subs);

        // Every node appears exactly once across the whole forest
        fn collect(nodes: &[CategoryNode], out: &mut Vec<String>) {
            for n in nodes {
                out.push(n.id.clone());
                collect(&n.children, out);
            }
        }
        let mut ids = Vec::new();
        collect(&tree, &mut ids);
        let unique: HashSet<_> = ids.iter().cloned().collect();
        assert_eq!(ids.len(), unique.len());
        // The two-node cycle is unreachable from the root and is dropped
        // rather than rendered as an infinite chain.
        assert_eq!(ids.len(), 1);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_children_sorted_by_name() {
        let cats = vec![cat("c1", "Electronics")];
        let subs = vec![
            sub("s1", "Wearables", "c1", None),
            sub("s2", "audio", "c1", None),
            sub("s3", "Laptops", "c1", None),
        ];
        let tree = build_tree(&cats, &subs);
        let names: Vec<_> = tree[0].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["audio", "Laptops", "Wearables"]);
    }
}
