//! Hierarchy Validator
//!
//! Offline/maintenance audit over the whole subcategory store. The write
//! path cannot fully prevent referential damage (direct edits, races,
//! historic data), so the request-path code tolerates bad graphs cheaply
//! and this validator surfaces them precisely.
//!
//! Read-only and side-effect-free; findings are report data, never errors.

use crate::db::models::{Category, PageCategory, SubCategory};
use std::collections::{HashMap, HashSet};

/// Referential-integrity findings across the category graph
#[derive(Debug, Default, serde::Serialize)]
pub struct IssueReport {
    /// Subcategories whose root `category` link resolves to nothing
    pub missing_category: Vec<String>,
    /// Subcategories whose `parent_subcategory` link resolves to nothing
    pub missing_parent: Vec<String>,
    /// Subcategories that are their own parent
    pub self_parent: Vec<String>,
    /// Parent-link cycles, each reported as the id path around the loop
    pub cycles: Vec<Vec<String>>,
    /// Page associations whose target node no longer exists
    pub dangling_associations: Vec<String>,
}

impl IssueReport {
    pub fn is_clean(&self) -> bool {
        self.missing_category.is_empty()
            && self.missing_parent.is_empty()
            && self.self_parent.is_empty()
            && self.cycles.is_empty()
            && self.dangling_associations.is_empty()
    }
}

/// Audit the full graph. Linear in node + edge count: the cycle DFS
/// memoizes finished nodes so every node is visited once no matter how many
/// independent trees exist.
pub fn validate(
    categories: &[Category],
    subcategories: &[SubCategory],
    associations: &[PageCategory],
) -> IssueReport {
    let mut report = IssueReport::default();

    let category_ids: HashSet<String> = categories
        .iter()
        .filter_map(|c| c.id.as_ref().map(|id| id.to_string()))
        .collect();
    let nodes: HashMap<String, &SubCategory> = subcategories
        .iter()
        .filter_map(|s| s.id.as_ref().map(|id| (id.to_string(), s)))
        .collect();

    for sub in subcategories {
        let Some(id) = sub.id.as_ref() else { continue };
        let key = id.to_string();

        if !category_ids.contains(&sub.category.to_string()) {
            report.missing_category.push(key.clone());
        }

        if let Some(parent) = sub.parent_subcategory.as_ref() {
            let parent_key = parent.to_string();
            if parent_key == key {
                report.self_parent.push(key.clone());
            } else if !nodes.contains_key(&parent_key) {
                report.missing_parent.push(key.clone());
            }
        }
    }

    // Cycle detection: DFS along parent links with an explicit recursion
    // stack. Self-parents are already reported above and skipped here.
    let mut visited: HashSet<String> = HashSet::new();
    for start in nodes.keys() {
        if visited.contains(start) {
            continue;
        }
        let mut stack: Vec<String> = Vec::new();
        let mut on_stack: HashSet<String> = HashSet::new();
        let mut current = start.clone();

        loop {
            if visited.contains(&current) {
                break;
            }
            if on_stack.contains(&current) {
                // Revisit while still on the active stack: cycle from its
                // first occurrence to here
                let pos = stack.iter().position(|k| k == &current).unwrap_or(0);
                report.cycles.push(stack[pos..].to_vec());
                break;
            }
            on_stack.insert(current.clone());
            stack.push(current.clone());

            let next = nodes
                .get(&current)
                .and_then(|n| n.parent_subcategory.as_ref())
                .map(|p| p.to_string())
                // skip dangling and self edges, both reported separately
                .filter(|p| p != &current && nodes.contains_key(p));
            match next {
                Some(p) => current = p,
                None => break,
            }
        }

        for key in stack {
            visited.insert(key);
        }
    }

    for assoc in associations {
        let Some(id) = assoc.id.as_ref() else { continue };
        let target = assoc.category.to_string();
        let resolved = match assoc.category_type {
            crate::db::models::CategoryTargetType::Category => category_ids.contains(&target),
            crate::db::models::CategoryTargetType::Subcategory => nodes.contains_key(&target),
        };
        if !resolved {
            report.dangling_associations.push(id.to_string());
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{CategoryTargetType, PageKind};
    use surrealdb::sql::Thing;

    fn cat(id: &str) -> Category {
        Category {
            id: Some(Thing::from(("category", id))),
            name: id.to_string(),
            slug: id.to_string(),
            image: String::new(),
            is_active: true,
            is_deleted: false,
            show_in_slider: false,
            created_at: 0,
        }
    }

    fn sub(id: &str, category: &str, parent: Option<&str>) -> SubCategory {
        SubCategory {
            id: Some(Thing::from(("subcategory", id))),
            name: id.to_string(),
            slug: id.to_string(),
            image: String::new(),
            category: Thing::from(("category", category)),
            parent_subcategory: parent.map(|p| Thing::from(("subcategory", p))),
            level: 1,
            is_active: true,
            is_deleted: false,
            created_at: 0,
        }
    }

    fn assoc(id: &str, target_table: &str, target: &str, ty: CategoryTargetType) -> PageCategory {
        PageCategory {
            id: Some(Thing::from(("page_category", id))),
            page_kind: PageKind::Offer,
            page_slug: "summer".to_string(),
            category: Thing::from((target_table, target)),
            category_type: ty,
            is_active: true,
            sort_order: 0,
        }
    }

    #[test]
    fn test_clean_forest() {
        let cats = vec![cat("c1"), cat("c2")];
        let subs = vec![
            sub("a", "c1", None),
            sub("b", "c1", Some("a")),
            sub("x", "c2", None),
        ];
        let report = validate(&cats, &subs, &[]);
        assert!(report.is_clean());
    }

    #[test]
    fn test_missing_category_and_parent() {
        let cats = vec![cat("c1")];
        let subs = vec![sub("a", "ghost", None), sub("b", "c1", Some("nope"))];
        let report = validate(&cats, &subs, &[]);
        assert_eq!(report.missing_category, vec!["subcategory:a"]);
        assert_eq!(report.missing_parent, vec!["subcategory:b"]);
        assert!(report.cycles.is_empty());
    }

    #[test]
    fn test_self_parent_reported_once() {
        let cats = vec![cat("c1")];
        let subs = vec![sub("a", "c1", Some("a"))];
        let report = validate(&cats, &subs, &[]);
        assert_eq!(report.self_parent, vec!["subcategory:a"]);
        assert!(report.cycles.is_empty());
    }

    #[test]
    fn test_cycle_found_once() {
        let cats = vec![cat("c1")];
        // a -> b -> c -> a, plus a clean tree alongside
        let subs = vec![
            sub("a", "c1", Some("b")),
            sub("b", "c1", Some("c")),
            sub("c", "c1", Some("a")),
            sub("z", "c1", None),
        ];
        let report = validate(&cats, &subs, &[]);
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].len(), 3);
    }

    #[test]
    fn test_dangling_association() {
        let cats = vec![cat("c1")];
        let subs = vec![sub("a", "c1", None)];
        let assocs = vec![
            assoc("ok1", "category", "c1", CategoryTargetType::Category),
            assoc("ok2", "subcategory", "a", CategoryTargetType::Subcategory),
            assoc("bad", "subcategory", "gone", CategoryTargetType::Subcategory),
        ];
        let report = validate(&cats, &subs, &assocs);
        assert_eq!(report.dangling_associations, vec!["page_category:bad"]);
    }
}
