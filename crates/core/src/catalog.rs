//! Category tree construction and sibling reordering.
//!
//! Categories are persisted as a flat table of records, each carrying an
//! optional parent reference and a sibling `position`. [`build_tree`]
//! converts that flat list into an ordered forest for menus and filter
//! trees; [`plan_reorder`] produces the position writes that persist a
//! user's reordering of one sibling group.
//!
//! Malformed input never makes the builder fail: a `parent_id` pointing at
//! a missing record (or at the record itself) is treated as "no parent",
//! and a parent cycle is broken by promoting its first member (in input
//! order) to a root. Duplicate ids resolve parent references to the last
//! occurrence; each input record still yields exactly one node.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::CategoryId;

/// A flat category record as stored by the catalog.
///
/// Inactive categories are kept in the tree; filtering them out is a
/// consumer decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    /// URL-safe identifier, unique within the catalog.
    pub slug: String,
    /// `None` means top-level.
    pub parent_id: Option<CategoryId>,
    /// Sibling ordering key; unique among siblings by convention only.
    pub position: i32,
    pub is_active: bool,
}

/// A category with its ordered descendants.
///
/// Rebuilt from scratch on every catalog change; consumers must not rely
/// on node identity surviving a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<CategoryId>,
    pub position: i32,
    pub is_active: bool,
    /// Sorted ascending by `position`; ties keep input order.
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    fn from_record(record: &CategoryRecord, children: Vec<Self>) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            slug: record.slug.clone(),
            parent_id: record.parent_id,
            position: record.position,
            is_active: record.is_active,
            children,
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}

/// Build an ordered forest from a flat list of category records.
///
/// Every input record appears exactly once in the output: as a root when
/// its `parent_id` is `None` or does not resolve, otherwise as a child of
/// the resolved parent. Sibling groups (and the roots) are sorted
/// ascending by `position` with input order breaking ties.
#[must_use]
pub fn build_tree(records: &[CategoryRecord]) -> Vec<CategoryNode> {
    let len = records.len();

    // Parent references resolve against the last occurrence of an id.
    let mut index_of: HashMap<CategoryId, usize> = HashMap::with_capacity(len);
    for (i, record) in records.iter().enumerate() {
        index_of.insert(record.id, i);
    }

    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); len];
    let mut parent_of: Vec<Option<usize>> = vec![None; len];
    let mut roots: Vec<usize> = Vec::new();

    for (i, record) in records.iter().enumerate() {
        match record.parent_id.and_then(|p| index_of.get(&p).copied()) {
            Some(parent) if parent != i => {
                children_of[parent].push(i);
                parent_of[i] = Some(parent);
            }
            // Null, dangling, or self-referential parent: top-level.
            _ => roots.push(i),
        }
    }

    // A parent cycle leaves its members unreachable from any root. Promote
    // the first such record (input order) to a root, severing its inbound
    // edge, until everything is reachable. The output is always a forest.
    let mut reached = vec![false; len];
    let mut stack = roots.clone();
    while let Some(i) = stack.pop() {
        if !reached[i] {
            reached[i] = true;
            stack.extend(children_of[i].iter().copied());
        }
    }
    for i in 0..len {
        if reached[i] {
            continue;
        }
        if let Some(parent) = parent_of[i] {
            children_of[parent].retain(|&child| child != i);
            parent_of[i] = None;
        }
        roots.push(i);
        stack.push(i);
        while let Some(j) = stack.pop() {
            if !reached[j] {
                reached[j] = true;
                stack.extend(children_of[j].iter().copied());
            }
        }
    }

    roots.sort_by_key(|&i| records[i].position);
    roots
        .into_iter()
        .map(|i| assemble(records, &children_of, i))
        .collect()
}

fn assemble(records: &[CategoryRecord], children_of: &[Vec<usize>], index: usize) -> CategoryNode {
    let mut child_indices = children_of[index].clone();
    // Stable sort: equal positions keep their input order.
    child_indices.sort_by_key(|&c| records[c].position);

    let children = child_indices
        .into_iter()
        .map(|c| assemble(records, children_of, c))
        .collect();

    CategoryNode::from_record(&records[index], children)
}

/// Plan the position writes for reordering one sibling group.
///
/// Given the desired order of child ids, assigns positions `0..k`. The
/// caller applies these writes to the record store; a partial application
/// leaves positions non-contiguous but still monotonically meaningful.
#[must_use]
pub fn plan_reorder(ordered_ids: &[CategoryId]) -> Vec<(CategoryId, i32)> {
    ordered_ids
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i32::try_from(i).unwrap_or(i32::MAX)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(id: i32, parent: Option<i32>, position: i32, name: &str) -> CategoryRecord {
        CategoryRecord {
            id: CategoryId::new(id),
            name: name.to_owned(),
            slug: name.to_lowercase(),
            parent_id: parent.map(CategoryId::new),
            position,
            is_active: true,
        }
    }

    fn total_nodes(forest: &[CategoryNode]) -> usize {
        forest.iter().map(CategoryNode::subtree_len).sum()
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(&[]).is_empty());
    }

    #[test]
    fn test_single_root_with_ordered_children() {
        // Children positioned out of input order must come back sorted.
        let records = vec![
            record(1, None, 0, "A"),
            record(2, Some(1), 1, "B"),
            record(3, Some(1), 0, "C"),
        ];

        let forest = build_tree(&records);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].name, "A");
        let child_names: Vec<&str> = forest[0].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(child_names, ["C", "B"]);
    }

    #[test]
    fn test_every_record_appears_exactly_once() {
        let records = vec![
            record(1, None, 2, "Sarees"),
            record(2, Some(1), 0, "Silk"),
            record(3, Some(1), 1, "Cotton"),
            record(4, None, 0, "Lehengas"),
            record(5, Some(4), 0, "Bridal"),
            record(6, Some(2), 0, "Kanjivaram"),
        ];

        let forest = build_tree(&records);
        assert_eq!(total_nodes(&forest), records.len());
    }

    #[test]
    fn test_sibling_groups_sorted_by_position() {
        let records = vec![
            record(1, None, 5, "A"),
            record(2, None, 1, "B"),
            record(3, Some(2), 9, "D"),
            record(4, Some(2), 3, "C"),
        ];

        let forest = build_tree(&records);
        let root_names: Vec<&str> = forest.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(root_names, ["B", "A"]);
        let child_names: Vec<&str> = forest[0].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(child_names, ["C", "D"]);
    }

    #[test]
    fn test_position_ties_keep_input_order() {
        let records = vec![
            record(1, None, 0, "first"),
            record(2, None, 0, "second"),
            record(3, None, 0, "third"),
        ];

        let forest = build_tree(&records);
        let names: Vec<&str> = forest.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn test_dangling_parent_becomes_root() {
        let records = vec![record(1, None, 0, "A"), record(2, Some(99), 0, "Orphan")];

        let forest = build_tree(&records);
        assert_eq!(forest.len(), 2);
        assert!(forest.iter().any(|n| n.name == "Orphan"));
    }

    #[test]
    fn test_self_parent_becomes_root() {
        let records = vec![record(1, Some(1), 0, "Loop")];

        let forest = build_tree(&records);
        assert_eq!(forest.len(), 1);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_two_node_cycle_is_broken() {
        let records = vec![
            record(1, Some(2), 0, "A"),
            record(2, Some(1), 0, "B"),
            record(3, None, 0, "C"),
        ];

        let forest = build_tree(&records);
        // All three records survive and the output is a forest: the first
        // cycle member is promoted to a root with the other beneath it.
        assert_eq!(total_nodes(&forest), 3);
        let promoted = forest.iter().find(|n| n.name == "A").unwrap();
        assert_eq!(promoted.children.len(), 1);
        assert_eq!(promoted.children[0].name, "B");
    }

    #[test]
    fn test_three_node_cycle_is_broken() {
        let records = vec![
            record(1, Some(3), 0, "A"),
            record(2, Some(1), 0, "B"),
            record(3, Some(2), 0, "C"),
        ];

        let forest = build_tree(&records);
        assert_eq!(total_nodes(&forest), 3);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].name, "A");
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        // Two records share id 1; the child's parent reference resolves to
        // the later occurrence. Both records still produce nodes.
        let records = vec![
            record(1, None, 0, "old"),
            record(1, None, 1, "new"),
            record(2, Some(1), 0, "child"),
        ];

        let forest = build_tree(&records);
        assert_eq!(total_nodes(&forest), 3);
        let new = forest.iter().find(|n| n.name == "new").unwrap();
        assert_eq!(new.children.len(), 1);
        assert_eq!(new.children[0].name, "child");
        let old = forest.iter().find(|n| n.name == "old").unwrap();
        assert!(old.children.is_empty());
    }

    #[test]
    fn test_inactive_records_are_retained() {
        let mut inactive = record(1, None, 0, "Archived");
        inactive.is_active = false;
        let forest = build_tree(&[inactive]);
        assert_eq!(forest.len(), 1);
        assert!(!forest[0].is_active);
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let records = vec![
            record(1, None, 1, "A"),
            record(2, Some(1), 0, "B"),
            record(3, Some(1), 0, "C"),
            record(4, None, 0, "D"),
        ];
        assert_eq!(build_tree(&records), build_tree(&records));
    }

    #[test]
    fn test_plan_reorder_assigns_contiguous_positions() {
        let order = [CategoryId::new(7), CategoryId::new(3), CategoryId::new(9)];
        let plan = plan_reorder(&order);
        assert_eq!(
            plan,
            vec![
                (CategoryId::new(7), 0),
                (CategoryId::new(3), 1),
                (CategoryId::new(9), 2),
            ]
        );
    }

    #[test]
    fn test_plan_reorder_empty() {
        assert!(plan_reorder(&[]).is_empty());
    }
}
