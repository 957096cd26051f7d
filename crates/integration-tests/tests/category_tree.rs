//! Category tree behaviour across the builder and the reorder planner.

#![allow(clippy::unwrap_used)]

use anara_core::catalog::{CategoryNode, CategoryRecord, build_tree, plan_reorder};
use anara_core::types::CategoryId;

fn record(id: i32, parent: Option<i32>, position: i32, name: &str) -> CategoryRecord {
    CategoryRecord {
        id: CategoryId::new(id),
        name: name.to_owned(),
        slug: name.to_lowercase().replace(' ', "-"),
        parent_id: parent.map(CategoryId::new),
        position,
        is_active: true,
    }
}

fn total_nodes(forest: &[CategoryNode]) -> usize {
    forest.iter().map(CategoryNode::subtree_len).sum()
}

// =============================================================================
// Completeness and ordering
// =============================================================================

#[test]
fn test_root_with_children_ordered_by_position() {
    // Root "A" with children at positions 1 and 0: children come back
    // position-ordered ["C", "B"].
    let records = vec![
        record(1, None, 0, "A"),
        record(2, Some(1), 1, "B"),
        record(3, Some(1), 0, "C"),
    ];

    let forest = build_tree(&records);
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].name, "A");
    let names: Vec<&str> = forest[0].children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["C", "B"]);
}

#[test]
fn test_every_record_lands_exactly_once() {
    // A three-level catalog with interleaved input order.
    let records = vec![
        record(10, Some(1), 0, "Silk"),
        record(1, None, 1, "Sarees"),
        record(11, Some(1), 1, "Cotton"),
        record(2, None, 0, "Lehengas"),
        record(20, Some(2), 0, "Bridal"),
        record(100, Some(10), 0, "Kanjivaram"),
        record(101, Some(10), 1, "Banarasi"),
    ];

    let forest = build_tree(&records);
    assert_eq!(total_nodes(&forest), records.len());

    let roots: Vec<&str> = forest.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(roots, ["Lehengas", "Sarees"]);
}

#[test]
fn test_dangling_parent_defaults_to_root() {
    let records = vec![
        record(1, None, 0, "Sarees"),
        record(2, Some(404), 0, "Orphan"),
    ];

    let forest = build_tree(&records);
    assert_eq!(forest.len(), 2);
    assert_eq!(total_nodes(&forest), 2);
}

#[test]
fn test_cycle_still_yields_complete_forest() {
    let records = vec![
        record(1, Some(2), 0, "A"),
        record(2, Some(1), 1, "B"),
        record(3, None, 2, "C"),
    ];

    let forest = build_tree(&records);
    assert_eq!(total_nodes(&forest), 3);
}

// =============================================================================
// Reorder round trip
// =============================================================================

/// Apply a reorder plan to a flat record list, the way the admin
/// repository applies it to the table.
fn apply_plan(records: &mut [CategoryRecord], plan: &[(CategoryId, i32)]) {
    for (id, position) in plan {
        if let Some(record) = records.iter_mut().find(|r| r.id == *id) {
            record.position = *position;
        }
    }
}

#[test]
fn test_reorder_plan_round_trips_through_rebuild() {
    let mut records = vec![
        record(1, None, 0, "Sarees"),
        record(2, Some(1), 0, "Silk"),
        record(3, Some(1), 1, "Cotton"),
        record(4, Some(1), 2, "Linen"),
    ];

    // Drag "Linen" to the front: desired order Linen, Silk, Cotton.
    let desired = [CategoryId::new(4), CategoryId::new(2), CategoryId::new(3)];
    apply_plan(&mut records, &plan_reorder(&desired));

    let forest = build_tree(&records);
    let names: Vec<&str> = forest[0].children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Linen", "Silk", "Cotton"]);
}

#[test]
fn test_partial_reorder_application_still_sorts_meaningfully() {
    let mut records = vec![
        record(1, None, 0, "Sarees"),
        record(2, Some(1), 0, "Silk"),
        record(3, Some(1), 1, "Cotton"),
        record(4, Some(1), 2, "Linen"),
    ];

    // Only the first write of the plan lands (simulated mid-batch failure):
    // Linen moves to position 0, the rest keep their old positions.
    let desired = [CategoryId::new(4), CategoryId::new(2), CategoryId::new(3)];
    let plan = plan_reorder(&desired);
    apply_plan(&mut records, &plan[..1]);

    let forest = build_tree(&records);
    let names: Vec<&str> = forest[0].children.iter().map(|c| c.name.as_str()).collect();
    // Positions: Linen 0, Silk 0, Cotton 1 - ties break by input order.
    assert_eq!(names, ["Silk", "Linen", "Cotton"]);
}
