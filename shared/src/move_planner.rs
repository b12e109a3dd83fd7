//! Turns one drag-and-drop gesture in the category editor into a single move
//! instruction for `PATCH /config/categories/{id}/move`.
//!
//! The planner never touches the forest. The editor sends the intent and
//! re-fetches the tree afterwards.

use crate::category_tree::CategoryForest;
use crate::MoveCategoryRequest;
use log::{debug, warn};
use thiserror::Error;

/// Which side of the target row a gap drop lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapSide {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Dropped onto the node: become its last child
    Onto,
    /// Dropped between siblings, next to the node
    Gap(GapSide),
}

impl DropTarget {
    /// Classify a pointer position inside a row of height `height`: the top
    /// quarter is a gap before the row, the bottom quarter a gap after it and
    /// anything in between drops onto the row.
    pub fn from_pointer(offset_y: f64, height: f64) -> Self {
        if height <= 0.0 {
            return DropTarget::Onto;
        }
        let ratio = offset_y / height;
        if ratio < 0.25 {
            DropTarget::Gap(GapSide::Before)
        } else if ratio > 0.75 {
            DropTarget::Gap(GapSide::After)
        } else {
            DropTarget::Onto
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropGesture {
    pub drag_id: i64,
    pub drop_id: i64,
    pub target: DropTarget,
}

/// The single update the gesture produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub node_id: i64,
    pub parent_id: Option<i64>,
    pub index: usize,
}

impl MoveIntent {
    pub fn to_request(&self) -> MoveCategoryRequest {
        MoveCategoryRequest {
            parent_id: self.parent_id,
            index: self.index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("category {0} is not in the current tree")]
    UnknownNode(i64),
    #[error("a category cannot be moved onto itself or into its own subtree")]
    IntoOwnSubtree,
}

/// Compute the `(parent, index)` the dragged node should end up at
pub fn plan_move(forest: &CategoryForest, gesture: DropGesture) -> Result<MoveIntent, MoveRejection> {
    let DropGesture {
        drag_id,
        drop_id,
        target,
    } = gesture;

    let (current_parent, current_index) = forest
        .position_of(drag_id)
        .ok_or(MoveRejection::UnknownNode(drag_id))?;
    let (drop_parent, drop_index) = forest
        .position_of(drop_id)
        .ok_or(MoveRejection::UnknownNode(drop_id))?;

    if forest.contains_id(drag_id, drop_id) {
        warn!("rejected move of category {} onto {} inside its own subtree", drag_id, drop_id);
        return Err(MoveRejection::IntoOwnSubtree);
    }

    let intent = match target {
        DropTarget::Onto => MoveIntent {
            node_id: drag_id,
            parent_id: Some(drop_id),
            index: forest.child_count(Some(drop_id)),
        },
        DropTarget::Gap(side) => {
            if let Some(parent) = drop_parent {
                if forest.contains_id(drag_id, parent) {
                    warn!("rejected move of category {} under its descendant {}", drag_id, parent);
                    return Err(MoveRejection::IntoOwnSubtree);
                }
            }

            let raw_index = match side {
                GapSide::Before => drop_index,
                GapSide::After => drop_index + 1,
            };

            let same_parent = current_parent == drop_parent;
            let mut index = raw_index;
            if same_parent && current_index < raw_index {
                index -= 1;
            }

            let sibling_count = forest.child_count(drop_parent);
            let count_after_removal = if same_parent {
                sibling_count.saturating_sub(1)
            } else {
                sibling_count
            };

            MoveIntent {
                node_id: drag_id,
                parent_id: drop_parent,
                index: index.min(count_after_removal),
            }
        }
    };

    debug!(
        "planned move of category {} to parent {:?} at index {}",
        intent.node_id, intent.parent_id, intent.index
    );
    Ok(intent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category_tree::test_support::{node, sample_forest};

    fn forest() -> CategoryForest {
        CategoryForest::from_snapshot(&sample_forest()).unwrap()
    }

    /// Root(10) [A(11), B(12), C(13)]
    fn abc() -> CategoryForest {
        CategoryForest::from_snapshot(&[node(
            10,
            "Root",
            vec![node(11, "A", vec![]), node(12, "B", vec![]), node(13, "C", vec![])],
        )])
        .unwrap()
    }

    fn gesture(drag_id: i64, drop_id: i64, target: DropTarget) -> DropGesture {
        DropGesture {
            drag_id,
            drop_id,
            target,
        }
    }

    #[test]
    fn test_drop_onto_node_appends_as_last_child() {
        let forest = forest();
        let intent = plan_move(&forest, gesture(8, 1, DropTarget::Onto)).unwrap();
        assert_eq!(
            intent,
            MoveIntent {
                node_id: 8,
                parent_id: Some(1),
                index: 3
            }
        );
    }

    #[test]
    fn test_drop_onto_leaf_uses_zero_index() {
        let forest = forest();
        let intent = plan_move(&forest, gesture(6, 2, DropTarget::Onto)).unwrap();
        assert_eq!(intent.parent_id, Some(2));
        assert_eq!(intent.index, 0);
    }

    #[test]
    fn test_drop_onto_uses_child_count_before_insertion() {
        let forest = forest();
        // Lunch is already a child of Dining; the index is still Dining's current count
        let intent = plan_move(&forest, gesture(4, 3, DropTarget::Onto)).unwrap();
        assert_eq!(intent.index, 2);
    }

    #[test]
    fn test_self_and_descendant_targets_are_rejected_in_every_mode() {
        let forest = forest();
        let targets = [
            DropTarget::Onto,
            DropTarget::Gap(GapSide::Before),
            DropTarget::Gap(GapSide::After),
        ];
        for target in targets {
            for drop_id in [1, 2, 3, 4, 5, 6] {
                assert_eq!(
                    plan_move(&forest, gesture(1, drop_id, target)),
                    Err(MoveRejection::IntoOwnSubtree),
                    "drop {} {:?}",
                    drop_id,
                    target
                );
            }
            assert_eq!(
                plan_move(&forest, gesture(3, 5, target)),
                Err(MoveRejection::IntoOwnSubtree)
            );
        }
    }

    #[test]
    fn test_drag_first_after_last_sibling_corrects_index() {
        let forest = abc();
        let intent = plan_move(&forest, gesture(11, 13, DropTarget::Gap(GapSide::After))).unwrap();
        assert_eq!(intent.parent_id, Some(10));
        assert_eq!(intent.index, 2);
    }

    #[test]
    fn test_drag_last_before_first_sibling_keeps_index() {
        let forest = abc();
        let intent = plan_move(&forest, gesture(13, 11, DropTarget::Gap(GapSide::Before))).unwrap();
        assert_eq!(intent.index, 0);
    }

    #[test]
    fn test_drag_first_before_last_sibling() {
        let forest = abc();
        // [A, B, C] -> remove A -> [B, C], insert before C -> index 1
        let intent = plan_move(&forest, gesture(11, 13, DropTarget::Gap(GapSide::Before))).unwrap();
        assert_eq!(intent.index, 1);
    }

    #[test]
    fn test_gap_drop_into_other_parent_has_no_shift() {
        let forest = forest();
        // Bus after Groceries under Food: [Groceries, Bus, Dining, Snacks]
        let intent = plan_move(&forest, gesture(8, 2, DropTarget::Gap(GapSide::After))).unwrap();
        assert_eq!(intent.parent_id, Some(1));
        assert_eq!(intent.index, 1);

        let intent = plan_move(&forest, gesture(8, 6, DropTarget::Gap(GapSide::After))).unwrap();
        assert_eq!(intent.index, 3);
    }

    #[test]
    fn test_gap_drop_next_to_root_moves_to_root_level() {
        let forest = forest();
        let intent = plan_move(&forest, gesture(3, 7, DropTarget::Gap(GapSide::After))).unwrap();
        assert_eq!(intent.parent_id, None);
        assert_eq!(intent.index, 2);
    }

    #[test]
    fn test_reordering_roots_applies_same_parent_shift() {
        let forest = forest();
        let intent = plan_move(&forest, gesture(1, 7, DropTarget::Gap(GapSide::After))).unwrap();
        assert_eq!(intent.parent_id, None);
        assert_eq!(intent.index, 1);
    }

    #[test]
    fn test_index_never_exceeds_sibling_count() {
        let forest = abc();
        for drag in [11, 12, 13] {
            for drop in [11, 12, 13] {
                if drag == drop {
                    continue;
                }
                for side in [GapSide::Before, GapSide::After] {
                    let intent = plan_move(&forest, gesture(drag, drop, DropTarget::Gap(side))).unwrap();
                    assert!(intent.index <= 2, "{} -> {} {:?}", drag, drop, side);
                }
            }
        }
    }

    #[test]
    fn test_unknown_nodes_are_rejected() {
        let forest = forest();
        assert_eq!(
            plan_move(&forest, gesture(99, 1, DropTarget::Onto)),
            Err(MoveRejection::UnknownNode(99))
        );
        assert_eq!(
            plan_move(&forest, gesture(1, 99, DropTarget::Onto)),
            Err(MoveRejection::UnknownNode(99))
        );
    }

    #[test]
    fn test_intent_becomes_move_request() {
        let intent = MoveIntent {
            node_id: 4,
            parent_id: Some(1),
            index: 2,
        };
        let request = intent.to_request();
        assert_eq!(request.parent_id, Some(1));
        assert_eq!(request.index, 2);
    }

    #[test]
    fn test_drop_target_from_pointer() {
        assert_eq!(DropTarget::from_pointer(2.0, 40.0), DropTarget::Gap(GapSide::Before));
        assert_eq!(DropTarget::from_pointer(20.0, 40.0), DropTarget::Onto);
        assert_eq!(DropTarget::from_pointer(38.0, 40.0), DropTarget::Gap(GapSide::After));
        assert_eq!(DropTarget::from_pointer(5.0, 0.0), DropTarget::Onto);
    }
}
