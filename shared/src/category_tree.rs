//! In-memory category forest.
//!
//! The API sends a nested tree where each parent owns its children by value.
//! [`CategoryForest`] flattens that snapshot into an arena: entries live in one
//! `Vec`, links between them are slot indices, and an id index gives O(1)
//! lookup. A forest is built once per fetch and replaced wholesale on the next
//! one; it is never patched in place.

use crate::{CategoryNode, CategoryType};
use log::debug;
use std::collections::HashMap;
use thiserror::Error;

/// Reasons a snapshot cannot be turned into a forest
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("category {0} appears more than once in the tree")]
    DuplicateId(i64),
    #[error("category {child} does not match the type of its parent {parent}")]
    TypeMismatch { parent: i64, child: i64 },
}

/// A node of the arena. Links are slots into [`CategoryForest::entries`].
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEntry {
    pub id: i64,
    pub category_type: CategoryType,
    pub name: String,
    pub sort_order: i64,
    pub is_active: bool,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl CategoryEntry {
    /// True when the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// One row of a leaf picker, in pre-order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOption {
    pub id: i64,
    pub label: String,
    pub depth: usize,
    /// Only active leaves may be attached to a transaction
    pub selectable: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryForest {
    entries: Vec<CategoryEntry>,
    index: HashMap<i64, usize>,
    roots: Vec<usize>,
}

impl CategoryForest {
    /// Build the arena from a nested snapshot, preserving sibling order
    pub fn from_snapshot(nodes: &[CategoryNode]) -> Result<Self, TreeError> {
        let mut forest = CategoryForest::default();
        for node in nodes {
            let slot = forest.insert(node, None)?;
            forest.roots.push(slot);
        }
        Ok(forest)
    }

    fn insert(&mut self, node: &CategoryNode, parent: Option<usize>) -> Result<usize, TreeError> {
        if self.index.contains_key(&node.id) {
            return Err(TreeError::DuplicateId(node.id));
        }
        if let Some(parent_slot) = parent {
            let parent_entry = &self.entries[parent_slot];
            if parent_entry.category_type != node.category_type {
                return Err(TreeError::TypeMismatch {
                    parent: parent_entry.id,
                    child: node.id,
                });
            }
        }

        let slot = self.entries.len();
        self.entries.push(CategoryEntry {
            id: node.id,
            category_type: node.category_type,
            name: node.name.clone(),
            sort_order: node.sort_order,
            is_active: node.is_active,
            parent,
            children: Vec::with_capacity(node.children.len()),
        });
        self.index.insert(node.id, slot);

        for child in &node.children {
            let child_slot = self.insert(child, Some(slot))?;
            self.entries[slot].children.push(child_slot);
        }

        if node.is_leaf != node.children.is_empty() {
            debug!(
                "category {} reports is_leaf={} but has {} children",
                node.id,
                node.is_leaf,
                node.children.len()
            );
        }

        Ok(slot)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn find_node(&self, id: i64) -> Option<&CategoryEntry> {
        self.index.get(&id).map(|&slot| &self.entries[slot])
    }

    /// Ids from a root down to `id`, inclusive
    pub fn find_path(&self, id: i64) -> Option<Vec<i64>> {
        let mut slot = *self.index.get(&id)?;
        let mut path = vec![self.entries[slot].id];
        while let Some(parent) = self.entries[slot].parent {
            path.push(self.entries[parent].id);
            slot = parent;
        }
        path.reverse();
        Some(path)
    }

    /// True iff `id` is `node_id` or lies in its subtree
    pub fn contains_id(&self, node_id: i64, id: i64) -> bool {
        let Some(&ancestor) = self.index.get(&node_id) else {
            return false;
        };
        let Some(mut slot) = self.index.get(&id).copied() else {
            return false;
        };
        loop {
            if slot == ancestor {
                return true;
            }
            match self.entries[slot].parent {
                Some(parent) => slot = parent,
                None => return false,
            }
        }
    }

    pub fn parent_id(&self, id: i64) -> Option<i64> {
        let slot = *self.index.get(&id)?;
        self.entries[slot].parent.map(|p| self.entries[p].id)
    }

    /// Parent (`None` for roots) and the node's index among its siblings
    pub fn position_of(&self, id: i64) -> Option<(Option<i64>, usize)> {
        let slot = *self.index.get(&id)?;
        let parent = self.entries[slot].parent;
        let siblings = match parent {
            Some(p) => &self.entries[p].children,
            None => &self.roots,
        };
        let index = siblings.iter().position(|&s| s == slot)?;
        Some((parent.map(|p| self.entries[p].id), index))
    }

    /// Number of children of `parent`, or of roots when `parent` is `None`
    pub fn child_count(&self, parent: Option<i64>) -> usize {
        match parent {
            Some(id) => self.find_node(id).map_or(0, CategoryEntry::child_count),
            None => self.roots.len(),
        }
    }

    pub fn roots(&self) -> impl Iterator<Item = &CategoryEntry> + '_ {
        self.roots.iter().map(move |&slot| &self.entries[slot])
    }

    pub fn children_of(&self, id: i64) -> impl Iterator<Item = &CategoryEntry> + '_ {
        let children: &[usize] = match self.index.get(&id) {
            Some(&slot) => &self.entries[slot].children,
            None => &[],
        };
        children.iter().map(move |&slot| &self.entries[slot])
    }

    /// The ancestor whose parent is a root, i.e. the second element of the path
    pub fn top_level_ancestor(&self, id: i64) -> Option<i64> {
        self.find_path(id).and_then(|path| path.get(1).copied())
    }

    /// True when the node's parent is a forest root
    pub fn is_top_level(&self, id: i64) -> bool {
        self.find_path(id).is_some_and(|path| path.len() == 2)
    }

    /// "Root/Child/Leaf"
    pub fn path_names(&self, id: i64) -> Option<String> {
        let path = self.find_path(id)?;
        let names: Vec<&str> = path
            .iter()
            .filter_map(|pid| self.find_node(*pid))
            .map(|entry| entry.name.as_str())
            .collect();
        Some(names.join("/"))
    }

    /// Id to slash-joined name path for every node
    pub fn path_map(&self) -> HashMap<i64, String> {
        let mut map = HashMap::with_capacity(self.entries.len());
        let mut stack: Vec<(usize, String)> = self
            .roots
            .iter()
            .rev()
            .map(|&slot| (slot, self.entries[slot].name.clone()))
            .collect();

        while let Some((slot, path)) = stack.pop() {
            let entry = &self.entries[slot];
            for &child in entry.children.iter().rev() {
                stack.push((child, format!("{}/{}", path, self.entries[child].name)));
            }
            map.insert(entry.id, path);
        }
        map
    }

    /// Every node in display order with its depth, for tree pickers
    pub fn leaf_options(&self) -> Vec<CategoryOption> {
        let mut options = Vec::with_capacity(self.entries.len());
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&s| (s, 0)).collect();

        while let Some((slot, depth)) = stack.pop() {
            let entry = &self.entries[slot];
            let label = if entry.is_active {
                entry.name.clone()
            } else {
                format!("{} (inactive)", entry.name)
            };
            options.push(CategoryOption {
                id: entry.id,
                label,
                depth,
                selectable: entry.is_active && entry.is_leaf(),
            });
            for &child in entry.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        options
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{CategoryNode, CategoryType};

    pub fn node(id: i64, name: &str, children: Vec<CategoryNode>) -> CategoryNode {
        CategoryNode {
            id,
            category_type: CategoryType::Expense,
            name: name.to_string(),
            parent_id: None,
            sort_order: 0,
            is_active: true,
            is_leaf: children.is_empty(),
            children,
        }
    }

    /// Food(1) [Groceries(2), Dining(3) [Lunch(4), Dinner(5)], Snacks(6)], Transport(7) [Bus(8)]
    pub fn sample_forest() -> Vec<CategoryNode> {
        vec![
            node(
                1,
                "Food",
                vec![
                    node(2, "Groceries", vec![]),
                    node(3, "Dining", vec![node(4, "Lunch", vec![]), node(5, "Dinner", vec![])]),
                    node(6, "Snacks", vec![]),
                ],
            ),
            node(7, "Transport", vec![node(8, "Bus", vec![])]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{node, sample_forest};
    use super::*;

    fn forest() -> CategoryForest {
        CategoryForest::from_snapshot(&sample_forest()).unwrap()
    }

    #[test]
    fn test_find_node_returns_each_node_or_none() {
        let forest = forest();
        for id in 1..=8 {
            assert_eq!(forest.find_node(id).map(|e| e.id), Some(id));
        }
        assert!(forest.find_node(99).is_none());
        assert_eq!(forest.find_node(4).unwrap().name, "Lunch");
    }

    #[test]
    fn test_find_path_walks_from_root() {
        let forest = forest();
        assert_eq!(forest.find_path(5), Some(vec![1, 3, 5]));
        assert_eq!(forest.find_path(7), Some(vec![7]));
        assert_eq!(forest.find_path(42), None);
    }

    #[test]
    fn test_contains_id_covers_whole_subtree_only() {
        let forest = forest();
        for id in [1, 2, 3, 4, 5, 6] {
            assert!(forest.contains_id(1, id), "1 should contain {}", id);
        }
        assert!(!forest.contains_id(1, 7));
        assert!(!forest.contains_id(1, 8));
        assert!(forest.contains_id(3, 3));
        assert!(!forest.contains_id(3, 2));
        assert!(!forest.contains_id(4, 3));
        assert!(!forest.contains_id(99, 1));
        assert!(!forest.contains_id(1, 99));
    }

    #[test]
    fn test_position_of_reports_parent_and_sibling_index() {
        let forest = forest();
        assert_eq!(forest.position_of(6), Some((Some(1), 2)));
        assert_eq!(forest.position_of(7), Some((None, 1)));
        assert_eq!(forest.position_of(5), Some((Some(3), 1)));
        assert_eq!(forest.position_of(100), None);
    }

    #[test]
    fn test_child_count_for_roots_and_nodes() {
        let forest = forest();
        assert_eq!(forest.child_count(None), 2);
        assert_eq!(forest.child_count(Some(1)), 3);
        assert_eq!(forest.child_count(Some(2)), 0);
        assert_eq!(forest.child_count(Some(404)), 0);
    }

    #[test]
    fn test_top_level_ancestor() {
        let forest = forest();
        assert_eq!(forest.top_level_ancestor(5), Some(3));
        assert_eq!(forest.top_level_ancestor(3), Some(3));
        assert_eq!(forest.top_level_ancestor(1), None);
        assert!(forest.is_top_level(2));
        assert!(!forest.is_top_level(1));
        assert!(!forest.is_top_level(4));
    }

    #[test]
    fn test_path_names_and_map_agree() {
        let forest = forest();
        let map = forest.path_map();
        assert_eq!(map.len(), 8);
        assert_eq!(map.get(&5).map(String::as_str), Some("Food/Dining/Dinner"));
        assert_eq!(forest.path_names(8).as_deref(), Some("Transport/Bus"));
        for id in 1..=8 {
            assert_eq!(map.get(&id).cloned(), forest.path_names(id));
        }
    }

    #[test]
    fn test_leaf_options_are_preorder_with_depth() {
        let mut snapshot = sample_forest();
        snapshot[0].children[0].is_active = false;
        let forest = CategoryForest::from_snapshot(&snapshot).unwrap();

        let options = forest.leaf_options();
        let ids: Vec<i64> = options.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(options[3].depth, 2);
        assert!(!options[0].selectable);
        assert!(!options[1].selectable);
        assert_eq!(options[1].label, "Groceries (inactive)");
        assert!(options[3].selectable);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let snapshot = vec![node(1, "A", vec![node(2, "B", vec![])]), node(2, "C", vec![])];
        assert_eq!(
            CategoryForest::from_snapshot(&snapshot),
            Err(TreeError::DuplicateId(2))
        );
    }

    #[test]
    fn test_subtree_type_must_match_parent() {
        let mut child = node(2, "Salary", vec![]);
        child.category_type = CategoryType::Income;
        let snapshot = vec![node(1, "Food", vec![child])];
        assert_eq!(
            CategoryForest::from_snapshot(&snapshot),
            Err(TreeError::TypeMismatch { parent: 1, child: 2 })
        );
    }

    #[test]
    fn test_leaf_is_derived_from_children() {
        let mut snapshot = sample_forest();
        snapshot[1].children[0].is_leaf = false;
        let forest = CategoryForest::from_snapshot(&snapshot).unwrap();
        assert!(forest.find_node(8).unwrap().is_leaf());
        assert!(!forest.find_node(3).unwrap().is_leaf());
    }

    #[test]
    fn test_empty_snapshot() {
        let forest = CategoryForest::from_snapshot(&[]).unwrap();
        assert!(forest.is_empty());
        assert_eq!(forest.roots().count(), 0);
        assert_eq!(forest.child_count(None), 0);
    }
}
