use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::types::DocId;

/// Self-balancing numeric index. Nodes are keyed by value; the payload is
/// the list of internal ids whose field equals that value. Equal keys share
/// one node, so an id appears at most once per stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvlTree {
    root: Option<Box<AvlNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AvlNode {
    key: f64,
    ids: Vec<DocId>,
    height: i32,
    left: Option<Box<AvlNode>>,
    right: Option<Box<AvlNode>>,
}

impl AvlTree {
    pub fn new() -> Self {
        AvlTree::default()
    }

    pub fn insert(&mut self, key: f64, id: DocId) {
        let root = self.root.take();
        self.root = Some(Self::insert_node(root, key, id));
    }

    pub fn find(&self, key: f64) -> Option<&[DocId]> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.total_cmp(&node.key) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.ids),
            }
        }
        None
    }

    /// Ids with key strictly above `key`, or above-or-equal when `inclusive`.
    pub fn greater_than(&self, key: f64, inclusive: bool) -> Vec<DocId> {
        let mut out = Vec::new();
        Self::collect_greater(self.root.as_deref(), key, inclusive, &mut out);
        out
    }

    /// Ids with key strictly below `key`, or below-or-equal when `inclusive`.
    pub fn less_than(&self, key: f64, inclusive: bool) -> Vec<DocId> {
        let mut out = Vec::new();
        Self::collect_less(self.root.as_deref(), key, inclusive, &mut out);
        out
    }

    /// Ids with key in `[min, max]`. An inverted range yields nothing.
    pub fn range(&self, min: f64, max: f64) -> Vec<DocId> {
        let mut out = Vec::new();
        if min > max {
            return out;
        }
        Self::collect_range(self.root.as_deref(), min, max, &mut out);
        out
    }

    /// Removes `id` from the node keyed `key`, deleting and rebalancing when
    /// the payload empties. Unknown keys and absent ids are no-ops.
    pub fn remove_document(&mut self, id: DocId, key: f64) {
        let root = self.root.take();
        self.root = Self::remove_id(root, key, id);
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn insert_node(node: Option<Box<AvlNode>>, key: f64, id: DocId) -> Box<AvlNode> {
        let Some(mut node) = node else {
            return Box::new(AvlNode {
                key,
                ids: vec![id],
                height: 1,
                left: None,
                right: None,
            });
        };

        match key.total_cmp(&node.key) {
            Ordering::Less => node.left = Some(Self::insert_node(node.left.take(), key, id)),
            Ordering::Greater => node.right = Some(Self::insert_node(node.right.take(), key, id)),
            Ordering::Equal => {
                // Ties append to the payload instead of growing the tree.
                if !node.ids.contains(&id) {
                    node.ids.push(id);
                }
                return node;
            }
        }
        Self::rebalance(node)
    }

    fn remove_id(node: Option<Box<AvlNode>>, key: f64, id: DocId) -> Option<Box<AvlNode>> {
        let mut node = node?;
        match key.total_cmp(&node.key) {
            Ordering::Less => node.left = Self::remove_id(node.left.take(), key, id),
            Ordering::Greater => node.right = Self::remove_id(node.right.take(), key, id),
            Ordering::Equal => {
                node.ids.retain(|existing| *existing != id);
                if !node.ids.is_empty() {
                    return Some(node);
                }
                return Self::remove_node(node);
            }
        }
        Some(Self::rebalance(node))
    }

    fn remove_node(mut node: Box<AvlNode>) -> Option<Box<AvlNode>> {
        match (node.left.take(), node.right.take()) {
            (None, None) => None,
            (Some(left), None) => Some(left),
            (None, Some(right)) => Some(right),
            (Some(left), Some(right)) => {
                // Replace with the in-order successor from the right subtree.
                let (successor_key, successor_ids, right) = Self::detach_min(right);
                node.key = successor_key;
                node.ids = successor_ids;
                node.left = Some(left);
                node.right = right;
                Some(Self::rebalance(node))
            }
        }
    }

    fn detach_min(mut node: Box<AvlNode>) -> (f64, Vec<DocId>, Option<Box<AvlNode>>) {
        match node.left.take() {
            None => (node.key, node.ids, node.right.take()),
            Some(left) => {
                let (key, ids, remaining) = Self::detach_min(left);
                node.left = remaining;
                (key, ids, Some(Self::rebalance(node)))
            }
        }
    }

    fn collect_greater(node: Option<&AvlNode>, key: f64, inclusive: bool, out: &mut Vec<DocId>) {
        let Some(node) = node else { return };
        let qualifies = match node.key.total_cmp(&key) {
            Ordering::Greater => true,
            Ordering::Equal => inclusive,
            Ordering::Less => false,
        };
        if qualifies {
            Self::collect_greater(node.left.as_deref(), key, inclusive, out);
            out.extend_from_slice(&node.ids);
            Self::collect_greater(node.right.as_deref(), key, inclusive, out);
        } else {
            // Everything to the left is smaller still.
            Self::collect_greater(node.right.as_deref(), key, inclusive, out);
        }
    }

    fn collect_less(node: Option<&AvlNode>, key: f64, inclusive: bool, out: &mut Vec<DocId>) {
        let Some(node) = node else { return };
        let qualifies = match node.key.total_cmp(&key) {
            Ordering::Less => true,
            Ordering::Equal => inclusive,
            Ordering::Greater => false,
        };
        if qualifies {
            Self::collect_less(node.left.as_deref(), key, inclusive, out);
            out.extend_from_slice(&node.ids);
            Self::collect_less(node.right.as_deref(), key, inclusive, out);
        } else {
            Self::collect_less(node.left.as_deref(), key, inclusive, out);
        }
    }

    fn collect_range(node: Option<&AvlNode>, min: f64, max: f64, out: &mut Vec<DocId>) {
        let Some(node) = node else { return };
        if node.key > min {
            Self::collect_range(node.left.as_deref(), min, max, out);
        }
        if node.key >= min && node.key <= max {
            out.extend_from_slice(&node.ids);
        }
        if node.key < max {
            Self::collect_range(node.right.as_deref(), min, max, out);
        }
    }

    fn height(node: &Option<Box<AvlNode>>) -> i32 {
        node.as_ref().map_or(0, |n| n.height)
    }

    fn update_height(node: &mut AvlNode) {
        node.height = 1 + Self::height(&node.left).max(Self::height(&node.right));
    }

    fn balance_factor(node: &AvlNode) -> i32 {
        Self::height(&node.left) - Self::height(&node.right)
    }

    fn rebalance(mut node: Box<AvlNode>) -> Box<AvlNode> {
        Self::update_height(&mut node);
        let balance = Self::balance_factor(&node);

        if balance > 1 {
            let left = node.left.as_ref().unwrap();
            if Self::balance_factor(left) < 0 {
                let rotated = Self::rotate_left(node.left.take().unwrap());
                node.left = Some(rotated);
            }
            return Self::rotate_right(node);
        }
        if balance < -1 {
            let right = node.right.as_ref().unwrap();
            if Self::balance_factor(right) > 0 {
                let rotated = Self::rotate_right(node.right.take().unwrap());
                node.right = Some(rotated);
            }
            return Self::rotate_left(node);
        }
        node
    }

    fn rotate_left(mut node: Box<AvlNode>) -> Box<AvlNode> {
        let mut pivot = node.right.take().unwrap();
        node.right = pivot.left.take();
        Self::update_height(&mut node);
        pivot.left = Some(node);
        Self::update_height(&mut pivot);
        pivot
    }

    fn rotate_right(mut node: Box<AvlNode>) -> Box<AvlNode> {
        let mut pivot = node.left.take().unwrap();
        node.left = pivot.right.take();
        Self::update_height(&mut node);
        pivot.right = Some(node);
        Self::update_height(&mut pivot);
        pivot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &[f64]) -> AvlTree {
        let mut tree = AvlTree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.insert(*key, DocId(i as u64 + 1));
        }
        tree
    }

    fn values(ids: Vec<DocId>) -> Vec<u64> {
        let mut out: Vec<u64> = ids.into_iter().map(|id| id.0).collect();
        out.sort_unstable();
        out
    }

    fn assert_balanced(node: Option<&AvlNode>) -> i32 {
        let Some(node) = node else { return 0 };
        let left = assert_balanced(node.left.as_deref());
        let right = assert_balanced(node.right.as_deref());
        assert!((left - right).abs() <= 1, "unbalanced at key {}", node.key);
        assert_eq!(node.height, 1 + left.max(right));
        1 + left.max(right)
    }

    #[test]
    fn test_ascending_inserts_stay_balanced() {
        let mut tree = AvlTree::new();
        for i in 0..128 {
            tree.insert(i as f64, DocId(i + 1));
        }
        let height = assert_balanced(tree.root.as_deref());
        // 128 nodes fit in height 8 when perfectly balanced; AVL allows ~1.44x.
        assert!(height <= 10, "height {}", height);
    }

    #[test]
    fn test_equal_keys_share_a_node() {
        let mut tree = AvlTree::new();
        tree.insert(5.0, DocId(1));
        tree.insert(5.0, DocId(2));
        tree.insert(5.0, DocId(2));

        assert_eq!(values(tree.find(5.0).unwrap().to_vec()), vec![1, 2]);
    }

    #[test]
    fn test_range_is_inclusive_of_both_endpoints() {
        let tree = tree_of(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(values(tree.range(20.0, 40.0)), vec![2, 3, 4]);
        assert_eq!(values(tree.range(15.0, 35.0)), vec![2, 3]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let tree = tree_of(&[10.0, 20.0, 30.0]);
        assert!(tree.range(30.0, 10.0).is_empty());
    }

    #[test]
    fn test_half_open_traversals() {
        let tree = tree_of(&[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(values(tree.greater_than(20.0, false)), vec![3, 4]);
        assert_eq!(values(tree.greater_than(20.0, true)), vec![2, 3, 4]);
        assert_eq!(values(tree.less_than(30.0, false)), vec![1, 2]);
        assert_eq!(values(tree.less_than(30.0, true)), vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_deletes_node_once_payload_empties() {
        let mut tree = AvlTree::new();
        tree.insert(7.0, DocId(1));
        tree.insert(7.0, DocId(2));

        tree.remove_document(DocId(1), 7.0);
        assert_eq!(values(tree.find(7.0).unwrap().to_vec()), vec![2]);

        tree.remove_document(DocId(2), 7.0);
        assert!(tree.find(7.0).is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_rebalances() {
        let mut tree = AvlTree::new();
        for i in 0..64 {
            tree.insert(i as f64, DocId(i + 1));
        }
        for i in 0..32 {
            tree.remove_document(DocId(i + 1), i as f64);
        }
        assert_balanced(tree.root.as_deref());
        assert_eq!(values(tree.greater_than(-1.0, false)).len(), 32);
    }

    #[test]
    fn test_removing_unknown_key_is_a_no_op() {
        let mut tree = tree_of(&[1.0, 2.0]);
        tree.remove_document(DocId(9), 99.0);
        assert_eq!(values(tree.range(0.0, 10.0)), vec![1, 2]);
    }
}
