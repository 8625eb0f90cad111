//! Ordered score store for leaderboard queries, backed by a binary search
//! tree.
//!
//! Insertion keeps the tree ordered so ranked retrieval never needs a full
//! sort; equal scores chain into the right subtree rather than being merged
//! or rejected. The tree is not self-balancing: operations are O(log n)
//! average and O(n) against adversarial insertion order, which the scoring
//! workload (mostly increasing totals) never produces in practice.

use serde::{Deserialize, Serialize};

/// One recorded scoring event.
#[derive(Debug)]
pub struct ScoreNode {
    pub score: i32,
    pub player_name: String,
    left: Option<Box<ScoreNode>>,
    right: Option<Box<ScoreNode>>,
}

impl ScoreNode {
    fn new(score: i32, player_name: &str) -> Self {
        Self {
            score,
            player_name: player_name.to_string(),
            left: None,
            right: None,
        }
    }

    /// Detached copy of this node's entry, for display or persistence.
    pub fn entry(&self) -> ScoreEntry {
        ScoreEntry {
            score: self.score,
            player_name: self.player_name.clone(),
        }
    }
}

/// Owned snapshot of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: i32,
    pub player_name: String,
}

/// BST of (score, player) entries.
#[derive(Debug, Default)]
pub struct ScoreLedger {
    root: Option<Box<ScoreNode>>,
    node_count: usize,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a scoring event. Ties go right, so duplicates accumulate as a
    /// chain.
    pub fn insert(&mut self, score: i32, player_name: &str) {
        self.root = Some(Self::insert_recursive(self.root.take(), score, player_name));
        self.node_count += 1;
    }

    pub fn search(&self, score: i32) -> bool {
        Self::search_recursive(self.root.as_deref(), score)
    }

    /// Remove one node matching `score`: the first found by descent. Absent
    /// scores leave the ledger (and its count) untouched.
    pub fn delete(&mut self, score: i32) {
        let mut removed = false;
        self.root = Self::delete_recursive(self.root.take(), score, &mut removed);
        if removed {
            self.node_count -= 1;
        }
    }

    /// Ascending score order.
    pub fn in_order_traversal(&self) -> Vec<&ScoreNode> {
        let mut result = Vec::with_capacity(self.node_count);
        Self::in_order_recursive(self.root.as_deref(), &mut result);
        result
    }

    pub fn pre_order_traversal(&self) -> Vec<&ScoreNode> {
        let mut result = Vec::with_capacity(self.node_count);
        Self::pre_order_recursive(self.root.as_deref(), &mut result);
        result
    }

    pub fn post_order_traversal(&self) -> Vec<&ScoreNode> {
        let mut result = Vec::with_capacity(self.node_count);
        Self::post_order_recursive(self.root.as_deref(), &mut result);
        result
    }

    /// Up to `count` entries in descending score order: a full in-order
    /// traversal reversed and truncated, O(n) per call.
    pub fn top_scores(&self, count: usize) -> Vec<&ScoreNode> {
        self.in_order_traversal()
            .into_iter()
            .rev()
            .take(count)
            .collect()
    }

    /// Lowest stored score, or 0 on an empty ledger. 0 is not a failure
    /// signal; check [`ScoreLedger::is_empty`] first when 0 is a legal score.
    pub fn find_min(&self) -> i32 {
        match self.root.as_deref() {
            Some(root) => Self::min_node(root).score,
            None => 0,
        }
    }

    /// Highest stored score, or 0 on an empty ledger.
    pub fn find_max(&self) -> i32 {
        match self.root.as_deref() {
            Some(mut node) => {
                while let Some(right) = node.right.as_deref() {
                    node = right;
                }
                node.score
            }
            None => 0,
        }
    }

    pub fn height(&self) -> usize {
        Self::height_recursive(self.root.as_deref())
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drop every node and reset the count.
    pub fn clear(&mut self) {
        self.root = None;
        self.node_count = 0;
    }

    fn insert_recursive(
        node: Option<Box<ScoreNode>>,
        score: i32,
        player_name: &str,
    ) -> Box<ScoreNode> {
        match node {
            None => Box::new(ScoreNode::new(score, player_name)),
            Some(mut n) => {
                if score < n.score {
                    n.left = Some(Self::insert_recursive(n.left.take(), score, player_name));
                } else {
                    // Equal scores go right.
                    n.right = Some(Self::insert_recursive(n.right.take(), score, player_name));
                }
                n
            }
        }
    }

    fn search_recursive(node: Option<&ScoreNode>, score: i32) -> bool {
        match node {
            None => false,
            Some(n) => {
                if score == n.score {
                    true
                } else if score < n.score {
                    Self::search_recursive(n.left.as_deref(), score)
                } else {
                    Self::search_recursive(n.right.as_deref(), score)
                }
            }
        }
    }

    fn delete_recursive(
        node: Option<Box<ScoreNode>>,
        score: i32,
        removed: &mut bool,
    ) -> Option<Box<ScoreNode>> {
        let mut n = node?;

        if score < n.score {
            n.left = Self::delete_recursive(n.left.take(), score, removed);
            Some(n)
        } else if score > n.score {
            n.right = Self::delete_recursive(n.right.take(), score, removed);
            Some(n)
        } else {
            *removed = true;
            match (n.left.take(), n.right.take()) {
                // Leaf.
                (None, None) => None,
                // One child: splice it upward.
                (None, Some(right)) => Some(right),
                (Some(left), None) => Some(left),
                // Two children: copy the in-order successor up, then delete
                // the successor from the right subtree.
                (Some(left), Some(right)) => {
                    let successor = Self::min_node(&right).entry();
                    n.score = successor.score;
                    n.player_name = successor.player_name;
                    n.left = Some(left);
                    let mut successor_removed = false;
                    n.right =
                        Self::delete_recursive(Some(right), successor.score, &mut successor_removed);
                    Some(n)
                }
            }
        }
    }

    fn min_node(node: &ScoreNode) -> &ScoreNode {
        let mut current = node;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        current
    }

    fn in_order_recursive<'a>(node: Option<&'a ScoreNode>, result: &mut Vec<&'a ScoreNode>) {
        if let Some(n) = node {
            Self::in_order_recursive(n.left.as_deref(), result);
            result.push(n);
            Self::in_order_recursive(n.right.as_deref(), result);
        }
    }

    fn pre_order_recursive<'a>(node: Option<&'a ScoreNode>, result: &mut Vec<&'a ScoreNode>) {
        if let Some(n) = node {
            result.push(n);
            Self::pre_order_recursive(n.left.as_deref(), result);
            Self::pre_order_recursive(n.right.as_deref(), result);
        }
    }

    fn post_order_recursive<'a>(node: Option<&'a ScoreNode>, result: &mut Vec<&'a ScoreNode>) {
        if let Some(n) = node {
            Self::post_order_recursive(n.left.as_deref(), result);
            Self::post_order_recursive(n.right.as_deref(), result);
            result.push(n);
        }
    }

    fn height_recursive(node: Option<&ScoreNode>) -> usize {
        match node {
            None => 0,
            Some(n) => {
                1 + Self::height_recursive(n.left.as_deref())
                    .max(Self::height_recursive(n.right.as_deref()))
            }
        }
    }
}
