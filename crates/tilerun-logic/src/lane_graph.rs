//! Adjacency-list graph over the lane topology, with BFS/DFS pathfinding.
//!
//! Lanes form a small fixed chain (left/center/right in the usual setup).
//! Each lane is a node holding its world offset, a blocked flag, and the ids
//! of its neighbors; edges exist only between index-adjacent lanes. Blocking
//! a lane never removes edges, it only makes the lane ineligible for
//! traversal.

use std::collections::{HashMap, HashSet, VecDeque};

/// One lane of the track.
#[derive(Debug, Clone)]
pub struct LaneNode {
    pub lane_id: u32,
    /// Lateral world-space offset of this lane.
    pub position: f32,
    /// Adjacent lane ids, in insertion order. Directed; undirected adjacency
    /// is stored as an edge pair.
    pub neighbors: Vec<u32>,
    pub blocked: bool,
}

impl LaneNode {
    fn new(lane_id: u32, position: f32) -> Self {
        Self {
            lane_id,
            position,
            neighbors: Vec::new(),
            blocked: false,
        }
    }
}

/// Lane topology with blocking-aware path search.
#[derive(Debug, Clone, Default)]
pub struct LaneGraph {
    nodes: HashMap<u32, LaneNode>,
    num_lanes: usize,
}

impl LaneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one node per position (lane id = index) and wire edges between
    /// index-adjacent lanes only. Re-initializing replaces the whole node
    /// set, which also clears any blocked flags.
    pub fn initialize(&mut self, lane_positions: &[f32]) {
        self.nodes.clear();
        self.num_lanes = lane_positions.len();

        for (i, &position) in lane_positions.iter().enumerate() {
            let id = i as u32;
            self.nodes.insert(id, LaneNode::new(id, position));
        }

        for i in 1..lane_positions.len() {
            let (a, b) = ((i - 1) as u32, i as u32);
            self.add_edge(a, b);
            self.add_edge(b, a);
        }
    }

    /// Add a directed edge. Duplicate edges are ignored; unknown `from` is a
    /// no-op.
    pub fn add_edge(&mut self, from: u32, to: u32) {
        if let Some(node) = self.nodes.get_mut(&from) {
            if !node.neighbors.contains(&to) {
                node.neighbors.push(to);
            }
        }
    }

    /// Remove a directed edge, if present.
    pub fn remove_edge(&mut self, from: u32, to: u32) {
        if let Some(node) = self.nodes.get_mut(&from) {
            node.neighbors.retain(|&n| n != to);
        }
    }

    pub fn set_lane_blocked(&mut self, lane_id: u32, blocked: bool) {
        if let Some(node) = self.nodes.get_mut(&lane_id) {
            node.blocked = blocked;
        }
    }

    /// Unknown lanes read as blocked: an id outside the node set is
    /// impassable rather than an error.
    pub fn is_lane_blocked(&self, lane_id: u32) -> bool {
        self.nodes.get(&lane_id).map(|n| n.blocked).unwrap_or(true)
    }

    pub fn lane_position(&self, lane_id: u32) -> Option<f32> {
        self.nodes.get(&lane_id).map(|n| n.position)
    }

    pub fn is_valid_lane(&self, lane_id: u32) -> bool {
        self.nodes.contains_key(&lane_id)
    }

    pub fn neighbors(&self, lane_id: u32) -> &[u32] {
        self.nodes
            .get(&lane_id)
            .map(|n| n.neighbors.as_slice())
            .unwrap_or(&[])
    }

    pub fn num_lanes(&self) -> usize {
        self.num_lanes
    }

    /// Breadth-first search over unblocked neighbors.
    ///
    /// Returns the shortest lane-id sequence from `start` to `target`
    /// inclusive, or an empty sequence if unreachable or either endpoint is
    /// invalid. Among equal-length paths the one discovered first in
    /// adjacency order wins.
    ///
    /// The dequeued origin is tested against the target before its blocked
    /// flag is consulted, so a blocked start still matches itself; blocked
    /// nodes are never enqueued as destinations. This differs from
    /// [`LaneGraph::dfs_find_path`], which rejects a blocked start outright.
    pub fn bfs_find_path(&self, start: u32, target: u32) -> Vec<u32> {
        if !self.is_valid_lane(start) || !self.is_valid_lane(target) {
            return Vec::new();
        }

        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        let mut parent: HashMap<u32, Option<u32>> = HashMap::new();

        queue.push_back(start);
        visited.insert(start);
        parent.insert(start, None);

        let mut found = false;
        while let Some(current) = queue.pop_front() {
            if current == target {
                found = true;
                break;
            }

            let node = &self.nodes[&current];
            if node.blocked {
                continue;
            }

            for &neighbor in &node.neighbors {
                if !visited.contains(&neighbor) && !self.is_lane_blocked(neighbor) {
                    visited.insert(neighbor);
                    parent.insert(neighbor, Some(current));
                    queue.push_back(neighbor);
                }
            }
        }

        if !found {
            return Vec::new();
        }

        // Walk the parent chain back from the target.
        let mut path = vec![target];
        let mut current = target;
        while let Some(&Some(prev)) = parent.get(&current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }

    /// Depth-first search with backtracking.
    ///
    /// Returns the first path found visiting neighbors in adjacency order;
    /// empty on failure. A blocked current node, including the start, aborts
    /// its branch on entry.
    pub fn dfs_find_path(&self, start: u32, target: u32) -> Vec<u32> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();

        if self.dfs_recursive(start, target, &mut visited, &mut path) {
            path
        } else {
            Vec::new()
        }
    }

    /// BFS finds the shortest path by edge count in an unweighted graph.
    pub fn find_shortest_path(&self, start: u32, target: u32) -> Vec<u32> {
        self.bfs_find_path(start, target)
    }

    fn dfs_recursive(
        &self,
        current: u32,
        target: u32,
        visited: &mut HashSet<u32>,
        path: &mut Vec<u32>,
    ) -> bool {
        if !self.is_valid_lane(current) || self.is_lane_blocked(current) {
            return false;
        }

        visited.insert(current);
        path.push(current);

        if current == target {
            return true;
        }

        for &neighbor in self.neighbors(current) {
            if !visited.contains(&neighbor)
                && self.dfs_recursive(neighbor, target, visited, path)
            {
                return true;
            }
        }

        path.pop();
        false
    }
}
