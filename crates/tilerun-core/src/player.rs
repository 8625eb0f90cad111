//! Pure lane-change state for the run character.
//!
//! Input handling, animation, and collision live in the presentation layer;
//! this tracks only which lane the player occupies and the interpolation
//! between lanes during a switch.

use tilerun_logic::lane_graph::LaneGraph;

/// Current/next lane pair. `current != next` while a switch is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerLane {
    current: u32,
    next: u32,
}

impl PlayerLane {
    /// Start in the given lane (the center lane in the usual 3-lane setup).
    pub fn new(start_lane: u32) -> Self {
        Self {
            current: start_lane,
            next: start_lane,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn next(&self) -> u32 {
        self.next
    }

    pub fn is_changing(&self) -> bool {
        self.current != self.next
    }

    /// Begin moving one lane left, clamped at the leftmost lane.
    pub fn move_left(&mut self, graph: &LaneGraph) {
        self.next = self.current.saturating_sub(1);
        debug_assert!(graph.is_valid_lane(self.next) || graph.num_lanes() == 0);
    }

    /// Begin moving one lane right, clamped at the rightmost lane.
    pub fn move_right(&mut self, graph: &LaneGraph) {
        let last = graph.num_lanes().saturating_sub(1) as u32;
        self.next = (self.current + 1).min(last);
    }

    /// Lateral position at interpolation factor `t` in [0, 1] of the switch
    /// from the current to the next lane. Unknown lanes hold the current
    /// position at 0.0.
    pub fn change_lane_progress(&self, graph: &LaneGraph, t: f32) -> f32 {
        let from = graph.lane_position(self.current).unwrap_or(0.0);
        let to = graph.lane_position(self.next).unwrap_or(from);
        lerp(from, to, t.clamp(0.0, 1.0))
    }

    /// Commit the switch: the next lane becomes current.
    pub fn change_lane_finished(&mut self) {
        self.current = self.next;
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_lanes() -> LaneGraph {
        let mut graph = LaneGraph::new();
        graph.initialize(&[-200.0, 0.0, 200.0]);
        graph
    }

    #[test]
    fn test_move_left_and_commit() {
        let graph = three_lanes();
        let mut player = PlayerLane::new(1);

        player.move_left(&graph);
        assert!(player.is_changing());
        assert_eq!(player.next(), 0);

        player.change_lane_finished();
        assert_eq!(player.current(), 0);
        assert!(!player.is_changing());
    }

    #[test]
    fn test_clamped_at_edges() {
        let graph = three_lanes();

        let mut player = PlayerLane::new(0);
        player.move_left(&graph);
        assert_eq!(player.next(), 0);

        let mut player = PlayerLane::new(2);
        player.move_right(&graph);
        assert_eq!(player.next(), 2);
    }

    #[test]
    fn test_change_lane_progress_lerps() {
        let graph = three_lanes();
        let mut player = PlayerLane::new(1);
        player.move_right(&graph);

        assert_eq!(player.change_lane_progress(&graph, 0.0), 0.0);
        assert_eq!(player.change_lane_progress(&graph, 0.5), 100.0);
        assert_eq!(player.change_lane_progress(&graph, 1.0), 200.0);
        // Out-of-range factors clamp.
        assert_eq!(player.change_lane_progress(&graph, 1.5), 200.0);
    }

    #[test]
    fn test_progress_holds_when_not_changing() {
        let graph = three_lanes();
        let player = PlayerLane::new(2);
        assert_eq!(player.change_lane_progress(&graph, 0.7), 200.0);
    }
}
