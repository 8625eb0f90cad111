//! Integration tests for the full run orchestration.
//!
//! Exercises: start → tile advance → coin pickup → death/reset → game over
//! → leaderboard, across the queue, pools, lane graph, and ledger together.

use tilerun_core::engine::{EngineConfig, GameEvent, RunnerEngine};
use tilerun_core::entities::ItemKind;
use tilerun_core::player::PlayerLane;
use tilerun_logic::constants::{lanes, rules, tiles};

// ── Helpers ────────────────────────────────────────────────────────────

fn started(seed: u64) -> RunnerEngine {
    let mut engine = RunnerEngine::new(EngineConfig {
        seed,
        ..Default::default()
    });
    engine.start();
    engine
}

/// Every pool loan recorded on queued tiles must be active in its pool.
fn assert_loans_consistent(engine: &RunnerEngine) {
    let mut coins = 0usize;
    let mut obstacles = 0usize;
    for id in engine.queued_tiles() {
        for item in engine.tile(id).expect("queued tile must exist").pooled() {
            match item.kind {
                ItemKind::Coin => coins += 1,
                ItemKind::Obstacle => obstacles += 1,
            }
        }
    }
    assert_eq!(coins, engine.active_coin_count());
    assert_eq!(obstacles, engine.active_obstacle_count());
}

// ── Run lifecycle ──────────────────────────────────────────────────────

#[test]
fn run_starts_consistent() {
    let engine = started(42);
    assert_eq!(engine.tile_count(), 3 + tiles::NUM_INITIAL as usize);
    assert_eq!(engine.lane_count(), lanes::OFFSETS.len());
    assert_loans_consistent(&engine);
}

#[test]
fn advancing_tiles_keeps_loans_consistent() {
    let mut engine = started(42);
    for _ in 0..25 {
        engine.on_tile_crossed();
    }
    assert_loans_consistent(&engine);
    assert_eq!(engine.tile_count(), 3 + tiles::NUM_INITIAL as usize + 25);
}

#[test]
fn expiring_oldest_tiles_keeps_loans_consistent() {
    let mut engine = started(42);

    // Rolling window: each crossing spawns ahead and expires the oldest.
    for _ in 0..10 {
        engine.on_tile_crossed();
        let oldest = engine.queued_tiles()[0];
        engine.remove_tile(oldest);
    }
    assert_eq!(engine.tile_count(), 3 + tiles::NUM_INITIAL as usize);
    assert_loans_consistent(&engine);
}

#[test]
fn coin_pickups_score_and_rank() {
    let mut engine = started(42);

    // Pick up every coin currently on the strip.
    let coin_handles: Vec<_> = engine
        .queued_tiles()
        .into_iter()
        .flat_map(|id| engine.tile(id).unwrap().pooled().to_vec())
        .filter(|item| item.kind == ItemKind::Coin)
        .map(|item| item.handle)
        .collect();

    for handle in &coin_handles {
        engine.collect_coin(*handle);
    }

    let picked = coin_handles.len() as i32;
    assert_eq!(engine.total_coins(), picked);
    assert_eq!(engine.active_coin_count(), 0);

    // The ledger holds one entry per pickup, ranked descending.
    let top = engine.leaderboard(rules::LEADERBOARD_SIZE);
    assert_eq!(top.len(), (picked as usize).min(rules::LEADERBOARD_SIZE));
    if picked > 0 {
        assert_eq!(top[0].score, picked);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

#[test]
fn death_resets_but_keeps_score() {
    let mut engine = started(42);
    engine.add_coin();
    engine.add_coin();

    engine.player_died();
    assert_eq!(engine.lives(), rules::MAX_LIVES - 1);
    assert_eq!(engine.total_coins(), 2);
    assert_eq!(engine.tile_count(), 3 + tiles::NUM_INITIAL as usize);
    assert_loans_consistent(&engine);

    let events = engine.drain_events();
    assert!(events.contains(&GameEvent::LevelReset));
}

#[test]
fn full_run_to_game_over() {
    let mut engine = started(42);

    for life in 0..rules::MAX_LIVES {
        // Play a bit: advance, collect one coin if present.
        for _ in 0..5 {
            engine.on_tile_crossed();
        }
        let coin = engine
            .queued_tiles()
            .into_iter()
            .flat_map(|id| engine.tile(id).unwrap().pooled().to_vec())
            .find(|item| item.kind == ItemKind::Coin);
        if let Some(item) = coin {
            engine.collect_coin(item.handle);
        }

        engine.player_died();
        let expect_over = life + 1 == rules::MAX_LIVES;
        assert_eq!(engine.is_game_over(), expect_over);
    }

    assert_eq!(engine.lives(), 0);
    let events = engine.drain_events();
    assert!(events.contains(&GameEvent::GameOver));

    // Leaderboard reflects the run's pickups.
    let top = engine.leaderboard(rules::LEADERBOARD_SIZE);
    assert_eq!(top.len(), engine.total_coins().min(10) as usize);
}

// ── Lane blocking across spawn and pathfinding ─────────────────────────

#[test]
fn blocking_gates_both_spawning_and_paths() {
    let mut engine = started(42);
    engine.set_lane_blocked(lanes::CENTER, true);

    // New tiles never place items in the blocked lane...
    let center_y = engine.lane_positions()[lanes::CENTER as usize];
    for _ in 0..10 {
        let id = engine.on_tile_crossed();
        for item in engine.tile(id).unwrap().pooled().to_vec() {
            let placement = match item.kind {
                ItemKind::Coin => engine.coin(item.handle).unwrap().transform,
                ItemKind::Obstacle => engine.obstacle(item.handle).unwrap().transform,
            };
            assert_ne!(placement.location.y, center_y);
        }
    }

    // ...and pathfinding cannot cross it.
    assert_eq!(engine.find_optimal_lane(lanes::LEFT, lanes::RIGHT), lanes::LEFT);

    engine.set_lane_blocked(lanes::CENTER, false);
    assert_eq!(engine.find_optimal_lane(lanes::LEFT, lanes::RIGHT), lanes::CENTER);
}

// ── Player lane state against the engine's graph ───────────────────────

#[test]
fn player_switches_lanes_over_engine_positions() {
    let engine = started(42);
    let mut player = PlayerLane::new(lanes::CENTER);

    // Engine lane positions drive the interpolation.
    let graph_positions = engine.lane_positions().to_vec();

    let mut graph = tilerun_logic::lane_graph::LaneGraph::new();
    graph.initialize(&graph_positions);

    player.move_right(&graph);
    assert_eq!(player.next(), lanes::RIGHT);
    let halfway = player.change_lane_progress(&graph, 0.5);
    assert_eq!(halfway, (graph_positions[1] + graph_positions[2]) / 2.0);

    player.change_lane_finished();
    assert_eq!(player.current(), lanes::RIGHT);
}
