//! Tilerun Headless Validation Harness
//!
//! Sweeps the core engines and the orchestrator without any game engine,
//! rendering, or I/O beyond stdout.
//!
//! Usage:
//!   cargo run -p tilerun-simtest
//!   cargo run -p tilerun-simtest -- --verbose

use serde::Deserialize;

use tilerun_core::engine::{EngineConfig, GameEvent, RunnerEngine};
use tilerun_core::entities::ItemKind;
use tilerun_logic::lane_graph::LaneGraph;
use tilerun_logic::object_pool::{ObjectPool, Poolable};
use tilerun_logic::score_ledger::ScoreLedger;
use tilerun_logic::sorting::{binary_search_score, quicksort_scores};
use tilerun_logic::tile_queue::TileQueue;

// ── Run manifest (same JSON a deployment would ship) ────────────────────

const MANIFEST_JSON: &str = include_str!("../../../data/run_config.json");

#[derive(Debug, Deserialize)]
struct Manifest {
    engine: EngineConfig,
    expect: Expectations,
}

#[derive(Debug, Deserialize)]
struct Expectations {
    initial_tiles: usize,
    lanes: usize,
    leaderboard_size: usize,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed,
        detail,
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Tilerun Validation Harness ===\n");

    let manifest: Manifest =
        serde_json::from_str(MANIFEST_JSON).expect("run_config.json must parse");

    let mut results = Vec::new();
    results.extend(validate_tile_queue(verbose));
    results.extend(validate_object_pool(verbose));
    results.extend(validate_lane_graph(verbose));
    results.extend(validate_score_ledger(verbose));
    results.extend(validate_engine_run(&manifest, verbose));

    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    println!("\n=== Results: {} passed, {} failed ===", passed, failed);
    for result in &results {
        if !result.passed || verbose {
            let tag = if result.passed { "PASS" } else { "FAIL" };
            println!("  [{}] {}: {}", tag, result.name, result.detail);
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Tile queue sweep ────────────────────────────────────────────────────

fn validate_tile_queue(verbose: bool) -> Vec<TestResult> {
    if verbose {
        println!("-- tile queue sweep");
    }
    let mut results = Vec::new();

    let mut queue = TileQueue::new();
    for i in 0..100 {
        queue.enqueue(i);
    }
    results.push(check(
        "queue/size-after-enqueues",
        queue.len() == 100,
        format!("len={}", queue.len()),
    ));

    let mut in_order = true;
    for expected in 0..60 {
        if queue.dequeue() != Some(expected) {
            in_order = false;
            break;
        }
    }
    results.push(check(
        "queue/fifo-order",
        in_order && queue.len() == 40,
        format!("len after 60 dequeues={}", queue.len()),
    ));

    let snapshot = queue.to_vec();
    results.push(check(
        "queue/snapshot",
        snapshot.first() == Some(&60) && snapshot.last() == Some(&99),
        format!("front={:?} rear={:?}", snapshot.first(), snapshot.last()),
    ));

    queue.clear();
    results.push(check(
        "queue/clear",
        queue.is_empty() && queue.dequeue().is_none(),
        "empty after clear".to_string(),
    ));

    results
}

// ── Object pool sweep ───────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Dummy {
    live: bool,
}

impl Poolable for Dummy {
    type Placement = ();

    fn activate(&mut self, _placement: &()) {
        self.live = true;
    }

    fn deactivate(&mut self) {
        self.live = false;
    }
}

fn validate_object_pool(verbose: bool) -> Vec<TestResult> {
    if verbose {
        println!("-- object pool sweep");
    }
    let mut results = Vec::new();

    // The canonical growth scenario: 2 pre-allocated, 3 acquired, all
    // released leaves 7 available after one growth step.
    let mut pool: ObjectPool<Dummy> = ObjectPool::new(Box::new(|| Some(Dummy::default())), 2);
    let a = pool.acquire(&());
    let b = pool.acquire(&());
    let c = pool.acquire(&());
    let distinct = a != b && b != c && a != c;
    results.push(check(
        "pool/distinct-handles",
        a.is_some() && b.is_some() && c.is_some() && distinct,
        format!("{:?} {:?} {:?}", a, b, c),
    ));

    for handle in [a, b, c].into_iter().flatten() {
        pool.release(handle);
    }
    results.push(check(
        "pool/growth-then-release-all",
        pool.active_count() == 0 && pool.available_count() == 7,
        format!(
            "active={} available={} total={}",
            pool.active_count(),
            pool.available_count(),
            pool.total_size()
        ),
    ));

    // Conservation under churn.
    let mut handles = Vec::new();
    for _ in 0..50 {
        if let Some(h) = pool.acquire(&()) {
            handles.push(h);
        }
    }
    let conserved = pool.active_count() + pool.available_count() >= 7;
    for h in handles {
        pool.release(h);
    }
    results.push(check(
        "pool/conservation",
        conserved && pool.active_count() == 0,
        format!("total={}", pool.total_size()),
    ));

    results
}

// ── Lane graph sweep ────────────────────────────────────────────────────

fn validate_lane_graph(verbose: bool) -> Vec<TestResult> {
    if verbose {
        println!("-- lane graph sweep");
    }
    let mut results = Vec::new();

    let mut graph = LaneGraph::new();
    graph.initialize(&[-200.0, 0.0, 200.0]);

    results.push(check(
        "graph/bfs-chain",
        graph.bfs_find_path(0, 2) == vec![0, 1, 2],
        format!("{:?}", graph.bfs_find_path(0, 2)),
    ));

    graph.set_lane_blocked(1, true);
    results.push(check(
        "graph/bfs-blocked-middle",
        graph.bfs_find_path(0, 2).is_empty(),
        format!("{:?}", graph.bfs_find_path(0, 2)),
    ));

    // BFS and DFS disagree on a blocked origin matching itself.
    graph.set_lane_blocked(1, false);
    graph.set_lane_blocked(0, true);
    let bfs_self = graph.bfs_find_path(0, 0);
    let dfs_self = graph.dfs_find_path(0, 0);
    results.push(check(
        "graph/blocked-origin-asymmetry",
        bfs_self == vec![0] && dfs_self.is_empty(),
        format!("bfs={:?} dfs={:?}", bfs_self, dfs_self),
    ));

    results.push(check(
        "graph/invalid-lane",
        graph.bfs_find_path(0, 99).is_empty() && graph.is_lane_blocked(99),
        "unknown lanes impassable".to_string(),
    ));

    results
}

// ── Score ledger sweep ──────────────────────────────────────────────────

fn validate_score_ledger(verbose: bool) -> Vec<TestResult> {
    if verbose {
        println!("-- score ledger sweep");
    }
    let mut results = Vec::new();

    let scores = [30, 90, 10, 70, 50, 90, 20];
    let mut ledger = ScoreLedger::new();
    for &s in &scores {
        ledger.insert(s, "Player");
    }

    // Cross-check the in-order traversal against an independent quicksort.
    let mut sorted = scores.to_vec();
    quicksort_scores(&mut sorted);
    let in_order: Vec<i32> = ledger.in_order_traversal().iter().map(|n| n.score).collect();
    results.push(check(
        "ledger/in-order-vs-quicksort",
        in_order == sorted,
        format!("{:?} vs {:?}", in_order, sorted),
    ));

    // Binary search agrees with BST search on hits and misses.
    let mut agree = true;
    for probe in [10, 20, 55, 90, 100] {
        let bst = ledger.search(probe);
        let flat = binary_search_score(&sorted, probe).is_some();
        if bst != flat {
            agree = false;
        }
    }
    results.push(check(
        "ledger/search-vs-binary-search",
        agree,
        "hit/miss agreement".to_string(),
    ));

    let top = ledger.top_scores(3);
    let top_scores: Vec<i32> = top.iter().map(|n| n.score).collect();
    results.push(check(
        "ledger/top-n",
        top_scores == vec![90, 90, 70],
        format!("{:?}", top_scores),
    ));

    ledger.delete(90);
    ledger.delete(404);
    results.push(check(
        "ledger/delete-and-noop-count",
        ledger.node_count() == 6 && ledger.search(90),
        format!("count={}", ledger.node_count()),
    ));

    results
}

// ── Full engine run ─────────────────────────────────────────────────────

fn validate_engine_run(manifest: &Manifest, verbose: bool) -> Vec<TestResult> {
    if verbose {
        println!("-- engine run");
    }
    let mut results = Vec::new();

    let mut engine = RunnerEngine::new(manifest.engine.clone());
    engine.start();

    results.push(check(
        "engine/initial-strip",
        engine.tile_count() == manifest.expect.initial_tiles
            && engine.lane_count() == manifest.expect.lanes,
        format!("tiles={} lanes={}", engine.tile_count(), engine.lane_count()),
    ));

    // Simulate a run: cross tiles, expire the oldest, pick up every coin.
    let mut picked = 0i32;
    for _ in 0..30 {
        let id = engine.on_tile_crossed();
        let coins: Vec<_> = engine
            .tile(id)
            .map(|tile| tile.pooled().to_vec())
            .unwrap_or_default()
            .into_iter()
            .filter(|item| item.kind == ItemKind::Coin)
            .collect();
        for item in coins {
            engine.collect_coin(item.handle);
            picked += 1;
        }
        let oldest = engine.queued_tiles()[0];
        engine.remove_tile(oldest);
    }
    results.push(check(
        "engine/pickups-scored",
        engine.total_coins() == picked && picked > 0,
        format!("picked={}", picked),
    ));

    // Deaths: reset, reset, game over.
    engine.player_died();
    let after_reset = engine.tile_count() == manifest.expect.initial_tiles
        && engine.active_coin_count() + engine.active_obstacle_count() > 0;
    engine.player_died();
    engine.player_died();

    results.push(check(
        "engine/reset-then-game-over",
        after_reset && engine.is_game_over() && engine.lives() == 0,
        format!("game_over={}", engine.is_game_over()),
    ));

    let events = engine.drain_events();
    results.push(check(
        "engine/events-emitted",
        events.contains(&GameEvent::GameOver)
            && events.iter().any(|e| matches!(e, GameEvent::LivesChanged(_))),
        format!("{} events", events.len()),
    ));

    let top = engine.leaderboard(manifest.expect.leaderboard_size);
    let descending = top.windows(2).all(|w| w[0].score >= w[1].score);
    results.push(check(
        "engine/leaderboard",
        descending
            && top.len() <= manifest.expect.leaderboard_size
            && top.first().map(|e| e.score) == Some(picked),
        format!("entries={} best={:?}", top.len(), top.first().map(|e| e.score)),
    ));

    results
}
