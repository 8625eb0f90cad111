//! Run engine - the single owner and composer of the four core structures.
//!
//! Tile advance enqueues a segment and rolls per-lane spawns out of the
//! object pools, gated by lane blocking. Coin pickups land in the score
//! ledger. A death with lives remaining drains the queue, returns every
//! borrowed entity to its pool, and rebuilds the initial strip; the final
//! death closes the run and ranks the leaderboard.

use std::collections::HashMap;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use tilerun_logic::constants::{lanes, pools, rules, spawn, tiles};
use tilerun_logic::lane_graph::LaneGraph;
use tilerun_logic::object_pool::{ObjectPool, PoolHandle};
use tilerun_logic::score_ledger::{ScoreEntry, ScoreLedger};
use tilerun_logic::tile_queue::TileQueue;

use crate::entities::{Coin, FloorTile, ItemKind, Obstacle, TileId, Transform};

/// Tunable run parameters. Defaults mirror the shipped game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub num_initial_tiles: u32,
    pub max_lives: u32,
    pub coin_pool_size: usize,
    pub obstacle_pool_size: usize,
    /// Spawn roll thresholds per lane: an obstacle for rolls in
    /// [obstacle_min, obstacle_max), a coin at or above coin_min.
    pub obstacle_min: f32,
    pub obstacle_max: f32,
    pub coin_min: f32,
    pub player_name: String,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_initial_tiles: tiles::NUM_INITIAL,
            max_lives: rules::MAX_LIVES,
            coin_pool_size: pools::COIN_PREALLOC,
            obstacle_pool_size: pools::OBSTACLE_PREALLOC,
            obstacle_min: spawn::OBSTACLE_MIN,
            obstacle_max: spawn::OBSTACLE_MAX,
            coin_min: spawn::COIN_MIN,
            player_name: "Player".to_string(),
            seed: 42,
        }
    }
}

/// State-change notifications for the presentation layer. Drained, not
/// subscribed: the caller polls [`RunnerEngine::drain_events`] each frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    CoinsChanged(i32),
    LivesChanged(u32),
    LevelReset,
    GameOver,
}

/// Owns one instance of each core engine; none of them know about each
/// other. Single-threaded by design, like the structures it composes.
pub struct RunnerEngine {
    tile_queue: TileQueue<TileId>,
    tiles: HashMap<TileId, FloorTile>,
    coin_pool: ObjectPool<Coin>,
    obstacle_pool: ObjectPool<Obstacle>,
    lane_graph: LaneGraph,
    score_ledger: ScoreLedger,

    config: EngineConfig,
    rng: StdRng,
    lane_switch_values: Vec<f32>,
    next_spawn_point: Transform,
    next_tile_id: u32,
    total_coins: i32,
    lives: u32,
    game_over: bool,
    events: Vec<GameEvent>,
}

impl RunnerEngine {
    pub fn new(config: EngineConfig) -> Self {
        let seed = config.seed;
        let coin_pool = ObjectPool::new(Box::new(|| Some(Coin::default())), config.coin_pool_size);
        let obstacle_pool = ObjectPool::new(
            Box::new(|| Some(Obstacle::default())),
            config.obstacle_pool_size,
        );
        info!(
            "pools ready: {} coins, {} obstacles",
            coin_pool.available_count(),
            obstacle_pool.available_count()
        );

        Self {
            tile_queue: TileQueue::new(),
            tiles: HashMap::new(),
            coin_pool,
            obstacle_pool,
            lane_graph: LaneGraph::new(),
            score_ledger: ScoreLedger::new(),
            config,
            rng: StdRng::seed_from_u64(seed),
            lane_switch_values: Vec::new(),
            next_spawn_point: Transform::default(),
            next_tile_id: 0,
            total_coins: 0,
            lives: 0,
            game_over: false,
            events: Vec::new(),
        }
    }

    /// Begin a run: reset lives and lay down the initial tile strip.
    pub fn start(&mut self) {
        self.lives = self.config.max_lives;
        self.game_over = false;
        self.create_initial_tiles();
    }

    /// Tile-advance event: the player crossed onto a new segment, so extend
    /// the strip with an item-bearing tile.
    pub fn on_tile_crossed(&mut self) -> TileId {
        self.add_floor_tile(true)
    }

    /// Create a tile at the running spawn point, enqueue it, and optionally
    /// roll per-lane item spawns from the pools.
    pub fn add_floor_tile(&mut self, spawn_items: bool) -> TileId {
        let id = TileId(self.next_tile_id);
        self.next_tile_id += 1;

        let mut tile = FloorTile::new(id, self.next_spawn_point);
        if spawn_items {
            self.spawn_items_from_pools(&mut tile);
        }
        self.next_spawn_point = tile.attach_transform();

        self.tile_queue.enqueue(id);
        self.tiles.insert(id, tile);
        debug!("tile {:?} enqueued, {} in the world", id, self.tile_queue.len());
        id
    }

    /// Drop one specific tile. The queue has no arbitrary removal, so this
    /// rebuilds it from a snapshot minus the expired tile, whose borrowed
    /// items go back to their pools.
    pub fn remove_tile(&mut self, id: TileId) {
        let all = self.tile_queue.to_vec();
        self.tile_queue.clear();

        for tile_id in all {
            if tile_id == id {
                if let Some(mut tile) = self.tiles.remove(&tile_id) {
                    self.return_pooled_items(&mut tile);
                }
            } else {
                self.tile_queue.enqueue(tile_id);
            }
        }
    }

    /// Coin pickup: return the coin to its pool and score the event.
    pub fn collect_coin(&mut self, handle: PoolHandle) {
        if !self.coin_pool.is_active(handle) {
            debug!("pickup for inactive coin handle {:?} ignored", handle);
            return;
        }
        self.coin_pool.release(handle);
        self.add_coin();
    }

    /// Score one coin: bump the total and record it in the ledger.
    pub fn add_coin(&mut self) {
        self.total_coins += 1;
        self.score_ledger
            .insert(self.total_coins, &self.config.player_name);
        self.events.push(GameEvent::CoinsChanged(self.total_coins));
    }

    /// Death handling: with lives remaining the level resets (drain the
    /// queue, reclaim every pooled item, rebuild the strip); the last life
    /// ends the run.
    pub fn player_died(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LivesChanged(self.lives));
        info!("player died, {} lives remaining", self.lives);

        if self.lives > 0 {
            while let Some(tile_id) = self.tile_queue.dequeue() {
                if let Some(mut tile) = self.tiles.remove(&tile_id) {
                    self.return_pooled_items(&mut tile);
                }
            }
            self.next_spawn_point = Transform::default();
            self.create_initial_tiles();
            self.events.push(GameEvent::LevelReset);
        } else {
            self.finish_run();
        }
    }

    /// Ranked leaderboard retrieval.
    pub fn leaderboard(&self, count: usize) -> Vec<ScoreEntry> {
        self.score_ledger
            .top_scores(count)
            .into_iter()
            .map(|node| node.entry())
            .collect()
    }

    /// Next lane to move toward `target`, following the shortest unblocked
    /// path; stays put when no path exists.
    pub fn find_optimal_lane(&self, current: u32, target: u32) -> u32 {
        let path = self.lane_graph.bfs_find_path(current, target);
        if path.len() > 1 {
            path[1]
        } else {
            current
        }
    }

    pub fn set_lane_blocked(&mut self, lane_id: u32, blocked: bool) {
        self.lane_graph.set_lane_blocked(lane_id, blocked);
        debug!("lane {} blocked: {}", lane_id, blocked);
    }

    pub fn is_lane_blocked(&self, lane_id: u32) -> bool {
        self.lane_graph.is_lane_blocked(lane_id)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn total_coins(&self) -> i32 {
        self.total_coins
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn tile_count(&self) -> usize {
        self.tile_queue.len()
    }

    pub fn queued_tiles(&self) -> Vec<TileId> {
        self.tile_queue.to_vec()
    }

    pub fn tile(&self, id: TileId) -> Option<&FloorTile> {
        self.tiles.get(&id)
    }

    pub fn lane_count(&self) -> usize {
        self.lane_graph.num_lanes()
    }

    pub fn lane_positions(&self) -> &[f32] {
        &self.lane_switch_values
    }

    pub fn active_coin_count(&self) -> usize {
        self.coin_pool.active_count()
    }

    pub fn active_obstacle_count(&self) -> usize {
        self.obstacle_pool.active_count()
    }

    /// Look up an active coin for rendering or overlap checks.
    pub fn coin(&self, handle: PoolHandle) -> Option<&Coin> {
        self.coin_pool.find_active(handle)
    }

    /// Look up an active obstacle.
    pub fn obstacle(&self, handle: PoolHandle) -> Option<&Obstacle> {
        self.obstacle_pool.find_active(handle)
    }

    pub fn score_ledger(&self) -> &ScoreLedger {
        &self.score_ledger
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn restore_state(&mut self, total_coins: i32, lives: u32, entries: Vec<ScoreEntry>) {
        self.total_coins = total_coins;
        self.lives = lives;
        self.score_ledger.clear();
        for entry in entries {
            self.score_ledger.insert(entry.score, &entry.player_name);
        }
    }

    // ── Internals ──────────────────────────────────────────────────────

    /// Lay down the initial strip. The first tile carries no items; its lane
    /// placements seed the lane graph. Two more bare tiles give the player a
    /// safe lead-in before the item-bearing tiles begin.
    fn create_initial_tiles(&mut self) {
        let first = self.add_floor_tile(false);
        if let Some(tile) = self.tiles.get(&first) {
            self.lane_switch_values = (0..lanes::OFFSETS.len())
                .map(|lane| tile.lane_transform(lane).location.y)
                .collect();
        }
        self.lane_graph.initialize(&self.lane_switch_values);
        info!("lane graph initialized with {} lanes", self.lane_graph.num_lanes());

        self.add_floor_tile(false);
        self.add_floor_tile(false);

        for _ in 0..self.config.num_initial_tiles {
            self.add_floor_tile(true);
        }
    }

    /// Per-lane spawn rolls for one tile. Blocked lanes are skipped; the
    /// roll picks an obstacle, a coin, or nothing, and the acquired handle
    /// is recorded on the tile as a pool loan.
    fn spawn_items_from_pools(&mut self, tile: &mut FloorTile) {
        for lane in 0..lanes::OFFSETS.len() as u32 {
            if self.lane_graph.is_lane_blocked(lane) {
                debug!("lane {} is blocked, skipping spawn roll", lane);
                continue;
            }

            let roll: f32 = self.rng.gen_range(0.0..1.0);
            let placement = tile.lane_transform(lane as usize);

            if roll >= self.config.obstacle_min && roll < self.config.obstacle_max {
                match self.obstacle_pool.acquire(&placement) {
                    Some(handle) => tile.add_pooled(ItemKind::Obstacle, handle),
                    None => warn!("obstacle pool could not supply an entity"),
                }
            } else if roll >= self.config.coin_min {
                match self.coin_pool.acquire(&placement) {
                    Some(handle) => tile.add_pooled(ItemKind::Coin, handle),
                    None => warn!("coin pool could not supply an entity"),
                }
            }
        }
    }

    /// Hand every item the tile borrowed back to its pool. Handles already
    /// released (collected coins) are no-ops at the pool.
    fn return_pooled_items(&mut self, tile: &mut FloorTile) {
        for item in tile.take_pooled() {
            match item.kind {
                ItemKind::Coin => self.coin_pool.release(item.handle),
                ItemKind::Obstacle => self.obstacle_pool.release(item.handle),
            }
        }
    }

    fn finish_run(&mut self) {
        self.game_over = true;
        self.events.push(GameEvent::GameOver);

        let top = self.leaderboard(rules::LEADERBOARD_SIZE);
        info!("game over, final score {}", self.total_coins);
        for (rank, entry) in top.iter().enumerate() {
            info!("{}. {}: {}", rank + 1, entry.player_name, entry.score);
        }
    }
}
