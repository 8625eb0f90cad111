//! Core data-structure engines for tilerun.
//!
//! This crate contains the reusable engines behind the runner: each one is
//! plain data plus operations, independent of any game engine, renderer, or
//! runtime. Everything here is single-threaded and synchronous; callers that
//! need concurrency serialize access themselves.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Lane ids, spawn thresholds, pool sizes (plain constants) |
//! | [`lane_graph`] | Adjacency-list lane topology with BFS/DFS pathfinding |
//! | [`object_pool`] | Generic handle-keyed reuse pool for spawned entities |
//! | [`score_ledger`] | BST score store with ranked top-N retrieval |
//! | [`sorting`] | Standalone quicksort and binary search over score arrays |
//! | [`tile_queue`] | FIFO queue of level segments in spawn order |

pub mod constants;
pub mod lane_graph;
pub mod object_pool;
pub mod score_ledger;
pub mod sorting;
pub mod tile_queue;
