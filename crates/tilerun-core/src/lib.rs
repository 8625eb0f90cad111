//! Run orchestration for tilerun.
//!
//! [`engine::RunnerEngine`] owns one instance of each core data-structure
//! engine and is their sole point of composition: tiles flow through the
//! FIFO queue, coins and obstacles cycle through the object pools, lane
//! blocking gates spawning and pathfinding, and every scoring event lands in
//! the ledger. Rendering, input, audio, and UI are external layers that
//! drive the engine and read back [`engine::GameEvent`]s.

pub mod engine;
pub mod entities;
pub mod persistence;
pub mod player;
