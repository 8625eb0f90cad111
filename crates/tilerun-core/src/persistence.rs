//! Save/load of run state.
//!
//! Uses bincode for compact binary serialization over any reader/writer.
//! The ledger travels as its pre-order entry list: re-inserting entries in
//! pre-order reproduces the exact tree shape on load.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use tilerun_logic::score_ledger::ScoreEntry;

use crate::engine::RunnerEngine;

/// Save format version (increment when the format changes).
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of a run.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub total_coins: i32,
    pub lives: u32,
    /// Ledger entries in pre-order.
    pub scores: Vec<ScoreEntry>,
}

#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

/// Write the engine's run state to `writer`.
pub fn save_run<W: Write>(writer: W, engine: &RunnerEngine) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        total_coins: engine.total_coins(),
        lives: engine.lives(),
        scores: engine
            .score_ledger()
            .pre_order_traversal()
            .into_iter()
            .map(|node| node.entry())
            .collect(),
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Read run state from `reader` and apply it to the engine. Tiles and pooled
/// items are runtime state and are rebuilt by the next level reset, not
/// persisted.
pub fn load_run<R: Read>(reader: R, engine: &mut RunnerEngine) -> Result<(), SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    engine.restore_state(save_data.total_coins, save_data.lives, save_data.scores);
    Ok(())
}

impl RunnerEngine {
    /// Save run state to a writer.
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        save_run(writer, self)
    }

    /// Load run state from a reader.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        load_run(reader, self)
    }
}
