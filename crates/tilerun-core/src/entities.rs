//! Domain entities the orchestrator moves through the core engines: floor
//! tiles and the pooled coin/obstacle items that ride on them.

use serde::{Deserialize, Serialize};
use tilerun_logic::constants::{lanes, tiles};
use tilerun_logic::object_pool::{PoolHandle, Poolable};

/// 3D position vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

/// Simplified placement: world location plus a yaw heading. Opaque to the
/// core engines; the pools store it on the entity they activate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub location: Vec3,
    pub yaw: f32,
}

impl Transform {
    pub fn at(location: Vec3) -> Self {
        Self { location, yaw: 0.0 }
    }
}

/// Opaque identifier of a tile currently in the world. What the tile queue
/// holds; the engine's tile table owns the tile itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Coin,
    Obstacle,
}

/// A pool loan recorded on the tile that carries the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PooledItem {
    pub kind: ItemKind,
    pub handle: PoolHandle,
}

/// One segment of the traversable level.
#[derive(Debug, Clone)]
pub struct FloorTile {
    pub id: TileId,
    pub origin: Transform,
    pooled: Vec<PooledItem>,
}

impl FloorTile {
    pub fn new(id: TileId, origin: Transform) -> Self {
        Self {
            id,
            origin,
            pooled: Vec::new(),
        }
    }

    /// Where the next tile attaches: one tile length further down the run.
    pub fn attach_transform(&self) -> Transform {
        let mut next = self.origin;
        next.location.x += tiles::LENGTH;
        next
    }

    /// Placement of the given lane on this tile.
    pub fn lane_transform(&self, lane: usize) -> Transform {
        let mut at = self.origin;
        if let Some(&offset) = lanes::OFFSETS.get(lane) {
            at.location.y += offset;
        }
        at
    }

    pub fn add_pooled(&mut self, kind: ItemKind, handle: PoolHandle) {
        self.pooled.push(PooledItem { kind, handle });
    }

    pub fn pooled(&self) -> &[PooledItem] {
        &self.pooled
    }

    pub fn take_pooled(&mut self) -> Vec<PooledItem> {
        std::mem::take(&mut self.pooled)
    }
}

/// Collectible coin. Dormant entities are invisible and non-interactive,
/// which reduces to the `active` flag here.
#[derive(Debug, Clone, Default)]
pub struct Coin {
    pub transform: Transform,
    pub active: bool,
}

impl Poolable for Coin {
    type Placement = Transform;

    fn activate(&mut self, placement: &Transform) {
        self.transform = *placement;
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Lane obstacle.
#[derive(Debug, Clone, Default)]
pub struct Obstacle {
    pub transform: Transform,
    pub active: bool,
}

impl Poolable for Obstacle {
    type Placement = Transform;

    fn activate(&mut self, placement: &Transform) {
        self.transform = *placement;
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}
