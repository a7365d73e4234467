//! Chunk and chunk-local coordinates, and conversion from world space.

use serde::{Deserialize, Serialize};

/// Identifies a chunk column by its origin in chunk units.
///
/// The chunk's world-space origin is `(x * width, 0, z * width)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chebyshev (chessboard) distance between two chunks.
    pub fn chebyshev_distance(self, other: ChunkCoord) -> u32 {
        let dx = (self.x as i64 - other.x as i64).unsigned_abs();
        let dz = (self.z as i64 - other.z as i64).unsigned_abs();
        dx.max(dz) as u32
    }

    /// World-space X/Z of the chunk's minimum corner.
    pub fn world_origin(self, width: u32) -> (i64, i64) {
        (self.x as i64 * width as i64, self.z as i64 * width as i64)
    }

    /// Chunk containing the world-space column `(wx, wz)`.
    ///
    /// Saturates at the edge of the chunk index range.
    pub fn containing(wx: i64, wz: i64, width: u32) -> Self {
        let w = width as i64;
        let clamp = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        Self::new(clamp(wx.div_euclid(w)), clamp(wz.div_euclid(w)))
    }

    /// Like [`ChunkCoord::containing`], but `None` when the chunk index does
    /// not fit in `i32`.
    pub fn try_containing(wx: i64, wz: i64, width: u32) -> Option<Self> {
        let w = width as i64;
        let x = i32::try_from(wx.div_euclid(w)).ok()?;
        let z = i32::try_from(wz.div_euclid(w)).ok()?;
        Some(Self::new(x, z))
    }
}

/// A cell position inside a chunk's grid.
///
/// Signed so that neighbour offsets of edge cells can step outside the grid;
/// the grid bounds-checks every lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl LocalPos {
    /// Offsets to the six axis-aligned neighbours.
    pub const NEIGHBOR_OFFSETS: [(i32, i32, i32); 6] = [
        (1, 0, 0),
        (-1, 0, 0),
        (0, 1, 0),
        (0, -1, 0),
        (0, 0, 1),
        (0, 0, -1),
    ];

    /// Creates a new local position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this position shifted by `(dx, dy, dz)`.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The six axis-aligned neighbours, in `NEIGHBOR_OFFSETS` order.
    pub fn neighbors(self) -> [LocalPos; 6] {
        Self::NEIGHBOR_OFFSETS.map(|(dx, dy, dz)| self.offset(dx, dy, dz))
    }
}

/// Splits a world-space voxel position into its owning chunk and the local
/// position inside it.
///
/// X and Z use floor division so negative coordinates land in the chunk to
/// their "left". Y passes through unchanged; chunks are full-height columns.
/// Returns `None` when the chunk index or Y does not fit in `i32`.
pub fn world_to_chunk_local(wx: i64, wy: i64, wz: i64, width: u32) -> Option<(ChunkCoord, LocalPos)> {
    let w = width as i64;
    let coord = ChunkCoord::try_containing(wx, wz, width)?;
    let y = i32::try_from(wy).ok()?;
    let local = LocalPos::new(
        i32::try_from(wx.rem_euclid(w)).ok()?,
        y,
        i32::try_from(wz.rem_euclid(w)).ok()?,
    );
    Some((coord, local))
}

/// Inverse of [`world_to_chunk_local`].
pub fn chunk_local_to_world(coord: ChunkCoord, local: LocalPos, width: u32) -> (i64, i64, i64) {
    let (ox, oz) = coord.world_origin(width);
    (ox + local.x as i64, local.y as i64, oz + local.z as i64)
}
