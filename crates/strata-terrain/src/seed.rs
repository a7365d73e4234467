//! Deterministic seeding utilities.
//!
//! Provides per-chunk RNG derivation from a world seed and chunk coordinate,
//! per-purpose noise seeds, and a stable digest of grid contents for
//! determinism tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use strata_voxel::{ChunkCoord, VoxelGrid};

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

/// Derive a u64 seed for a chunk from the world seed and chunk coordinate.
///
/// Uses SipHash (via std's `DefaultHasher`) to combine both into a
/// well-distributed value.
pub fn derive_chunk_seed(world_seed: u64, coord: ChunkCoord) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    coord.x.hash(&mut hasher);
    coord.z.hash(&mut hasher);
    hasher.finish()
}

/// Derive a deterministic RNG for a specific chunk.
///
/// The returned RNG produces an identical sequence for the same
/// `(world_seed, coord)` pair regardless of thread or platform.
pub fn chunk_rng(world_seed: u64, coord: ChunkCoord) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_chunk_seed(world_seed, coord))
}

/// Seed for one of the world's noise fields.
///
/// `salt` decorrelates fields built from the same world seed.
pub fn noise_seed(world_seed: u64, salt: u64) -> u32 {
    let mixed = world_seed.wrapping_add(salt.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    (mixed ^ (mixed >> 32)) as u32
}

/// Stable 64-bit digest of every block in a grid.
///
/// Render references are ignored; two grids with the same blocks hash equal.
pub fn hash_grid(grid: &VoxelGrid) -> u64 {
    let mut hasher = DefaultHasher::new();
    grid.width().hash(&mut hasher);
    grid.height().hash(&mut hasher);
    for (_, voxel) in grid.iter() {
        voxel.block.id().hash(&mut hasher);
    }
    hasher.finish()
}
