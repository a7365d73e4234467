//! Tree pass: oak trunks with layered leaf canopies.
//!
//! Candidate roots exclude a border band as wide as the largest canopy so no
//! tree writes outside its own chunk. A 2D placement field decides which
//! columns root a tree; shape randomness comes from the chunk's RNG, so the
//! same chunk always grows the same trees.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use strata_voxel::{BlockType, ChunkCoord, SQUARE_CANOPY_RADIUS, TreeParams, VoxelGrid};

use crate::noise_field::NoiseField;

const PLACEMENT_SALT: u64 = 0x0_7EE5;

/// Arms of the "+" shaped canopy layers, including the centre.
const PLUS: [(i32, i32); 5] = [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)];

/// Grows trees on Grass columns.
pub struct TreeGrower {
    params: TreeParams,
    placement: NoiseField,
    border: u32,
}

impl TreeGrower {
    /// Builds the placement field for `seed`.
    pub fn new(seed: u64, params: &TreeParams) -> Self {
        Self {
            params: params.clone(),
            placement: NoiseField::new(seed, PLACEMENT_SALT),
            border: params.canopy_max_radius.max(SQUARE_CANOPY_RADIUS),
        }
    }

    /// Returns `true` if the world column `(wx, wz)` should root a tree.
    pub fn roots_at(&self, wx: i64, wz: i64) -> bool {
        let s = self.params.noise_scale;
        self.placement.normalized_2d(wx as f64 * s, wz as f64 * s) < self.params.frequency
    }

    /// Grows every tree rooted in `grid`. Returns the number planted.
    pub fn apply(&self, grid: &mut VoxelGrid, coord: ChunkCoord, rng: &mut ChaCha8Rng) -> usize {
        let w = grid.width() as i32;
        let b = self.border as i32;
        if w <= 2 * b {
            return 0;
        }
        let (ox, oz) = coord.world_origin(grid.width());

        let mut planted = 0;
        for z in b..w - b {
            for x in b..w - b {
                if !self.roots_at(ox + x as i64, oz + z as i64) {
                    continue;
                }
                // Only the topmost Grass in the column roots a tree.
                let Some(ground) = (0..grid.height() as i32)
                    .rev()
                    .find(|&y| grid.block(x, y, z) == Some(BlockType::Grass))
                else {
                    continue;
                };
                self.grow(grid, x, ground + 1, z, rng);
                planted += 1;
            }
        }
        planted
    }

    fn grow(&self, grid: &mut VoxelGrid, x: i32, base: i32, z: i32, rng: &mut ChaCha8Rng) {
        let p = &self.params;
        let trunk = rng.random_range(p.trunk_min..=p.trunk_max) as i32;
        for dy in 0..trunk {
            if grid.in_bounds(x, base + dy, z) {
                grid.set_block(x, base + dy, z, BlockType::OakLog);
            }
        }

        let top = base + trunk;

        // Layer 0: a "+" capping the trunk.
        for (dx, dz) in PLUS {
            grid.set_if_air(x + dx, top, z + dz, BlockType::Leaves);
        }

        // Layer 1: the "+" again, then a ragged disc.
        let y = top - 1;
        for (dx, dz) in PLUS {
            grid.set_if_air(x + dx, y, z + dz, BlockType::Leaves);
        }
        let r = rng.random_range(p.canopy_min_radius..=p.canopy_max_radius) as i32;
        for dz in -r..=r {
            for dx in -r..=r {
                if dx * dx + dz * dz > r * r {
                    continue;
                }
                if rng.random::<f64>() > 0.5 {
                    grid.set_if_air(x + dx, y, z + dz, BlockType::Leaves);
                }
            }
        }

        // Layers 2-3: a 5x5 square with randomly trimmed corners.
        let sr = SQUARE_CANOPY_RADIUS as i32;
        for y in [top - 2, top - 3] {
            for dz in -sr..=sr {
                for dx in -sr..=sr {
                    grid.set_if_air(x + dx, y, z + dz, BlockType::Leaves);
                }
            }
            for (cx, cz) in [(-sr, -sr), (sr, -sr), (-sr, sr), (sr, sr)] {
                let trim = rng.random::<f64>() < 0.5;
                if trim && grid.block(x + cx, y, z + cz) == Some(BlockType::Leaves) {
                    grid.set_block(x + cx, y, z + cz, BlockType::Air);
                }
            }
        }
    }
}
