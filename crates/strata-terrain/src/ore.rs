//! Resource pass: ore veins from per-ore 3D noise fields.
//!
//! Runs before terrain shaping. Ore is placed purely by noise, independent of
//! the surface; the terrain pass later erases ore above the height line and
//! only fills Stone around it below.

use glam::DVec3;
use strata_voxel::{BlockType, ChunkCoord, OreParams, VoxelGrid};

use crate::noise_field::NoiseField;

/// Salt base for ore noise; ore `i` uses `ORE_SALT + i`.
const ORE_SALT: u64 = 0x0_0E00;

/// Runtime data for one ore type, including the pre-initialized noise field.
struct OreRuntime {
    config: OreParams,
    noise: NoiseField,
}

/// Places ore veins using one 3D noise field per ore type.
pub struct OreDistributor {
    /// In configuration order; later entries overwrite earlier ones.
    ores: Vec<OreRuntime>,
}

impl OreDistributor {
    /// Create a new distributor for the given world seed and ore configs.
    pub fn new(seed: u64, ores: &[OreParams]) -> Self {
        let ores = ores
            .iter()
            .enumerate()
            .map(|(i, config)| OreRuntime {
                config: config.clone(),
                noise: NoiseField::new(seed, ORE_SALT + i as u64),
            })
            .collect();
        Self { ores }
    }

    /// The ore (if any) at a world-space voxel position.
    ///
    /// Every ore is tested; when several pass their threshold the last one in
    /// configuration order wins.
    pub fn sample(&self, world: DVec3) -> Option<BlockType> {
        let mut found = None;
        for ore in &self.ores {
            let cfg = &ore.config;
            let value = ore.noise.normalized_3d(world / cfg.scale);
            if value > cfg.scarcity {
                found = Some(cfg.block);
            }
        }
        found
    }

    /// Writes ore into every cell of `grid` whose sample passes.
    pub fn apply(&self, grid: &mut VoxelGrid, coord: ChunkCoord) {
        if self.ores.is_empty() {
            return;
        }
        let (ox, oz) = coord.world_origin(grid.width());
        let (w, h) = (grid.width() as i32, grid.height() as i32);
        for y in 0..h {
            for z in 0..w {
                for x in 0..w {
                    let world = DVec3::new((ox + x as i64) as f64, y as f64, (oz + z as i64) as f64);
                    if let Some(block) = self.sample(world) {
                        grid.set_block(x, y, z, block);
                    }
                }
            }
        }
    }

    /// Number of configured ore types.
    pub fn ore_count(&self) -> usize {
        self.ores.len()
    }
}
