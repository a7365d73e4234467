//! Chunk generation pipeline.
//!
//! Passes run in a fixed order because each reads what the previous one
//! wrote: Air fill, ores, terrain, trees, then recorded edits. Edits always
//! win over procedural output.

use strata_voxel::{ChunkCoord, EditRecord, VoxelGrid, WorldParams};

use crate::ore::OreDistributor;
use crate::seed::chunk_rng;
use crate::terrain::TerrainShaper;
use crate::tree::TreeGrower;

/// Generates chunk grids for one world.
///
/// Noise fields are built once here and reused for every chunk, so a worker
/// should keep one generator alive rather than rebuilding per request.
pub struct ChunkGenerator {
    params: WorldParams,
    ores: OreDistributor,
    terrain: TerrainShaper,
    trees: TreeGrower,
}

impl ChunkGenerator {
    /// Builds all noise fields for `params`.
    pub fn new(params: WorldParams) -> Self {
        let seed = params.seed;
        Self {
            ores: OreDistributor::new(seed, &params.ores),
            terrain: TerrainShaper::new(seed, &params.terrain),
            trees: TreeGrower::new(seed, &params.trees),
            params,
        }
    }

    /// The parameters this generator was built with.
    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    /// Generates the grid for `coord` and replays `edits` on top.
    ///
    /// Identical `(params, coord, edits)` always produce an identical grid.
    /// Edits outside the grid are ignored.
    pub fn generate(&self, coord: ChunkCoord, edits: &[EditRecord]) -> VoxelGrid {
        let mut grid = VoxelGrid::new(self.params.chunk_width, self.params.chunk_height);

        self.ores.apply(&mut grid, coord);
        self.terrain.apply(&mut grid, coord);

        let mut rng = chunk_rng(self.params.seed, coord);
        let trees = self.trees.apply(&mut grid, coord, &mut rng);

        let mut replayed = 0;
        for edit in edits {
            let p = edit.pos;
            if grid.in_bounds(p.x, p.y, p.z) {
                grid.set_block(p.x, p.y, p.z, edit.block);
                replayed += 1;
            } else {
                tracing::trace!("ignoring out-of-range edit {:?} for chunk {:?}", edit, coord);
            }
        }

        tracing::trace!(
            "generated chunk ({}, {}): {} trees, {} edits replayed",
            coord.x,
            coord.z,
            trees,
            replayed
        );
        grid
    }
}

/// One-shot generation without keeping a [`ChunkGenerator`] around.
pub fn generate_chunk(coord: ChunkCoord, params: &WorldParams, edits: &[EditRecord]) -> VoxelGrid {
    ChunkGenerator::new(params.clone()).generate(coord, edits)
}
