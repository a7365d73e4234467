//! Meshing: converts a voxel grid into flat position/normal/UV/index buffers
//! covering only its visible surface.

pub mod atlas;
pub mod culled;
pub mod face_direction;
pub mod greedy;
pub mod mesh_buffer;
pub mod occlusion;
pub mod visible_faces;

use serde::{Deserialize, Serialize};
use strata_voxel::{AtlasLayout, VoxelGrid};

pub use atlas::tile_uv;
pub use culled::culled_mesh;
pub use face_direction::FaceDirection;
pub use greedy::greedy_mesh;
pub use mesh_buffer::{MeshBuffer, QuadInfo};
pub use occlusion::{Boundary, VisibilityMap, face_exposed, is_obscured, is_renderable};
pub use visible_faces::VisibleFaces;

/// Which meshing algorithm to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshStrategy {
    /// Merge coplanar same-block faces into rectangles.
    #[default]
    Greedy,
    /// One quad per exposed cell face.
    Culled,
}

/// Mesher configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshOptions {
    pub strategy: MeshStrategy,
    pub boundary: Boundary,
}

/// Meshes `grid` with the chosen strategy. An empty grid yields an empty buffer.
pub fn mesh(grid: &VoxelGrid, atlas: &AtlasLayout, options: MeshOptions) -> MeshBuffer {
    match options.strategy {
        MeshStrategy::Greedy => greedy_mesh(grid, atlas, options.boundary),
        MeshStrategy::Culled => culled_mesh(grid, atlas, options.boundary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_voxel::BlockType;

    #[test]
    fn test_strategies_cover_same_area() {
        let mut grid = VoxelGrid::new(4, 4);
        for x in 0..4 {
            grid.set_block(x, 0, 0, BlockType::Dirt);
        }
        let atlas = AtlasLayout::default();
        let greedy = mesh(&grid, &atlas, MeshOptions::default());
        let culled = mesh(
            &grid,
            &atlas,
            MeshOptions {
                strategy: MeshStrategy::Culled,
                ..MeshOptions::default()
            },
        );
        for dir in FaceDirection::ALL {
            assert_eq!(greedy.area_for_direction(dir), culled.area_for_direction(dir));
        }
        assert_eq!(greedy.quad_count(), 6);
        assert_eq!(culled.quad_count(), 18);
    }
}
