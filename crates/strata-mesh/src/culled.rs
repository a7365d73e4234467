//! Per-voxel face culling: one quad per exposed cell face.
//!
//! Produces more triangles than [`crate::greedy_mesh`] but covers exactly the
//! same surface; kept as the reference the greedy mesher is checked against.

use strata_voxel::{AtlasLayout, VoxelGrid};

use crate::mesh_buffer::MeshBuffer;
use crate::occlusion::{Boundary, VisibilityMap};

/// Emits a unit quad for every exposed face of every non-obscured cell.
pub fn culled_mesh(grid: &VoxelGrid, atlas: &AtlasLayout, boundary: Boundary) -> MeshBuffer {
    let visibility = VisibilityMap::compute(grid, boundary);
    let mut mesh = MeshBuffer::new();

    for (pos, voxel) in grid.iter() {
        let faces = visibility.get(pos.x, pos.y, pos.z);
        if faces.is_empty() {
            continue;
        }
        let cell = [pos.x, pos.y, pos.z];
        for dir in faces.iter() {
            let (layer_axis, u_axis, v_axis) = dir.sweep_axes();
            mesh.push_quad(
                dir,
                cell[layer_axis],
                cell[u_axis],
                cell[v_axis],
                1,
                1,
                voxel.block,
                atlas,
            );
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face_direction::FaceDirection;
    use strata_voxel::BlockType;

    #[test]
    fn test_single_cell_emits_six_quads() {
        let mut grid = VoxelGrid::new(4, 4);
        grid.set_block(2, 2, 2, BlockType::Stone);
        let mesh = culled_mesh(&grid, &AtlasLayout::default(), Boundary::Exposed);
        assert_eq!(mesh.quad_count(), 6);
        for dir in FaceDirection::ALL {
            assert_eq!(mesh.count_quads_for_direction(dir), 1);
        }
    }

    #[test]
    fn test_empty_grid_emits_nothing() {
        let mesh = culled_mesh(&VoxelGrid::new(4, 4), &AtlasLayout::default(), Boundary::Exposed);
        assert!(mesh.is_empty());
        let mesh = culled_mesh(&VoxelGrid::new(0, 0), &AtlasLayout::default(), Boundary::Exposed);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_solid_grid_emits_only_shell() {
        let grid = VoxelGrid::filled(3, 3, BlockType::Stone);
        let mesh = culled_mesh(&grid, &AtlasLayout::default(), Boundary::Exposed);
        assert_eq!(mesh.quad_count(), 6 * 9);
        let sealed = culled_mesh(&grid, &AtlasLayout::default(), Boundary::Sealed);
        assert_eq!(sealed.quad_count(), 0);
    }

    #[test]
    fn test_two_adjacent_cells_share_hidden_face() {
        let mut grid = VoxelGrid::new(4, 4);
        grid.set_block(1, 1, 1, BlockType::Dirt);
        grid.set_block(2, 1, 1, BlockType::Stone);
        let mesh = culled_mesh(&grid, &AtlasLayout::default(), Boundary::Exposed);
        assert_eq!(mesh.quad_count(), 10);
        assert_eq!(mesh.count_quads_for_direction(FaceDirection::PosX), 1);
    }
}
