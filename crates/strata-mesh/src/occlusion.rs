//! Exposed-face detection and the obscured-cell test.
//!
//! A face needs geometry when the neighbour on that side is Air, is a
//! different translucent block (Leaves), or is missing and the boundary mode
//! treats missing cells as open. A cell is *obscured*, and skipped entirely,
//! only when all six neighbours are present, non-Air and non-Leaves.

use serde::{Deserialize, Serialize};
use strata_voxel::{BlockType, LocalPos, VoxelGrid};

use crate::face_direction::FaceDirection;
use crate::visible_faces::VisibleFaces;

/// How cells outside the grid are treated during culling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Boundary {
    /// Missing neighbours count as Air; chunk edges always show faces.
    #[default]
    Exposed,
    /// Missing neighbours count as opaque; chunk edges never show faces.
    Sealed,
}

/// Returns `true` if the face of `(x, y, z)` pointing `dir` needs geometry.
pub fn face_exposed(grid: &VoxelGrid, x: i32, y: i32, z: i32, dir: FaceDirection, boundary: Boundary) -> bool {
    let Some(block) = grid.block(x, y, z) else {
        return false;
    };
    if block.is_air() {
        return false;
    }
    let (nx, ny, nz) = dir.offset(x, y, z);
    match grid.block(nx, ny, nz) {
        None => boundary == Boundary::Exposed,
        Some(BlockType::Air) => true,
        // Translucent on either side shows the face unless both are the same block.
        Some(neighbor) if neighbor.is_translucent() || block.is_translucent() => neighbor != block,
        Some(_) => false,
    }
}

/// Returns `true` if the cell at `pos` contributes no geometry because all
/// six neighbours hide it.
///
/// Air cells and cells outside the grid are never obscured.
pub fn is_obscured(grid: &VoxelGrid, pos: LocalPos, boundary: Boundary) -> bool {
    match grid.block_at(pos) {
        None | Some(BlockType::Air) => return false,
        Some(_) => {}
    }
    pos.neighbors().into_iter().all(|n| match grid.block_at(n) {
        None => boundary == Boundary::Sealed,
        Some(block) => !block.is_air() && !block.is_translucent(),
    })
}

/// Returns `true` if the cell at `pos` needs a render instance: it is solid
/// and not obscured.
pub fn is_renderable(grid: &VoxelGrid, pos: LocalPos, boundary: Boundary) -> bool {
    grid.block_at(pos).is_some_and(|b| !b.is_air()) && !is_obscured(grid, pos, boundary)
}

/// Per-cell exposed-face masks for a whole grid.
#[derive(Clone, Debug)]
pub struct VisibilityMap {
    width: u32,
    height: u32,
    faces: Vec<VisibleFaces>,
}

impl VisibilityMap {
    /// Computes the mask of every cell. Obscured cells get an empty mask.
    pub fn compute(grid: &VoxelGrid, boundary: Boundary) -> Self {
        let (w, h) = (grid.width(), grid.height());
        let mut faces = vec![VisibleFaces::NONE; grid.volume()];

        for (pos, voxel) in grid.iter() {
            if voxel.block.is_air() || is_obscured(grid, pos, boundary) {
                continue;
            }
            let mut mask = VisibleFaces::NONE;
            for dir in FaceDirection::ALL {
                if face_exposed(grid, pos.x, pos.y, pos.z, dir, boundary) {
                    mask.set_visible(dir);
                }
            }
            faces[Self::linear(w, pos)] = mask;
        }

        Self {
            width: w,
            height: h,
            faces,
        }
    }

    #[inline]
    fn linear(width: u32, pos: LocalPos) -> usize {
        let w = width as usize;
        pos.x as usize + pos.z as usize * w + pos.y as usize * w * w
    }

    /// The mask at `(x, y, z)`; empty outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> VisibleFaces {
        let inside = x >= 0
            && y >= 0
            && z >= 0
            && (x as u32) < self.width
            && (z as u32) < self.width
            && (y as u32) < self.height;
        if !inside {
            return VisibleFaces::NONE;
        }
        self.faces[Self::linear(self.width, LocalPos::new(x, y, z))]
    }

    /// Total exposed faces across the grid.
    pub fn total_faces(&self) -> u32 {
        self.faces.iter().map(|vf| vf.count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(block: BlockType) -> VoxelGrid {
        let mut grid = VoxelGrid::new(3, 3);
        grid.set_block(1, 1, 1, block);
        grid
    }

    #[test]
    fn test_isolated_cell_exposes_all_faces() {
        let grid = single(BlockType::Stone);
        let map = VisibilityMap::compute(&grid, Boundary::Exposed);
        assert_eq!(map.get(1, 1, 1), VisibleFaces::ALL);
        assert_eq!(map.total_faces(), 6);
    }

    #[test]
    fn test_centre_of_solid_block_is_obscured() {
        let grid = VoxelGrid::filled(3, 3, BlockType::Stone);
        assert!(is_obscured(&grid, LocalPos::new(1, 1, 1), Boundary::Exposed));
        assert!(!is_obscured(&grid, LocalPos::new(0, 1, 1), Boundary::Exposed));
        assert!(is_obscured(&grid, LocalPos::new(0, 1, 1), Boundary::Sealed));
    }

    #[test]
    fn test_leaves_neighbour_prevents_obscuring() {
        let mut grid = VoxelGrid::filled(3, 3, BlockType::Stone);
        grid.set_block(1, 2, 1, BlockType::Leaves);
        let centre = LocalPos::new(1, 1, 1);
        assert!(!is_obscured(&grid, centre, Boundary::Exposed));
        assert!(face_exposed(&grid, 1, 1, 1, FaceDirection::PosY, Boundary::Exposed));
        assert!(!face_exposed(&grid, 1, 1, 1, FaceDirection::NegY, Boundary::Exposed));
    }

    #[test]
    fn test_air_neighbour_prevents_obscuring() {
        let mut grid = VoxelGrid::filled(3, 3, BlockType::Stone);
        grid.set_block(2, 1, 1, BlockType::Air);
        assert!(!is_obscured(&grid, LocalPos::new(1, 1, 1), Boundary::Sealed));
    }

    #[test]
    fn test_adjacent_leaves_hide_shared_face() {
        let mut grid = VoxelGrid::new(3, 3);
        grid.set_block(0, 0, 0, BlockType::Leaves);
        grid.set_block(1, 0, 0, BlockType::Leaves);
        assert!(!face_exposed(&grid, 0, 0, 0, FaceDirection::PosX, Boundary::Exposed));
        assert!(face_exposed(&grid, 0, 0, 0, FaceDirection::NegX, Boundary::Exposed));
    }

    #[test]
    fn test_leaves_show_face_against_opaque() {
        let mut grid = VoxelGrid::new(3, 3);
        grid.set_block(0, 0, 0, BlockType::Leaves);
        grid.set_block(1, 0, 0, BlockType::Stone);
        assert!(face_exposed(&grid, 0, 0, 0, FaceDirection::PosX, Boundary::Exposed));
        assert!(face_exposed(&grid, 1, 0, 0, FaceDirection::NegX, Boundary::Exposed));
    }

    #[test]
    fn test_boundary_mode_controls_edge_faces() {
        let grid = VoxelGrid::filled(2, 2, BlockType::Dirt);
        let open = VisibilityMap::compute(&grid, Boundary::Exposed);
        let sealed = VisibilityMap::compute(&grid, Boundary::Sealed);
        assert_eq!(open.total_faces(), 6 * 4);
        assert_eq!(sealed.total_faces(), 0);
    }

    #[test]
    fn test_air_and_outside_are_never_obscured_or_renderable() {
        let grid = VoxelGrid::new(3, 3);
        assert!(!is_obscured(&grid, LocalPos::new(1, 1, 1), Boundary::Sealed));
        assert!(!is_renderable(&grid, LocalPos::new(1, 1, 1), Boundary::Exposed));
        assert!(!is_renderable(&grid, LocalPos::new(5, 1, 1), Boundary::Exposed));
    }
}
