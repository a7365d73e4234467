//! Greedy meshing algorithm: merges coplanar, same-type adjacent faces into
//! larger rectangular quads to reduce triangle count.
//!
//! Each direction is swept one layer at a time. A 2D mask over the layer
//! records, per cell, the block whose face points that way and is exposed
//! (obscured cells never enter the mask). Rectangles are then pulled out of
//! the mask by growing width first and height second. For the vertical
//! directions each layer is a horizontal `y` slice and the mask spans `(x, z)`.

use strata_voxel::{AtlasLayout, BlockType, VoxelGrid};

use crate::face_direction::FaceDirection;
use crate::mesh_buffer::MeshBuffer;
use crate::occlusion::{Boundary, VisibilityMap};

/// Converts abstract axis coordinates back to concrete `(x, y, z)`.
///
/// `layer_axis`, `u_axis`, `v_axis` are 0=X, 1=Y, 2=Z.
fn axes_to_xyz(axes: (usize, usize, usize), layer: i32, u: i32, v: i32) -> (i32, i32, i32) {
    let mut coords = [0i32; 3];
    coords[axes.0] = layer;
    coords[axes.1] = u;
    coords[axes.2] = v;
    (coords[0], coords[1], coords[2])
}

/// Performs greedy meshing on a grid.
///
/// Covers exactly the surface [`crate::culled_mesh`] covers, with fewer quads.
pub fn greedy_mesh(grid: &VoxelGrid, atlas: &AtlasLayout, boundary: Boundary) -> MeshBuffer {
    let mut mesh = MeshBuffer::new();
    if grid.is_empty() {
        return mesh;
    }

    let visibility = VisibilityMap::compute(grid, boundary);
    let dims = [grid.width() as i32, grid.height() as i32, grid.width() as i32];
    let mut mask: Vec<Option<BlockType>> = Vec::new();

    for direction in FaceDirection::ALL {
        let axes = direction.sweep_axes();
        let (size_l, size_u, size_v) = (dims[axes.0], dims[axes.1], dims[axes.2]);
        let row = size_u as usize;

        for layer in 0..size_l {
            // Build the layer mask.
            mask.clear();
            mask.resize(row * size_v as usize, None);
            for v in 0..size_v {
                for u in 0..size_u {
                    let (x, y, z) = axes_to_xyz(axes, layer, u, v);
                    if visibility.get(x, y, z).is_visible(direction) {
                        mask[v as usize * row + u as usize] = grid.block(x, y, z);
                    }
                }
            }

            // Extract rectangles.
            for v in 0..size_v {
                for u in 0..size_u {
                    let Some(block) = mask[v as usize * row + u as usize] else {
                        continue;
                    };
                    let at = |uu: i32, vv: i32| vv as usize * row + uu as usize;

                    // Extend width along u-axis.
                    let mut w = 1;
                    while u + w < size_u && mask[at(u + w, v)] == Some(block) {
                        w += 1;
                    }

                    // Extend height along v-axis.
                    let mut h = 1;
                    'outer: while v + h < size_v {
                        for du in 0..w {
                            if mask[at(u + du, v + h)] != Some(block) {
                                break 'outer;
                            }
                        }
                        h += 1;
                    }

                    // Consume the rectangle.
                    for dv in 0..h {
                        for du in 0..w {
                            mask[at(u + du, v + dv)] = None;
                        }
                    }

                    mesh.push_quad(direction, layer, u, v, w as u32, h as u32, block, atlas);
                }
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culled::culled_mesh;

    fn atlas() -> AtlasLayout {
        AtlasLayout::default()
    }

    /// Per-direction covered area plus the set of unit cells each direction's
    /// quads project onto.
    fn footprint(mesh: &MeshBuffer) -> Vec<(u32, Vec<(i32, i32, i32)>)> {
        FaceDirection::ALL
            .iter()
            .map(|&dir| {
                let (l, u, v) = dir.sweep_axes();
                let mut cells = Vec::new();
                for (q, quad) in mesh.quads.iter().enumerate() {
                    if quad.direction != dir {
                        continue;
                    }
                    let p = mesh.positions[q * 4];
                    let (pl, pu, pv) = (p[l] as i32, p[u] as i32, p[v] as i32);
                    for dv in 0..quad.height as i32 {
                        for du in 0..quad.width as i32 {
                            cells.push((pl, pu + du, pv + dv));
                        }
                    }
                }
                cells.sort_unstable();
                (mesh.area_for_direction(dir), cells)
            })
            .collect()
    }

    fn assert_equivalent(grid: &VoxelGrid, boundary: Boundary) {
        let greedy = greedy_mesh(grid, &atlas(), boundary);
        let culled = culled_mesh(grid, &atlas(), boundary);
        assert_eq!(footprint(&greedy), footprint(&culled));
        assert!(greedy.quad_count() <= culled.quad_count());
    }

    #[test]
    fn test_flat_surface_single_type_produces_one_quad() {
        let mut grid = VoxelGrid::new(8, 4);
        for z in 0..8 {
            for x in 0..8 {
                grid.set_block(x, 0, z, BlockType::Stone);
            }
        }
        let mesh = greedy_mesh(&grid, &atlas(), Boundary::Exposed);
        assert_eq!(mesh.count_quads_for_direction(FaceDirection::PosY), 1);
        assert_eq!(mesh.area_for_direction(FaceDirection::PosY), 64);
        assert_eq!(mesh.quad_count(), 6);
    }

    #[test]
    fn test_merged_quad_repeats_tile_per_cell() {
        let grid = {
            let mut grid = VoxelGrid::new(4, 2);
            for z in 0..4 {
                for x in 0..4 {
                    grid.set_block(x, 0, z, BlockType::Dirt);
                }
            }
            grid
        };
        let mesh = greedy_mesh(&grid, &atlas(), Boundary::Exposed);
        let top = mesh
            .quads
            .iter()
            .position(|q| q.direction == FaceDirection::PosY)
            .unwrap();
        let corners = &mesh.tile_coords[top * 4..top * 4 + 4];
        assert!(corners.contains(&[4.0, 4.0]));

        let culled = culled_mesh(&grid, &atlas(), Boundary::Exposed);
        assert!(culled.tile_coords.iter().all(|c| c[0] <= 1.0 && c[1] <= 1.0));
    }

    #[test]
    fn test_checkerboard_produces_many_quads() {
        let mut grid = VoxelGrid::new(4, 2);
        for z in 0..4 {
            for x in 0..4 {
                let block = if (x + z) % 2 == 0 { BlockType::Stone } else { BlockType::Dirt };
                grid.set_block(x, 0, z, block);
            }
        }
        let mesh = greedy_mesh(&grid, &atlas(), Boundary::Exposed);
        assert_eq!(mesh.count_quads_for_direction(FaceDirection::PosY), 16);
        assert_equivalent(&grid, Boundary::Exposed);
    }

    #[test]
    fn test_single_cell_emits_six_quads() {
        let mut grid = VoxelGrid::new(5, 5);
        grid.set_block(2, 2, 2, BlockType::Leaves);
        let mesh = greedy_mesh(&grid, &atlas(), Boundary::Exposed);
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_solid_grid_emits_one_quad_per_side() {
        let grid = VoxelGrid::filled(4, 6, BlockType::Stone);
        let mesh = greedy_mesh(&grid, &atlas(), Boundary::Exposed);
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.area_for_direction(FaceDirection::PosY), 16);
        assert_eq!(mesh.area_for_direction(FaceDirection::NegX), 24);
    }

    #[test]
    fn test_solid_grid_sealed_emits_nothing() {
        let grid = VoxelGrid::filled(4, 4, BlockType::Stone);
        let mesh = greedy_mesh(&grid, &atlas(), Boundary::Sealed);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_empty_grid_emits_nothing() {
        assert!(greedy_mesh(&VoxelGrid::new(4, 4), &atlas(), Boundary::Exposed).is_empty());
        assert!(greedy_mesh(&VoxelGrid::new(0, 0), &atlas(), Boundary::Exposed).is_empty());
    }

    #[test]
    fn test_mixed_types_do_not_merge() {
        let mut grid = VoxelGrid::new(4, 1);
        grid.set_block(0, 0, 0, BlockType::Stone);
        grid.set_block(1, 0, 0, BlockType::Dirt);
        let mesh = greedy_mesh(&grid, &atlas(), Boundary::Exposed);
        assert_eq!(mesh.count_quads_for_direction(FaceDirection::PosY), 2);
    }

    #[test]
    fn test_greedy_matches_culled_surface() {
        // Staircase with a leaf block and an ore pocket.
        let mut grid = VoxelGrid::new(6, 6);
        for z in 0..6 {
            for x in 0..6 {
                for y in 0..=(x.min(z) % 4) {
                    grid.set_block(x, y, z, BlockType::Stone);
                }
            }
        }
        grid.set_block(3, 4, 3, BlockType::Leaves);
        grid.set_block(2, 1, 4, BlockType::CoalOre);
        grid.set_block(5, 0, 5, BlockType::Air);

        assert_equivalent(&grid, Boundary::Exposed);
        assert_equivalent(&grid, Boundary::Sealed);
    }

    #[test]
    fn test_greedy_matches_culled_on_pseudo_random_grids() {
        let mut state = 0x2545_F491_u32;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state
        };
        for _ in 0..8 {
            let mut grid = VoxelGrid::new(5, 5);
            for y in 0..5 {
                for z in 0..5 {
                    for x in 0..5 {
                        let block = BlockType::ALL[(next() % 4) as usize];
                        grid.set_block(x, y, z, block);
                    }
                }
            }
            assert_equivalent(&grid, Boundary::Exposed);
        }
    }
}
