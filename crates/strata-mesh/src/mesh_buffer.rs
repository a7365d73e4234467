//! Flat, render-ready geometry produced by the meshers.

use strata_voxel::{AtlasLayout, BlockType};

use crate::atlas::tile_uv;
use crate::face_direction::FaceDirection;

/// Metadata for a single emitted quad, used for statistics and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuadInfo {
    /// Which face direction this quad belongs to.
    pub direction: FaceDirection,
    /// Block the quad was emitted for.
    pub block: BlockType,
    /// Extent along the direction's `u` axis, in voxels.
    pub width: u32,
    /// Extent along the direction's `v` axis, in voxels.
    pub height: u32,
}

/// Separate position/normal/UV streams plus a triangle index list.
///
/// Positions are chunk-local. Each quad contributes four vertices and six
/// indices `(a, b, c, a, c, d)` wound counter-clockwise when viewed from the
/// side its normal points to.
///
/// `uvs` span one atlas tile per quad whatever its size. `tile_coords` run
/// from `(0, 0)` to `(w, h)` in cells, so a shader repeats the tile across a
/// merged quad by sampling `tile_min + fract(tile_coords) * tile_size`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub tile_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    /// One entry per emitted quad, in emission order.
    pub quads: Vec<QuadInfo>,
}

impl MeshBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes one quad covering `w × h` cells of the face plane.
    ///
    /// `layer`, `u`, `v` are cell coordinates along the direction's sweep axes
    /// (see [`FaceDirection::sweep_axes`]).
    #[allow(clippy::too_many_arguments)]
    pub fn push_quad(
        &mut self,
        direction: FaceDirection,
        layer: i32,
        u: i32,
        v: i32,
        w: u32,
        h: u32,
        block: BlockType,
        atlas: &AtlasLayout,
    ) {
        let (layer_axis, u_axis, v_axis) = direction.sweep_axes();
        let normal = direction.normal();

        // Positive faces sit on the far side of the cell.
        let plane = if direction.is_positive() {
            layer as f32 + 1.0
        } else {
            layer as f32
        };

        let (u0, v0) = (u as f32, v as f32);
        let (u1, v1) = (u0 + w as f32, v0 + h as f32);
        let corners = [(u0, v0), (u1, v0), (u1, v1), (u0, v1)];

        let [s0, t0, s1, t1] = tile_uv(atlas, block).unwrap_or([0.0; 4]);
        let tex = [[s0, t0], [s1, t0], [s1, t1], [s0, t1]];
        let (wf, hf) = (w as f32, h as f32);
        let cells = [[0.0, 0.0], [wf, 0.0], [wf, hf], [0.0, hf]];

        let base = self.positions.len() as u32;
        for (i, &(cu, cv)) in corners.iter().enumerate() {
            let mut pos = [0.0_f32; 3];
            pos[layer_axis] = plane;
            pos[u_axis] = cu;
            pos[v_axis] = cv;
            self.positions.push(pos);
            self.normals.push(normal);
            self.uvs.push(tex[i]);
            self.tile_coords.push(cells[i]);
        }

        // `u × v` is the positive axis, so negative faces reverse the winding.
        if direction.is_positive() {
            self.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        } else {
            self.indices
                .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }

        self.quads.push(QuadInfo {
            direction,
            block,
            width: w,
            height: h,
        });
    }

    /// Returns `true` if no geometry was emitted.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of quads emitted.
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    /// Number of triangles in the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of quads facing `direction`.
    pub fn count_quads_for_direction(&self, direction: FaceDirection) -> usize {
        self.quads.iter().filter(|q| q.direction == direction).count()
    }

    /// Total face area (in unit cell faces) covered by quads facing `direction`.
    pub fn area_for_direction(&self, direction: FaceDirection) -> u32 {
        self.quads
            .iter()
            .filter(|q| q.direction == direction)
            .map(|q| q.width * q.height)
            .sum()
    }

    /// Position stream as raw bytes for upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normal stream as raw bytes for upload.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// UV stream as raw bytes for upload.
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Tile-repeat stream as raw bytes for upload.
    pub fn tile_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tile_coords)
    }

    /// Index stream as raw bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn triangle_normal(mesh: &MeshBuffer, tri: usize) -> Vec3 {
        let i = &mesh.indices[tri * 3..tri * 3 + 3];
        let a = Vec3::from(mesh.positions[i[0] as usize]);
        let b = Vec3::from(mesh.positions[i[1] as usize]);
        let c = Vec3::from(mesh.positions[i[2] as usize]);
        (b - a).cross(c - a).normalize()
    }

    #[test]
    fn test_winding_matches_declared_normal() {
        for dir in FaceDirection::ALL {
            let mut mesh = MeshBuffer::new();
            mesh.push_quad(dir, 0, 0, 0, 2, 3, BlockType::Stone, &AtlasLayout::default());
            for tri in 0..2 {
                let n = triangle_normal(&mesh, tri);
                assert!(
                    n.abs_diff_eq(Vec3::from(dir.normal()), 1e-6),
                    "{dir:?} triangle {tri} faces {n}"
                );
            }
        }
    }

    #[test]
    fn test_quad_streams_stay_in_step() {
        let mut mesh = MeshBuffer::new();
        mesh.push_quad(FaceDirection::PosY, 1, 0, 0, 1, 1, BlockType::Grass, &AtlasLayout::default());
        mesh.push_quad(FaceDirection::NegX, 0, 2, 2, 1, 4, BlockType::Dirt, &AtlasLayout::default());
        assert_eq!(mesh.positions.len(), 8);
        assert_eq!(mesh.normals.len(), 8);
        assert_eq!(mesh.uvs.len(), 8);
        assert_eq!(mesh.tile_coords.len(), 8);
        assert_eq!(mesh.indices.len(), 12);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.area_for_direction(FaceDirection::NegX), 4);
        assert_eq!(mesh.position_bytes().len(), 8 * 12);
        assert_eq!(mesh.index_bytes().len(), 12 * 4);
    }

    #[test]
    fn test_top_face_sits_above_cell() {
        let mut mesh = MeshBuffer::new();
        mesh.push_quad(FaceDirection::PosY, 2, 0, 0, 1, 1, BlockType::Grass, &AtlasLayout::default());
        assert!(mesh.positions.iter().all(|p| p[1] == 3.0));
        let mut mesh = MeshBuffer::new();
        mesh.push_quad(FaceDirection::NegY, 2, 0, 0, 1, 1, BlockType::Grass, &AtlasLayout::default());
        assert!(mesh.positions.iter().all(|p| p[1] == 2.0));
    }

    #[test]
    fn test_uvs_come_from_atlas_column() {
        let mut mesh = MeshBuffer::new();
        let atlas = AtlasLayout::default();
        mesh.push_quad(FaceDirection::PosZ, 0, 0, 0, 1, 1, BlockType::Dirt, &atlas);
        let expected = tile_uv(&atlas, BlockType::Dirt).unwrap();
        assert_eq!(mesh.uvs[0], [expected[0], expected[1]]);
        assert_eq!(mesh.uvs[2], [expected[2], expected[3]]);
    }

    #[test]
    fn test_tile_coords_cover_quad_extent() {
        let mut mesh = MeshBuffer::new();
        let atlas = AtlasLayout::default();
        mesh.push_quad(FaceDirection::PosY, 0, 0, 0, 3, 2, BlockType::Stone, &atlas);
        assert_eq!(mesh.tile_coords, vec![[0.0, 0.0], [3.0, 0.0], [3.0, 2.0], [0.0, 2.0]]);
        let tile = tile_uv(&atlas, BlockType::Stone).unwrap();
        assert_eq!(mesh.uvs[2], [tile[2], tile[3]]);
        assert_eq!(mesh.tile_coord_bytes().len(), 4 * 8);
    }
}
