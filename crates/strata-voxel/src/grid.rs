//! Dense voxel storage for one chunk column.
//!
//! [`VoxelGrid`] holds `width × height × width` cells. Every access is
//! bounds-checked: reads outside the grid return `None` ("no voxel") so that
//! neighbour lookups at chunk edges need no special casing, and writes outside
//! the grid are ignored with a warning.

use crate::block::{BlockType, Voxel};
use crate::coord::LocalPos;

/// A fixed-size 3D array of [`Voxel`]s.
///
/// Linear layout is `x + z * width + y * width * width`, so one horizontal
/// layer is contiguous. Dimensions never change after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    width: u32,
    height: u32,
    voxels: Vec<Voxel>,
}

impl VoxelGrid {
    /// Creates a grid filled with Air.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * width as usize * height as usize;
        Self {
            width,
            height,
            voxels: vec![Voxel::AIR; len],
        }
    }

    /// Creates a grid with every cell set to `block`.
    pub fn filled(width: u32, height: u32, block: BlockType) -> Self {
        let mut grid = Self::new(width, height);
        grid.fill(block);
        grid
    }

    /// Horizontal edge length.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Vertical extent.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn volume(&self) -> usize {
        self.voxels.len()
    }

    /// Returns `true` if the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Returns `true` if `(x, y, z)` addresses a cell of this grid.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && z >= 0
            && y >= 0
            && (x as u32) < self.width
            && (z as u32) < self.width
            && (y as u32) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        let w = self.width as usize;
        Some(x as usize + z as usize * w + y as usize * w * w)
    }

    /// The voxel at `(x, y, z)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<&Voxel> {
        self.index(x, y, z).map(|i| &self.voxels[i])
    }

    /// Mutable access to the voxel at `(x, y, z)`.
    pub fn get_mut(&mut self, x: i32, y: i32, z: i32) -> Option<&mut Voxel> {
        self.index(x, y, z).map(move |i| &mut self.voxels[i])
    }

    /// The block type at `(x, y, z)`, or `None` outside the grid.
    #[inline]
    pub fn block(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        self.get(x, y, z).map(|v| v.block)
    }

    /// Convenience wrapper over [`block`](Self::block) taking a [`LocalPos`].
    #[inline]
    pub fn block_at(&self, pos: LocalPos) -> Option<BlockType> {
        self.block(pos.x, pos.y, pos.z)
    }

    /// Sets the block at `(x, y, z)` and clears any render reference.
    ///
    /// Returns `false` (and logs a warning) if the position is out of bounds.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> bool {
        match self.get_mut(x, y, z) {
            Some(voxel) => {
                *voxel = Voxel::new(block);
                true
            }
            None => {
                tracing::warn!("VoxelGrid::set_block out of bounds: ({}, {}, {})", x, y, z);
                false
            }
        }
    }

    /// Sets the block only if the cell currently holds Air.
    ///
    /// Returns `true` when the write happened. Out-of-bounds positions are
    /// skipped silently; generation passes probe past the grid edges routinely.
    pub fn set_if_air(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> bool {
        match self.get_mut(x, y, z) {
            Some(voxel) if voxel.block.is_air() => {
                *voxel = Voxel::new(block);
                true
            }
            _ => false,
        }
    }

    /// Stores the render instance handle for the cell at `pos`.
    pub fn set_render_ref(&mut self, pos: LocalPos, render_ref: Option<u32>) {
        if let Some(voxel) = self.get_mut(pos.x, pos.y, pos.z) {
            voxel.render_ref = render_ref;
        }
    }

    /// Sets every cell to `block`.
    pub fn fill(&mut self, block: BlockType) {
        self.voxels.fill(Voxel::new(block));
    }

    /// Number of cells whose block is not Air.
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| !v.block.is_air()).count()
    }

    /// Iterates every cell as `(position, voxel)`, layer by layer from `y = 0`.
    pub fn iter(&self) -> impl Iterator<Item = (LocalPos, &Voxel)> + '_ {
        let w = self.width as usize;
        self.voxels.iter().enumerate().map(move |(i, voxel)| {
            let x = i % w;
            let z = (i / w) % w;
            let y = i / (w * w);
            (LocalPos::new(x as i32, y as i32, z as i32), voxel)
        })
    }
}
