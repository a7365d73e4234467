//! Texture atlas lookup: block type to UV rectangle.

use strata_voxel::{AtlasLayout, BlockType};

/// UV rectangle of a block's atlas tile as `[u_min, v_min, u_max, v_max]`.
///
/// The tile column is `block - 1`; all tiles sit in the first row. Returns
/// `None` for Air or a degenerate atlas.
pub fn tile_uv(atlas: &AtlasLayout, block: BlockType) -> Option<[f32; 4]> {
    let column = block.atlas_column()?;
    if atlas.width == 0 || atlas.height == 0 {
        return None;
    }
    let tw = atlas.tile_size as f32 / atlas.width as f32;
    let th = atlas.tile_size as f32 / atlas.height as f32;
    let u0 = column as f32 * tw;
    Some([u0, 0.0, u0 + tw, th])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grass_uses_first_column() {
        let atlas = AtlasLayout {
            tile_size: 16,
            width: 128,
            height: 32,
        };
        assert_eq!(tile_uv(&atlas, BlockType::Grass), Some([0.0, 0.0, 0.125, 0.5]));
        assert_eq!(tile_uv(&atlas, BlockType::Stone), Some([0.25, 0.0, 0.375, 0.5]));
    }

    #[test]
    fn test_air_has_no_tile() {
        assert_eq!(tile_uv(&AtlasLayout::default(), BlockType::Air), None);
    }

    #[test]
    fn test_degenerate_atlas() {
        let atlas = AtlasLayout {
            tile_size: 16,
            width: 0,
            height: 0,
        };
        assert_eq!(tile_uv(&atlas, BlockType::Dirt), None);
    }
}
