//! Terrain pass: column heights and layering.
//!
//! Each `(x, z)` column gets a surface height from a fractal height field and
//! two thickness values (dirt and bedrock) from secondary fields. Below the
//! surface the column is Bedrock, then Stone (only where still Air, so ore
//! survives), then Dirt; the surface cell is Grass and everything above is
//! forced to Air.

use strata_voxel::{BlockType, ChunkCoord, TerrainParams, ThicknessParams, VoxelGrid};

use crate::noise_field::NoiseField;

const HEIGHT_SALT: u64 = 0x0_7E11;
const SURFACE_SALT: u64 = 0x0_5F0C;
const BEDROCK_SALT: u64 = 0x0_BED0;

/// Layer boundaries of one column, in local `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnProfile {
    /// `y` of the Grass cell.
    pub surface: i32,
    /// Depth of the Dirt band below the surface.
    pub surface_thickness: i32,
    /// Number of Bedrock cells above `y = 0`.
    pub bedrock_thickness: i32,
}

/// Samples column profiles and writes terrain layers into grids.
pub struct TerrainShaper {
    params: TerrainParams,
    height: NoiseField,
    surface: NoiseField,
    bedrock: NoiseField,
}

impl TerrainShaper {
    /// Builds the height and thickness fields for `seed`.
    pub fn new(seed: u64, params: &TerrainParams) -> Self {
        Self {
            params: params.clone(),
            height: NoiseField::new(seed, HEIGHT_SALT)
                .with_octaves(params.octaves, params.persistence),
            surface: NoiseField::new(seed, SURFACE_SALT),
            bedrock: NoiseField::new(seed, BEDROCK_SALT),
        }
    }

    /// Profile of the world column `(wx, wz)` in a chunk `chunk_height` tall.
    pub fn column(&self, wx: f64, wz: f64, chunk_height: u32) -> ColumnProfile {
        let p = &self.params;
        let n = self.height.sample_2d(wx / p.scale, wz / p.scale);
        let fraction = p.offset + p.magnitude * n;
        let max_y = chunk_height.saturating_sub(1) as f64;
        let surface = libm::floor(fraction * chunk_height as f64).clamp(0.0, max_y) as i32;

        ColumnProfile {
            surface,
            surface_thickness: thickness(&self.surface, &p.surface, wx, wz),
            bedrock_thickness: thickness(&self.bedrock, &p.bedrock, wx, wz),
        }
    }

    /// Writes terrain layers into every column of `grid`.
    pub fn apply(&self, grid: &mut VoxelGrid, coord: ChunkCoord) {
        let (ox, oz) = coord.world_origin(grid.width());
        let w = grid.width() as i32;
        let h = grid.height() as i32;

        for z in 0..w {
            for x in 0..w {
                let column = self.column((ox + x as i64) as f64, (oz + z as i64) as f64, grid.height());
                for y in 0..h {
                    if y < column.surface {
                        if y < column.bedrock_thickness {
                            grid.set_block(x, y, z, BlockType::Bedrock);
                        } else if y < column.surface - column.surface_thickness {
                            grid.set_if_air(x, y, z, BlockType::Stone);
                        } else {
                            grid.set_block(x, y, z, BlockType::Dirt);
                        }
                    } else if y == column.surface {
                        grid.set_block(x, y, z, BlockType::Grass);
                    } else {
                        grid.set_block(x, y, z, BlockType::Air);
                    }
                }
            }
        }
    }
}

fn thickness(field: &NoiseField, params: &ThicknessParams, wx: f64, wz: f64) -> i32 {
    let n = field.sample_2d(wx / params.scale, wz / params.scale);
    libm::floor(params.offset + libm::fabs(n) * params.magnitude).max(0.0) as i32
}
