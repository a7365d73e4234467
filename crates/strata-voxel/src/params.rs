//! Immutable world generation parameters.
//!
//! A [`WorldParams`] is built once when the world is created and then shared
//! read-only by every chunk generation. All structs deserialize with
//! `#[serde(default)]` so partial configuration files fill in the rest.

use serde::{Deserialize, Serialize};

use crate::block::BlockType;

/// Everything the generator and mesher need to build a chunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    /// World seed. Identical seeds produce identical worlds.
    pub seed: u64,
    /// Horizontal chunk edge length in voxels.
    pub chunk_width: u32,
    /// Vertical chunk extent in voxels.
    pub chunk_height: u32,
    /// Surface shape and layering.
    pub terrain: TerrainParams,
    /// Ore types, in placement order. Later entries win where veins overlap.
    pub ores: Vec<OreParams>,
    /// Tree placement and shape.
    pub trees: TreeParams,
    /// Texture atlas geometry, used only for UV computation.
    pub atlas: AtlasLayout,
}

/// Surface height and layer thickness parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Horizontal noise scale: world units per noise unit.
    pub scale: f64,
    /// Height variation as a fraction of chunk height.
    pub magnitude: f64,
    /// Base height as a fraction of chunk height.
    pub offset: f64,
    /// Number of fBm octaves.
    pub octaves: u32,
    /// Amplitude falloff between octaves.
    pub persistence: f64,
    /// Dirt layer depth below the grass line.
    pub surface: ThicknessParams,
    /// Bedrock layer depth above `y = 0`.
    pub bedrock: ThicknessParams,
}

/// A per-column layer thickness: `offset + |noise| * magnitude`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThicknessParams {
    pub scale: f64,
    pub offset: f64,
    pub magnitude: f64,
}

/// One ore type's 3D noise distribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OreParams {
    /// Block placed where the noise exceeds `scarcity`.
    pub block: BlockType,
    /// World units per noise unit. Larger values give larger veins.
    pub scale: f64,
    /// Threshold on noise normalised to `[0, 1]`. Higher is rarer.
    pub scarcity: f64,
}

/// Tree placement and canopy shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Fraction of candidate columns (in normalised noise) that root a tree.
    pub frequency: f64,
    /// Noise frequency for the placement field. High values approach white noise.
    pub noise_scale: f64,
    pub trunk_min: u32,
    pub trunk_max: u32,
    /// Radius bounds of the probabilistic disc in the second canopy layer.
    pub canopy_min_radius: u32,
    pub canopy_max_radius: u32,
}

/// Texture atlas geometry in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasLayout {
    pub tile_size: u32,
    pub width: u32,
    pub height: u32,
}

/// Fixed radius of the square canopy layers.
pub const SQUARE_CANOPY_RADIUS: u32 = 2;

/// Reasons a [`WorldParams`] cannot produce sensible terrain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("chunk dimensions must be non-zero (width {width}, height {height})")]
    EmptyChunk { width: u32, height: u32 },
    #[error("{name} must be positive, got {value}")]
    NonPositiveScale { name: &'static str, value: f64 },
    #[error("{name} range is inverted: min {min} > max {max}")]
    InvertedRange {
        name: &'static str,
        min: u32,
        max: u32,
    },
    #[error("ore block cannot be Air")]
    AirOre,
    #[error("atlas tile {tile_size}px does not fit a {width}x{height}px atlas")]
    TileTooLarge {
        tile_size: u32,
        width: u32,
        height: u32,
    },
    #[error("atlas has {columns} columns but {needed} block textures are required")]
    AtlasTooNarrow { columns: u32, needed: u32 },
}

impl WorldParams {
    /// Horizontal band excluded from tree roots so canopies stay inside the chunk.
    pub fn tree_border(&self) -> u32 {
        self.trees.canopy_max_radius.max(SQUARE_CANOPY_RADIUS)
    }

    /// Checks for inverted ranges and degenerate sizes.
    ///
    /// The generator itself never calls this; it assumes valid input.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.chunk_width == 0 || self.chunk_height == 0 {
            return Err(ParamsError::EmptyChunk {
                width: self.chunk_width,
                height: self.chunk_height,
            });
        }

        let scales = [
            ("terrain.scale", self.terrain.scale),
            ("terrain.surface.scale", self.terrain.surface.scale),
            ("terrain.bedrock.scale", self.terrain.bedrock.scale),
        ];
        for (name, value) in scales {
            if value <= 0.0 || value.is_nan() {
                return Err(ParamsError::NonPositiveScale { name, value });
            }
        }
        for ore in &self.ores {
            if ore.block.is_air() {
                return Err(ParamsError::AirOre);
            }
            if ore.scale <= 0.0 || ore.scale.is_nan() {
                return Err(ParamsError::NonPositiveScale {
                    name: "ore.scale",
                    value: ore.scale,
                });
            }
        }

        let t = &self.trees;
        if t.trunk_min > t.trunk_max {
            return Err(ParamsError::InvertedRange {
                name: "trees.trunk",
                min: t.trunk_min,
                max: t.trunk_max,
            });
        }
        if t.canopy_min_radius > t.canopy_max_radius {
            return Err(ParamsError::InvertedRange {
                name: "trees.canopy_radius",
                min: t.canopy_min_radius,
                max: t.canopy_max_radius,
            });
        }

        self.atlas.validate()
    }
}

impl AtlasLayout {
    /// Number of tile columns across the atlas.
    pub fn columns(&self) -> u32 {
        if self.tile_size == 0 {
            0
        } else {
            self.width / self.tile_size
        }
    }

    fn validate(&self) -> Result<(), ParamsError> {
        if self.tile_size == 0 || self.tile_size > self.width || self.tile_size > self.height {
            return Err(ParamsError::TileTooLarge {
                tile_size: self.tile_size,
                width: self.width,
                height: self.height,
            });
        }
        let needed = BlockType::ALL.len() as u32 - 1;
        if self.columns() < needed {
            return Err(ParamsError::AtlasTooNarrow {
                columns: self.columns(),
                needed,
            });
        }
        Ok(())
    }
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            seed: 0,
            chunk_width: 16,
            chunk_height: 64,
            terrain: TerrainParams::default(),
            ores: default_ores(),
            trees: TreeParams::default(),
            atlas: AtlasLayout::default(),
        }
    }
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            scale: 96.0,
            magnitude: 0.25,
            offset: 0.5,
            octaves: 4,
            persistence: 0.5,
            surface: ThicknessParams {
                scale: 24.0,
                offset: 2.0,
                magnitude: 3.0,
            },
            bedrock: ThicknessParams {
                scale: 8.0,
                offset: 1.0,
                magnitude: 2.0,
            },
        }
    }
}

impl Default for ThicknessParams {
    fn default() -> Self {
        Self {
            scale: 16.0,
            offset: 1.0,
            magnitude: 2.0,
        }
    }
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            frequency: 0.04,
            noise_scale: 0.73,
            trunk_min: 4,
            trunk_max: 6,
            canopy_min_radius: 2,
            canopy_max_radius: 3,
        }
    }
}

impl Default for AtlasLayout {
    fn default() -> Self {
        Self {
            tile_size: 16,
            width: 128,
            height: 16,
        }
    }
}

/// Coal is common and shallow-veined; iron is rarer and listed last so it
/// wins where the two overlap.
pub fn default_ores() -> Vec<OreParams> {
    vec![
        OreParams {
            block: BlockType::CoalOre,
            scale: 12.0,
            scarcity: 0.78,
        },
        OreParams {
            block: BlockType::IronOre,
            scale: 9.0,
            scarcity: 0.84,
        },
    ]
}
