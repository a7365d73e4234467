//! Block types and the per-cell voxel state stored in a grid.

use serde::{Deserialize, Serialize};

/// Error returned when a raw byte does not name any [`BlockType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown block type id {0}")]
pub struct UnknownBlock(pub u8);

/// The material of a single voxel.
///
/// The discriminant is stable: it is the wire value used by edit records and
/// `block as u32 - 1` is the block's texture atlas column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space. Never produces geometry.
    #[default]
    Air = 0,
    Grass = 1,
    Dirt = 2,
    Stone = 3,
    Bedrock = 4,
    OakLog = 5,
    /// Semi-transparent foliage.
    Leaves = 6,
    CoalOre = 7,
    IronOre = 8,
}

impl BlockType {
    /// Every block type, in discriminant order.
    pub const ALL: [BlockType; 9] = [
        Self::Air,
        Self::Grass,
        Self::Dirt,
        Self::Stone,
        Self::Bedrock,
        Self::OakLog,
        Self::Leaves,
        Self::CoalOre,
        Self::IronOre,
    ];

    /// Returns `true` for [`BlockType::Air`].
    #[inline]
    pub fn is_air(self) -> bool {
        self == Self::Air
    }

    /// Returns `true` for blocks that let neighbouring faces show through.
    #[inline]
    pub fn is_translucent(self) -> bool {
        self == Self::Leaves
    }

    /// Atlas column for this block's texture, or `None` for Air.
    pub fn atlas_column(self) -> Option<u32> {
        (self as u32).checked_sub(1)
    }

    /// Raw wire value.
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for BlockType {
    type Error = UnknownBlock;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(UnknownBlock(value))
    }
}

/// State of one grid cell.
///
/// `render_ref` belongs to the rendering side: the core stores and clears it
/// but never interprets it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Voxel {
    /// The cell's material.
    pub block: BlockType,
    /// Index of this cell's render instance, if one exists.
    pub render_ref: Option<u32>,
}

impl Voxel {
    /// An empty cell.
    pub const AIR: Self = Self {
        block: BlockType::Air,
        render_ref: None,
    };

    /// A cell of the given block with no render instance.
    pub fn new(block: BlockType) -> Self {
        Self {
            block,
            render_ref: None,
        }
    }
}
