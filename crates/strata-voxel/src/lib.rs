//! Voxel data model: block types, dense chunk grids, chunk coordinates, world
//! parameters, the player edit store, and the chunk load queue.

pub mod block;
pub mod coord;
pub mod edit_store;
pub mod grid;
pub mod load_queue;
pub mod params;

pub use block::{BlockType, UnknownBlock, Voxel};
pub use coord::{ChunkCoord, LocalPos, chunk_local_to_world, world_to_chunk_local};
pub use edit_store::{EditRecord, EditStore};
pub use grid::VoxelGrid;
pub use load_queue::ChunkLoadQueue;
pub use params::{
    AtlasLayout, OreParams, ParamsError, SQUARE_CANOPY_RADIUS, TerrainParams, ThicknessParams,
    TreeParams, WorldParams, default_ores,
};
