//! Procedural chunk generation: seeded noise, ore veins, terrain layering,
//! tree growth, and replay of recorded edits.

mod generator;
mod noise_field;
mod ore;
mod terrain;
mod tree;

pub mod seed;

pub use generator::{ChunkGenerator, generate_chunk};
pub use noise_field::NoiseField;
pub use ore::OreDistributor;
pub use seed::{chunk_rng, derive_chunk_seed, hash_grid};
pub use terrain::{ColumnProfile, TerrainShaper};
pub use tree::TreeGrower;
