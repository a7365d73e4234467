//! Chunk streaming around an observer: background generation, idle-scheduled
//! scene integration, and single-voxel edits with incremental instance updates.

pub mod controller;
pub mod events;
pub mod generation;
pub mod instances;
pub mod record;
pub mod throttle;
pub mod visibility;

pub use controller::{EditOutcome, QueueTask, StreamingSettings, WorldController, WorldStats};
pub use events::{SceneEvent, SceneEventBuffer};
pub use generation::{
    GeneratedChunk, GenerationError, GenerationRequest, GenerationService, default_worker_count,
};
pub use instances::{InstanceArena, SwapRemoval};
pub use record::ChunkRecord;
pub use throttle::DrainThrottle;
pub use visibility::{observer_chunk, visible_coords};
