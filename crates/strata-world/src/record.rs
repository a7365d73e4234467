//! A chunk that has been integrated into the live scene.

use strata_mesh::{Boundary, MeshBuffer, is_renderable};
use strata_voxel::{ChunkCoord, LocalPos, VoxelGrid};

use crate::events::{SceneEvent, SceneEventBuffer};
use crate::generation::GeneratedChunk;
use crate::instances::InstanceArena;

/// Live state of one loaded chunk.
///
/// Every renderable cell (non-Air, not obscured) owns one instance in
/// `instances`, and its voxel's `render_ref` holds that instance's index.
#[derive(Debug)]
pub struct ChunkRecord {
    coord: ChunkCoord,
    grid: VoxelGrid,
    mesh: MeshBuffer,
    mesh_ready: bool,
    instances: InstanceArena<LocalPos>,
    generation_time_us: u64,
}

impl ChunkRecord {
    /// Wraps a generated chunk and instances every renderable cell.
    pub(crate) fn integrate(chunk: GeneratedChunk, boundary: Boundary) -> Self {
        let mut record = Self {
            coord: chunk.coord,
            grid: chunk.grid,
            mesh: chunk.mesh,
            mesh_ready: true,
            instances: InstanceArena::new(),
            generation_time_us: chunk.generation_time_us,
        };

        let renderable: Vec<LocalPos> = record
            .grid
            .iter()
            .map(|(pos, _)| pos)
            .filter(|&pos| is_renderable(&record.grid, pos, boundary))
            .collect();
        for pos in renderable {
            let index = record.instances.insert(pos);
            record.grid.set_render_ref(pos, Some(index));
        }
        record
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// The last built mesh. Stale after an edit until [`mesh_ready`](Self::mesh_ready).
    pub fn mesh(&self) -> &MeshBuffer {
        &self.mesh
    }

    /// `false` once an edit has changed the grid since the mesh was built.
    pub fn mesh_ready(&self) -> bool {
        self.mesh_ready
    }

    pub fn instances(&self) -> &InstanceArena<LocalPos> {
        &self.instances
    }

    pub fn generation_time_us(&self) -> u64 {
        self.generation_time_us
    }

    pub(crate) fn grid_mut(&mut self) -> &mut VoxelGrid {
        self.mesh_ready = false;
        &mut self.grid
    }

    pub(crate) fn set_mesh(&mut self, mesh: MeshBuffer) {
        self.mesh = mesh;
        self.mesh_ready = true;
    }

    /// Adds or removes the instance at `pos` so it matches the cell's
    /// current renderability. Returns `true` if anything changed.
    pub(crate) fn sync_instance(&mut self, pos: LocalPos, boundary: Boundary, events: &mut SceneEventBuffer) -> bool {
        let wanted = is_renderable(&self.grid, pos, boundary);
        match (wanted, self.instances.contains(pos)) {
            (true, false) => {
                self.add_instance(pos, events);
                true
            }
            (false, true) => {
                self.remove_instance(pos, events);
                true
            }
            _ => false,
        }
    }

    /// Drops and re-evaluates the instance at `pos`; used when the cell's
    /// block itself changed.
    pub(crate) fn replace_instance(&mut self, pos: LocalPos, boundary: Boundary, events: &mut SceneEventBuffer) {
        if self.instances.contains(pos) {
            self.remove_instance(pos, events);
        }
        self.sync_instance(pos, boundary, events);
    }

    fn add_instance(&mut self, pos: LocalPos, events: &mut SceneEventBuffer) {
        let Some(block) = self.grid.block_at(pos) else {
            return;
        };
        let index = self.instances.insert(pos);
        self.grid.set_render_ref(pos, Some(index));
        events.send(SceneEvent::InstanceAdded {
            coord: self.coord,
            pos,
            block,
            index,
        });
    }

    fn remove_instance(&mut self, pos: LocalPos, events: &mut SceneEventBuffer) {
        let Some(removal) = self.instances.remove(pos) else {
            return;
        };
        self.grid.set_render_ref(pos, None);
        events.send(SceneEvent::InstanceRemoved {
            coord: self.coord,
            pos,
            index: removal.removed,
        });

        if let Some((moved, to)) = removal.moved {
            // The moved instance came from the old last slot.
            let from = self.instances.len() as u32;
            self.grid.set_render_ref(moved, Some(to));
            events.send(SceneEvent::InstanceMoved {
                coord: self.coord,
                pos: moved,
                from,
                to,
            });
        }
    }
}
