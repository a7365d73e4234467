//! Chunk streaming and single-voxel edits around a moving observer.
//!
//! Each [`WorldController::update`] does the following:
//!
//! 1. Recomputes the wanted set when the observer crosses into a new chunk.
//!    Loaded chunks outside it get a teardown task. Results still waiting in
//!    the load queue for chunks outside it are dropped.
//! 2. Drains finished generation results. Results for coordinates that are no
//!    longer wanted are discarded. The rest are queued for integration.
//! 3. Submits generation requests for wanted chunks that are neither loaded
//!    nor in flight, nearest first.
//! 4. Runs at most one queued idle task, subject to the drain throttle.
//!
//! All scene mutation happens on the caller's thread. Workers only see owned
//! copies of the coordinate and its recorded edits.

use std::time::{Duration, Instant};

use glam::DVec3;
use rustc_hash::{FxHashMap, FxHashSet};
use strata_mesh::MeshOptions;
use strata_voxel::{BlockType, ChunkCoord, ChunkLoadQueue, EditStore, WorldParams, world_to_chunk_local};

use crate::events::{SceneEvent, SceneEventBuffer};
use crate::generation::{
    GeneratedChunk, GenerationError, GenerationRequest, GenerationService, default_worker_count,
};
use crate::record::ChunkRecord;
use crate::throttle::DrainThrottle;
use crate::visibility::{observer_chunk, visible_coords};

/// Streaming knobs for a [`WorldController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamingSettings {
    /// Chebyshev radius of the loaded square, in chunks.
    pub render_distance: u32,
    /// Minimum time between idle-task drains while the observer moves.
    pub drain_interval: Duration,
    /// Generation workers. `0` derives a count from the CPU count.
    pub worker_threads: usize,
    /// Generation requests that may wait in the worker channel.
    pub request_capacity: usize,
    pub mesh: MeshOptions,
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self {
            render_distance: 4,
            drain_interval: Duration::from_millis(50),
            worker_threads: 0,
            request_capacity: 256,
            mesh: MeshOptions::default(),
        }
    }
}

/// Work deferred to an idle window.
#[derive(Debug)]
pub enum QueueTask {
    /// Splice a generated chunk into the scene.
    Integrate(GeneratedChunk),
    /// Remove a loaded chunk from the scene.
    Teardown,
}

/// Result of a single-voxel edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// Recorded in the edit store. `live` is `true` when the owning chunk was
    /// loaded and its grid and instances were updated immediately.
    Applied { live: bool },
    /// `y` lies outside the world's vertical extent, or the column lies beyond
    /// the chunk index range; nothing was recorded.
    OutOfBounds,
}

/// Snapshot of the controller's bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub loaded: usize,
    /// Chunks submitted for generation and not yet integrated or discarded.
    pub requested: usize,
    /// Idle tasks waiting in the load queue.
    pub queued: usize,
    /// Requests queued or executing on workers.
    pub in_flight: usize,
    /// Generation results dropped because their chunk was no longer wanted.
    pub discarded: u64,
    /// Cells recorded in the edit store.
    pub edits: usize,
}

/// Owns every loaded chunk, the edit store, and the generation service.
pub struct WorldController {
    params: WorldParams,
    settings: StreamingSettings,
    service: GenerationService,
    queue: ChunkLoadQueue<QueueTask>,
    loaded: FxHashMap<ChunkCoord, ChunkRecord>,
    requested: FxHashSet<ChunkCoord>,
    wanted: FxHashSet<ChunkCoord>,
    /// Wanted coordinates, nearest first.
    wanted_order: Vec<ChunkCoord>,
    center: Option<ChunkCoord>,
    last_observer: Option<DVec3>,
    throttle: DrainThrottle,
    edits: EditStore,
    events: SceneEventBuffer,
    discarded: u64,
}

impl WorldController {
    /// Starts the generation workers. Nothing is requested until the first
    /// [`update`](Self::update).
    pub fn new(params: WorldParams, settings: StreamingSettings) -> Result<Self, GenerationError> {
        if let Err(e) = params.validate() {
            tracing::warn!("world parameters look invalid: {e}");
        }
        if params.chunk_width <= 2 * params.tree_border() {
            tracing::debug!(
                "chunk width {} leaves no room for tree roots inside a {}-cell border",
                params.chunk_width,
                params.tree_border()
            );
        }
        let workers = match settings.worker_threads {
            0 => default_worker_count(),
            n => n,
        };
        let service = GenerationService::new(&params, settings.mesh, workers, settings.request_capacity)?;
        tracing::info!(
            "world controller ready: seed {}, chunk {}x{}, render distance {}, {} workers",
            params.seed,
            params.chunk_width,
            params.chunk_height,
            settings.render_distance,
            service.worker_count()
        );

        Ok(Self {
            throttle: DrainThrottle::new(settings.drain_interval),
            params,
            settings,
            service,
            queue: ChunkLoadQueue::new(),
            loaded: FxHashMap::default(),
            requested: FxHashSet::default(),
            wanted: FxHashSet::default(),
            wanted_order: Vec::new(),
            center: None,
            last_observer: None,
            edits: EditStore::new(),
            events: SceneEventBuffer::new(),
            discarded: 0,
        })
    }

    /// Advances streaming for an observer at `observer` (world space).
    pub fn update(&mut self, observer: DVec3, now: Instant) {
        let center = observer_chunk(observer, self.params.chunk_width);
        if self.center != Some(center) {
            self.retarget(center);
        }

        for chunk in self.service.drain_results() {
            self.accept_result(chunk);
        }

        self.submit_missing();

        let moving = self.last_observer.is_some_and(|last| last != observer);
        self.last_observer = Some(observer);
        if !self.queue.is_empty() && self.throttle.should_drain(now, moving) {
            self.run_idle_task();
        }
    }

    /// Runs the oldest queued idle task. Returns the coordinate it concerned,
    /// or `None` if the queue was empty.
    pub fn run_idle_task(&mut self) -> Option<ChunkCoord> {
        let (coord, task) = self.queue.dequeue()?;
        match task {
            QueueTask::Integrate(chunk) => self.integrate(chunk),
            QueueTask::Teardown => self.teardown(coord),
        }
        Some(coord)
    }

    /// Runs every queued idle task. Returns how many ran.
    pub fn flush_idle_tasks(&mut self) -> usize {
        let mut ran = 0;
        while self.run_idle_task().is_some() {
            ran += 1;
        }
        ran
    }

    /// Places `block` at a world position.
    pub fn add_block(&mut self, wx: i64, wy: i64, wz: i64, block: BlockType) -> EditOutcome {
        self.edit(wx, wy, wz, block)
    }

    /// Clears a world position to Air.
    pub fn remove_block(&mut self, wx: i64, wy: i64, wz: i64) -> EditOutcome {
        self.edit(wx, wy, wz, BlockType::Air)
    }

    fn edit(&mut self, wx: i64, wy: i64, wz: i64, block: BlockType) -> EditOutcome {
        if wy < 0 || wy >= self.params.chunk_height as i64 {
            tracing::trace!("ignoring edit at ({wx}, {wy}, {wz}): outside world height");
            return EditOutcome::OutOfBounds;
        }
        let Some((coord, local)) = world_to_chunk_local(wx, wy, wz, self.params.chunk_width) else {
            tracing::trace!("ignoring edit at ({wx}, {wy}, {wz}): outside chunk index range");
            return EditOutcome::OutOfBounds;
        };
        self.edits.set(coord, local, block);

        let Some(record) = self.loaded.get_mut(&coord) else {
            return EditOutcome::Applied { live: false };
        };

        let boundary = self.settings.mesh.boundary;
        let grid = record.grid_mut();
        grid.set_block(local.x, local.y, local.z, block);
        record.replace_instance(local, boundary, &mut self.events);
        // Neighbours in adjacent chunks are left alone: edge cells never
        // change renderability, since the boundary mode decides them.
        for neighbor in local.neighbors() {
            record.sync_instance(neighbor, boundary, &mut self.events);
        }
        tracing::debug!(
            "edited chunk ({}, {}) at {:?} -> {:?}",
            coord.x,
            coord.z,
            local,
            block
        );
        EditOutcome::Applied { live: true }
    }

    /// Rebuilds the mesh of a loaded chunk from its current grid.
    ///
    /// Returns `false` if the chunk is not loaded.
    pub fn remesh(&mut self, coord: ChunkCoord) -> bool {
        let Some(record) = self.loaded.get_mut(&coord) else {
            return false;
        };
        let mesh = strata_mesh::mesh(record.grid(), &self.params.atlas, self.settings.mesh);
        record.set_mesh(mesh);
        true
    }

    /// Block at a world position, if its chunk is loaded.
    pub fn block_at(&self, wx: i64, wy: i64, wz: i64) -> Option<BlockType> {
        let (coord, local) = world_to_chunk_local(wx, wy, wz, self.params.chunk_width)?;
        self.loaded.get(&coord)?.grid().block_at(local)
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&ChunkRecord> {
        self.loaded.get(&coord)
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.loaded.contains_key(&coord)
    }

    pub fn loaded_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.loaded.keys().copied()
    }

    /// Coordinates the observer currently wants, nearest first.
    pub fn wanted_coords(&self) -> &[ChunkCoord] {
        &self.wanted_order
    }

    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    pub fn settings(&self) -> &StreamingSettings {
        &self.settings
    }

    pub fn edit_store(&self) -> &EditStore {
        &self.edits
    }

    pub fn events(&self) -> &SceneEventBuffer {
        &self.events
    }

    /// Takes every pending scene event, oldest first.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.events.drain()
    }

    /// Advances the event buffer by one frame.
    pub fn swap_events(&mut self) {
        self.events.swap();
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            loaded: self.loaded.len(),
            requested: self.requested.len(),
            queued: self.queue.len(),
            in_flight: self.service.in_flight_count(),
            discarded: self.discarded,
            edits: self.edits.len(),
        }
    }

    /// Stops the generation workers.
    ///
    /// Requests not yet started are dropped; chunks already being generated
    /// finish first, and their results are never integrated.
    pub fn shutdown(&mut self) {
        self.service.shutdown();
    }

    fn retarget(&mut self, center: ChunkCoord) {
        tracing::debug!("observer entered chunk ({}, {})", center.x, center.z);
        self.center = Some(center);
        self.wanted_order = visible_coords(center, self.settings.render_distance);
        self.wanted = self.wanted_order.iter().copied().collect();

        let mut stale: Vec<ChunkCoord> = self
            .requested
            .iter()
            .copied()
            .filter(|c| !self.wanted.contains(c))
            .collect();
        stale.sort();
        for coord in stale {
            // Finished but not yet integrated: drop it now. Still-running
            // requests are discarded when their result arrives.
            if let Some(QueueTask::Integrate(_)) = self.queue.get(coord) {
                self.queue.remove(coord);
                self.requested.remove(&coord);
                self.discarded += 1;
                tracing::trace!("dropped queued chunk ({}, {}): out of range", coord.x, coord.z);
            }
        }

        let mut extra: Vec<ChunkCoord> = self
            .loaded
            .keys()
            .copied()
            .filter(|c| !self.wanted.contains(c))
            .collect();
        extra.sort_by_key(|c| std::cmp::Reverse(c.chebyshev_distance(center)));
        for coord in extra {
            if !self.queue.contains(coord) {
                self.queue.enqueue(coord, QueueTask::Teardown);
            }
        }

        // Cancel teardowns for chunks that came back into range.
        for &coord in &self.wanted_order {
            if matches!(self.queue.get(coord), Some(QueueTask::Teardown)) {
                self.queue.remove(coord);
                tracing::trace!("cancelled teardown of chunk ({}, {})", coord.x, coord.z);
            }
        }
    }

    fn accept_result(&mut self, chunk: GeneratedChunk) {
        let coord = chunk.coord;
        if !self.wanted.contains(&coord) || !self.requested.contains(&coord) {
            self.requested.remove(&coord);
            self.discarded += 1;
            tracing::trace!("discarded stale chunk ({}, {})", coord.x, coord.z);
            return;
        }
        if let Some(previous) = self.queue.enqueue(coord, QueueTask::Integrate(chunk)) {
            tracing::trace!("replaced pending {} for chunk ({}, {})", task_name(&previous), coord.x, coord.z);
        }
    }

    fn submit_missing(&mut self) {
        for &coord in &self.wanted_order {
            if self.loaded.contains_key(&coord) || self.requested.contains(&coord) {
                continue;
            }
            let request = GenerationRequest {
                coord,
                edits: self.edits.serialize_changes(coord),
            };
            if self.service.submit(request).is_err() {
                // Channel full; the rest are retried next update.
                break;
            }
            self.requested.insert(coord);
            tracing::debug!("requested chunk ({}, {})", coord.x, coord.z);
        }
    }

    fn integrate(&mut self, mut chunk: GeneratedChunk) {
        let coord = chunk.coord;
        self.requested.remove(&coord);
        if !self.wanted.contains(&coord) {
            self.discarded += 1;
            tracing::trace!("discarded stale chunk ({}, {})", coord.x, coord.z);
            return;
        }

        // Edits made while the chunk was generating are not in its grid yet.
        let mut late_edits = 0;
        for edit in self.edits.serialize_changes(coord) {
            if chunk.grid.block_at(edit.pos) != Some(edit.block) {
                chunk.grid.set_block(edit.pos.x, edit.pos.y, edit.pos.z, edit.block);
                late_edits += 1;
            }
        }
        if late_edits > 0 {
            chunk.mesh = strata_mesh::mesh(&chunk.grid, &self.params.atlas, self.settings.mesh);
        }

        let record = ChunkRecord::integrate(chunk, self.settings.mesh.boundary);
        tracing::debug!(
            "integrated chunk ({}, {}): {} instances, {} quads, {} late edits, generated in {}us",
            coord.x,
            coord.z,
            record.instances().len(),
            record.mesh().quad_count(),
            late_edits,
            record.generation_time_us()
        );
        self.loaded.insert(coord, record);
        self.events.send(SceneEvent::ChunkIntegrated { coord });
    }

    fn teardown(&mut self, coord: ChunkCoord) {
        if self.wanted.contains(&coord) {
            return;
        }
        if self.loaded.remove(&coord).is_some() {
            tracing::debug!("tore down chunk ({}, {})", coord.x, coord.z);
            self.events.send(SceneEvent::ChunkRemoved { coord });
        }
    }
}

fn task_name(task: &QueueTask) -> &'static str {
    match task {
        QueueTask::Integrate(_) => "integrate",
        QueueTask::Teardown => "teardown",
    }
}
