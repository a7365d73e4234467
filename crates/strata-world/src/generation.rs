//! Background chunk generation service.
//!
//! Generation and meshing are CPU-bound, so they run on worker threads fed by
//! a bounded request channel. Requests and results are owned values; workers
//! share nothing mutable with the caller. Each worker keeps its own
//! [`ChunkGenerator`] built from a private copy of the world parameters.
//! Results come back in completion order, which is unrelated to request order.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use strata_mesh::{MeshBuffer, MeshOptions};
use strata_terrain::ChunkGenerator;
use strata_voxel::{ChunkCoord, EditRecord, VoxelGrid, WorldParams};

/// A request to generate and mesh one chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub coord: ChunkCoord,
    /// Recorded edits for `coord`, replayed after the procedural passes.
    pub edits: Vec<EditRecord>,
}

/// A fully generated and meshed chunk.
#[derive(Debug)]
pub struct GeneratedChunk {
    /// The coordinate matching the original request.
    pub coord: ChunkCoord,
    pub grid: VoxelGrid,
    pub mesh: MeshBuffer,
    /// Generation plus meshing time in microseconds (for profiling).
    pub generation_time_us: u64,
}

/// Errors raised while starting the service.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("failed to spawn chunk generation worker: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Worker pool that turns [`GenerationRequest`]s into [`GeneratedChunk`]s.
pub struct GenerationService {
    /// Sender for submitting requests; `None` after shutdown.
    request_sender: Option<Sender<GenerationRequest>>,
    /// Kept so shutdown can discard requests no worker has picked up yet.
    request_receiver: Receiver<GenerationRequest>,
    /// Receiver for collecting completed chunks on the caller's thread.
    result_receiver: Receiver<GeneratedChunk>,
    /// Handles to the worker threads (for shutdown).
    worker_handles: Vec<JoinHandle<()>>,
    /// Requests submitted but not yet completed.
    in_flight: Arc<AtomicUsize>,
}

impl GenerationService {
    /// Starts `worker_count` workers (at least one) with room for `capacity`
    /// queued requests.
    pub fn new(
        params: &WorldParams,
        mesh_options: MeshOptions,
        worker_count: usize,
        capacity: usize,
    ) -> Result<Self, GenerationError> {
        let (request_tx, request_rx) = bounded::<GenerationRequest>(capacity.max(1));
        let (result_tx, result_rx) = unbounded::<GeneratedChunk>();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(worker_count.max(1));
        for _ in 0..worker_count.max(1) {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let flight = Arc::clone(&in_flight);
            let params = params.clone();

            let handle = std::thread::Builder::new()
                .name("chunk-gen-worker".into())
                .spawn(move || {
                    let atlas = params.atlas.clone();
                    let generator = ChunkGenerator::new(params);
                    while let Ok(request) = rx.recv() {
                        let start = Instant::now();
                        let grid = generator.generate(request.coord, &request.edits);
                        let mesh = strata_mesh::mesh(&grid, &atlas, mesh_options);
                        let elapsed = start.elapsed().as_micros() as u64;

                        let sent = tx.send(GeneratedChunk {
                            coord: request.coord,
                            grid,
                            mesh,
                            generation_time_us: elapsed,
                        });
                        flight.fetch_sub(1, Ordering::Relaxed);
                        if sent.is_err() {
                            break;
                        }
                    }
                })
                .map_err(GenerationError::Spawn)?;
            handles.push(handle);
        }

        tracing::debug!("started {} chunk generation workers", handles.len());

        Ok(Self {
            request_sender: Some(request_tx),
            request_receiver: request_rx,
            result_receiver: result_rx,
            worker_handles: handles,
            in_flight,
        })
    }

    /// Starts a service with a worker count derived from the CPU count.
    pub fn with_defaults(params: &WorldParams, mesh_options: MeshOptions) -> Result<Self, GenerationError> {
        Self::new(params, mesh_options, default_worker_count(), 256)
    }

    /// Queues a request.
    ///
    /// Returns the request back if the queue is full or the service has shut
    /// down; the caller retries later.
    #[allow(clippy::result_large_err)]
    pub fn submit(&self, request: GenerationRequest) -> Result<(), GenerationRequest> {
        let Some(sender) = &self.request_sender else {
            return Err(request);
        };
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        sender.try_send(request).map_err(|e| {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            e.into_inner()
        })
    }

    /// Drains all completed chunks. Never blocks.
    pub fn drain_results(&self) -> Vec<GeneratedChunk> {
        self.result_receiver.try_iter().collect()
    }

    /// Number of requests queued or executing.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.worker_handles.len()
    }

    /// Stops accepting requests and joins every worker.
    ///
    /// Queued requests no worker has started are discarded; workers only
    /// finish the chunk they are currently generating.
    pub fn shutdown(&mut self) {
        // Dropping the sender closes the channel, causing workers to exit.
        self.request_sender.take();
        let discarded = self.request_receiver.try_iter().count();
        if discarded > 0 {
            self.in_flight.fetch_sub(discarded, Ordering::Relaxed);
            tracing::debug!("discarded {discarded} queued generation requests");
        }
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for GenerationService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Worker count leaving headroom for the caller's thread: `cpus - 2`, at least one.
pub fn default_worker_count() -> usize {
    num_cpus::get().saturating_sub(2).max(1)
}
