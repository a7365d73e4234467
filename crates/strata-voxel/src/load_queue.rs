//! FIFO queue of pending per-chunk scene tasks with at-most-one task per chunk.
//!
//! Re-enqueueing a chunk that already has a pending task replaces the task but
//! keeps the chunk's original place in line. Dequeue order is therefore the
//! order in which distinct chunks were first enqueued.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::coord::ChunkCoord;

/// Pending tasks keyed by chunk.
///
/// `order` may hold stale entries for chunks that were removed; they are
/// skipped lazily on dequeue by comparing sequence numbers.
#[derive(Debug)]
pub struct ChunkLoadQueue<T> {
    /// Insertion order: `(sequence, coord)`.
    order: VecDeque<(u64, ChunkCoord)>,
    /// Live entries: `coord -> (sequence, task)`.
    pending: FxHashMap<ChunkCoord, (u64, T)>,
    next_seq: u64,
}

impl<T> ChunkLoadQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
            pending: FxHashMap::default(),
            next_seq: 0,
        }
    }

    /// Schedules `task` for `coord`.
    ///
    /// If `coord` already has a pending task it is replaced in place and
    /// returned.
    pub fn enqueue(&mut self, coord: ChunkCoord, task: T) -> Option<T> {
        if let Some((_, slot)) = self.pending.get_mut(&coord) {
            return Some(std::mem::replace(slot, task));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.push_back((seq, coord));
        self.pending.insert(coord, (seq, task));
        None
    }

    /// Removes and returns the oldest pending entry.
    pub fn dequeue(&mut self) -> Option<(ChunkCoord, T)> {
        while let Some((seq, coord)) = self.order.pop_front() {
            let live = self
                .pending
                .get(&coord)
                .is_some_and(|(live_seq, _)| *live_seq == seq);
            // Entry was removed (and possibly re-added later); skip it.
            if !live {
                continue;
            }
            if let Some((_, task)) = self.pending.remove(&coord) {
                return Some((coord, task));
            }
        }
        None
    }

    /// Cancels the pending task for `coord`, returning it.
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<T> {
        self.pending.remove(&coord).map(|(_, task)| task)
    }

    /// The pending task for `coord`, if any.
    pub fn get(&self, coord: ChunkCoord) -> Option<&T> {
        self.pending.get(&coord).map(|(_, task)| task)
    }

    /// Returns `true` if `coord` has a pending task.
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.pending.contains_key(&coord)
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.order.clear();
        self.pending.clear();
    }
}

impl<T> Default for ChunkLoadQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
