//! Sparse record of player block edits, replayed onto regenerated chunks.
//!
//! The store outlives any loaded chunk. When a chunk scrolls out of range its
//! grid is dropped, and when it comes back the generator replays
//! [`EditStore::serialize_changes`] on top of fresh procedural output.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::block::BlockType;
use crate::coord::{ChunkCoord, LocalPos};

/// One chunk-relative block change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditRecord {
    pub pos: LocalPos,
    pub block: BlockType,
}

impl EditRecord {
    /// Creates a record for the cell at `(x, y, z)`.
    pub fn new(x: i32, y: i32, z: i32, block: BlockType) -> Self {
        Self {
            pos: LocalPos::new(x, y, z),
            block,
        }
    }
}

/// Two-level map `ChunkCoord -> LocalPos -> BlockType`.
///
/// Indexing by chunk first makes per-chunk retrieval proportional to that
/// chunk's edit count. Last write wins; no history is kept.
#[derive(Debug, Default, Clone)]
pub struct EditStore {
    chunks: FxHashMap<ChunkCoord, FxHashMap<LocalPos, BlockType>>,
    total: usize,
}

impl EditStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `block` at `pos` in `coord`, returning the block previously
    /// recorded there, if any.
    pub fn set(&mut self, coord: ChunkCoord, pos: LocalPos, block: BlockType) -> Option<BlockType> {
        let previous = self.chunks.entry(coord).or_default().insert(pos, block);
        if previous.is_none() {
            self.total += 1;
        }
        previous
    }

    /// The recorded block at `pos` in `coord`.
    pub fn get(&self, coord: ChunkCoord, pos: LocalPos) -> Option<BlockType> {
        self.chunks.get(&coord)?.get(&pos).copied()
    }

    /// Returns `true` if an edit is recorded at `pos` in `coord`.
    pub fn contains(&self, coord: ChunkCoord, pos: LocalPos) -> bool {
        self.chunks
            .get(&coord)
            .is_some_and(|edits| edits.contains_key(&pos))
    }

    /// All edits for `coord`, ordered by position so output is reproducible.
    pub fn serialize_changes(&self, coord: ChunkCoord) -> Vec<EditRecord> {
        let Some(edits) = self.chunks.get(&coord) else {
            return Vec::new();
        };
        let mut records: Vec<EditRecord> = edits
            .iter()
            .map(|(&pos, &block)| EditRecord { pos, block })
            .collect();
        records.sort_unstable_by_key(|r| r.pos);
        records
    }

    /// Number of edits recorded for `coord`.
    pub fn chunk_edit_count(&self, coord: ChunkCoord) -> usize {
        self.chunks.get(&coord).map_or(0, |edits| edits.len())
    }

    /// Chunks that have at least one edit.
    pub fn edited_chunks(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.chunks.keys()
    }

    /// Total number of recorded edits across all chunks.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: ChunkCoord = ChunkCoord::new(0, 0);

    #[test]
    fn test_set_then_get() {
        let mut store = EditStore::new();
        let pos = LocalPos::new(1, 2, 3);
        assert!(!store.contains(ORIGIN, pos));
        assert_eq!(store.set(ORIGIN, pos, BlockType::Stone), None);
        assert!(store.contains(ORIGIN, pos));
        assert_eq!(store.get(ORIGIN, pos), Some(BlockType::Stone));
        assert_eq!(store.get(ChunkCoord::new(1, 0), pos), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = EditStore::new();
        let pos = LocalPos::new(0, 0, 0);
        store.set(ORIGIN, pos, BlockType::Stone);
        assert_eq!(store.set(ORIGIN, pos, BlockType::Air), Some(BlockType::Stone));
        assert_eq!(store.get(ORIGIN, pos), Some(BlockType::Air));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_serialize_changes_filters_by_chunk() {
        let mut store = EditStore::new();
        let other = ChunkCoord::new(-3, 8);
        store.set(ORIGIN, LocalPos::new(3, 1, 0), BlockType::Dirt);
        store.set(ORIGIN, LocalPos::new(0, 1, 2), BlockType::Air);
        store.set(other, LocalPos::new(0, 1, 2), BlockType::Leaves);

        let records = store.serialize_changes(ORIGIN);
        assert_eq!(
            records,
            vec![
                EditRecord::new(0, 1, 2, BlockType::Air),
                EditRecord::new(3, 1, 0, BlockType::Dirt),
            ]
        );
        assert_eq!(store.serialize_changes(other).len(), 1);
        assert!(store.serialize_changes(ChunkCoord::new(5, 5)).is_empty());
        assert_eq!(store.len(), 3);
        assert_eq!(store.edited_chunks().count(), 2);
    }

    #[test]
    fn test_serialized_records_reproduce_store() {
        let mut store = EditStore::new();
        for i in 0..10 {
            let block = if i % 2 == 0 { BlockType::Air } else { BlockType::OakLog };
            store.set(ORIGIN, LocalPos::new(i % 4, i, (i * 3) % 4), block);
        }
        let mut replayed = EditStore::new();
        for record in store.serialize_changes(ORIGIN) {
            replayed.set(ORIGIN, record.pos, record.block);
        }
        assert_eq!(replayed.serialize_changes(ORIGIN), store.serialize_changes(ORIGIN));
        assert_eq!(replayed.chunk_edit_count(ORIGIN), 10);
    }
}
