//! Outbound scene notifications for the rendering collaborator.
//!
//! The controller records a [`SceneEvent`] for every chunk it integrates or
//! tears down and for every render instance it adds, removes, or moves.
//! Events are collected into a [`SceneEventBuffer`] that is double-buffered
//! per frame.

use strata_voxel::{BlockType, ChunkCoord, LocalPos};

/// A change the renderer must mirror.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    /// A chunk's mesh and grid are now live; fetch them via the controller.
    ChunkIntegrated { coord: ChunkCoord },
    /// A chunk and all its instances left the scene.
    ChunkRemoved { coord: ChunkCoord },
    /// A render instance was appended at `index`.
    InstanceAdded {
        coord: ChunkCoord,
        pos: LocalPos,
        block: BlockType,
        index: u32,
    },
    /// The instance at `index` was removed.
    InstanceRemoved {
        coord: ChunkCoord,
        pos: LocalPos,
        index: u32,
    },
    /// The instance for `pos` moved from `from` into the hole at `to`.
    InstanceMoved {
        coord: ChunkCoord,
        pos: LocalPos,
        from: u32,
        to: u32,
    },
}

impl SceneEvent {
    /// Chunk the event concerns.
    pub fn coord(&self) -> ChunkCoord {
        match *self {
            SceneEvent::ChunkIntegrated { coord }
            | SceneEvent::ChunkRemoved { coord }
            | SceneEvent::InstanceAdded { coord, .. }
            | SceneEvent::InstanceRemoved { coord, .. }
            | SceneEvent::InstanceMoved { coord, .. } => coord,
        }
    }
}

/// Double-buffered event storage.
///
/// Events sent in the current frame are readable in the current and next
/// frame. After two [`swap`](SceneEventBuffer::swap) calls they are dropped.
/// Consumers that want each event exactly once use
/// [`drain`](SceneEventBuffer::drain) instead.
#[derive(Debug, Default)]
pub struct SceneEventBuffer {
    prev: Vec<SceneEvent>,
    current: Vec<SceneEvent>,
}

impl SceneEventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, event: SceneEvent) {
        self.current.push(event);
    }

    /// All readable events, previous frame first.
    pub fn read(&self) -> impl Iterator<Item = &SceneEvent> {
        self.prev.iter().chain(self.current.iter())
    }

    /// Takes every readable event, oldest first, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<SceneEvent> {
        let mut events = std::mem::take(&mut self.prev);
        events.append(&mut self.current);
        events
    }

    pub fn len(&self) -> usize {
        self.prev.len() + self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prev.is_empty() && self.current.is_empty()
    }

    /// Advances one frame: current events become previous, previous are dropped.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.prev, &mut self.current);
        self.current.clear();
    }

    pub fn clear(&mut self) {
        self.prev.clear();
        self.current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integrated(x: i32) -> SceneEvent {
        SceneEvent::ChunkIntegrated {
            coord: ChunkCoord::new(x, 0),
        }
    }

    #[test]
    fn test_events_survive_one_swap() {
        let mut buffer = SceneEventBuffer::new();
        buffer.send(integrated(1));
        assert_eq!(buffer.len(), 1);
        buffer.swap();
        assert_eq!(buffer.read().count(), 1);
        buffer.send(integrated(2));
        assert_eq!(buffer.read().cloned().collect::<Vec<_>>(), vec![integrated(1), integrated(2)]);
        buffer.swap();
        assert_eq!(buffer.read().cloned().collect::<Vec<_>>(), vec![integrated(2)]);
        buffer.swap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_drain_takes_everything_in_order() {
        let mut buffer = SceneEventBuffer::new();
        buffer.send(integrated(1));
        buffer.swap();
        buffer.send(integrated(2));
        assert_eq!(buffer.drain(), vec![integrated(1), integrated(2)]);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn test_event_coord() {
        let coord = ChunkCoord::new(-3, 9);
        let event = SceneEvent::InstanceMoved {
            coord,
            pos: LocalPos::new(1, 2, 3),
            from: 7,
            to: 2,
        };
        assert_eq!(event.coord(), coord);
    }
}
