//! Which chunks the observer should have loaded.

use glam::DVec3;
use strata_voxel::ChunkCoord;

/// Chunk containing the observer. Only `x` and `z` matter; chunks span the
/// full world height.
pub fn observer_chunk(position: DVec3, chunk_width: u32) -> ChunkCoord {
    ChunkCoord::containing(position.x.floor() as i64, position.z.floor() as i64, chunk_width)
}

/// All coordinates within Chebyshev distance `radius` of `center`, nearest first.
///
/// The square is scanned row by row and then stably sorted by distance, so
/// ties keep a deterministic order.
pub fn visible_coords(center: ChunkCoord, radius: u32) -> Vec<ChunkCoord> {
    let r = radius as i32;
    let side = (2 * radius + 1) as usize;
    let mut coords = Vec::with_capacity(side * side);
    for dz in -r..=r {
        for dx in -r..=r {
            coords.push(ChunkCoord::new(center.x + dx, center.z + dz));
        }
    }
    coords.sort_by_key(|c| c.chebyshev_distance(center));
    coords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observer_chunk_uses_floor_division() {
        assert_eq!(observer_chunk(DVec3::new(0.5, 10.0, 0.5), 16), ChunkCoord::new(0, 0));
        assert_eq!(observer_chunk(DVec3::new(-0.5, 10.0, 15.9), 16), ChunkCoord::new(-1, 0));
        assert_eq!(observer_chunk(DVec3::new(-16.0, 0.0, -17.0), 16), ChunkCoord::new(-1, -2));
        assert_eq!(observer_chunk(DVec3::new(32.0, 0.0, 47.99), 16), ChunkCoord::new(2, 2));
    }

    #[test]
    fn test_visible_square_size() {
        let center = ChunkCoord::new(3, -2);
        assert_eq!(visible_coords(center, 0), vec![center]);
        assert_eq!(visible_coords(center, 1).len(), 9);
        assert_eq!(visible_coords(center, 4).len(), 81);
    }

    #[test]
    fn test_visible_sorted_nearest_first() {
        let center = ChunkCoord::new(-5, 7);
        let coords = visible_coords(center, 3);
        assert_eq!(coords[0], center);
        let distances: Vec<u32> = coords.iter().map(|c| c.chebyshev_distance(center)).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]), "not sorted: {distances:?}");
        assert_eq!(*distances.last().unwrap(), 3);
    }

    #[test]
    fn test_visible_coords_unique() {
        let mut coords = visible_coords(ChunkCoord::new(0, 0), 2);
        coords.sort();
        coords.dedup();
        assert_eq!(coords.len(), 25);
    }
}
