//! The six axis-aligned directions a voxel face can point.

use glam::IVec3;

/// One of the six cardinal directions a voxel face can point.
///
/// The `repr(u8)` discriminant doubles as the bit index inside [`super::VisibleFaces`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceDirection {
    /// +X direction.
    PosX = 0,
    /// −X direction.
    NegX = 1,
    /// +Y direction.
    PosY = 2,
    /// −Y direction.
    NegY = 3,
    /// +Z direction.
    PosZ = 4,
    /// −Z direction.
    NegZ = 5,
}

impl FaceDirection {
    /// All six directions in order.
    pub const ALL: [FaceDirection; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// The four directions perpendicular to Y.
    pub const SIDES: [FaceDirection; 4] = [Self::PosX, Self::NegX, Self::PosZ, Self::NegZ];

    /// Returns the sweep axes for greedy meshing: `(layer_axis, u_axis, v_axis)`.
    ///
    /// Each value is 0=X, 1=Y, 2=Z. The pair is chosen so that `u × v` points
    /// along the positive layer axis; for Y the sweep plane is `(x, z)` with
    /// `u = z`, `v = x`.
    pub fn sweep_axes(self) -> (usize, usize, usize) {
        match self {
            Self::PosX | Self::NegX => (0, 1, 2), // u=Y, v=Z
            Self::PosY | Self::NegY => (1, 2, 0), // u=Z, v=X
            Self::PosZ | Self::NegZ => (2, 0, 1), // u=X, v=Y
        }
    }

    /// Returns `true` for `PosX`, `PosY`, `PosZ`.
    pub fn is_positive(self) -> bool {
        matches!(self, Self::PosX | Self::PosY | Self::PosZ)
    }

    /// Integer step toward the neighbour on this side.
    pub fn step(self) -> IVec3 {
        match self {
            Self::PosX => IVec3::X,
            Self::NegX => IVec3::NEG_X,
            Self::PosY => IVec3::Y,
            Self::NegY => IVec3::NEG_Y,
            Self::PosZ => IVec3::Z,
            Self::NegZ => IVec3::NEG_Z,
        }
    }

    /// Returns the unit normal as `[f32; 3]` for this face direction.
    pub fn normal(self) -> [f32; 3] {
        self.step().as_vec3().to_array()
    }

    /// Returns the neighbor coordinate offset for this direction.
    pub fn offset(self, x: i32, y: i32, z: i32) -> (i32, i32, i32) {
        let n = IVec3::new(x, y, z) + self.step();
        (n.x, n.y, n.z)
    }

    /// Returns the opposite face direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::PosX => Self::NegX,
            Self::NegX => Self::PosX,
            Self::PosY => Self::NegY,
            Self::NegY => Self::PosY,
            Self::PosZ => Self::NegZ,
            Self::NegZ => Self::PosZ,
        }
    }

    /// Returns the direction index (0–5).
    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_opposite_is_involution() {
        for dir in FaceDirection::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn test_offset_matches_normal() {
        for dir in FaceDirection::ALL {
            let (x, y, z) = dir.offset(0, 0, 0);
            assert_eq!([x as f32, y as f32, z as f32], dir.normal());
        }
    }

    #[test]
    fn test_sweep_axes_are_right_handed() {
        for dir in FaceDirection::ALL {
            let (layer, u, v) = dir.sweep_axes();
            let mut ua = Vec3::ZERO;
            let mut va = Vec3::ZERO;
            let mut la = Vec3::ZERO;
            ua[u] = 1.0;
            va[v] = 1.0;
            la[layer] = 1.0;
            assert_eq!(ua.cross(va), la, "{dir:?} sweep plane is left-handed");
        }
    }

    #[test]
    fn test_indices_are_unique() {
        let mut seen = [false; 6];
        for dir in FaceDirection::ALL {
            assert!(!seen[dir.index()]);
            seen[dir.index()] = true;
        }
    }
}
