// Core types shared across the planner.
//
// Defines grid positions (`GridPos` for a 3D cell, `Column` for a horizontal
// coordinate), the horizontal metrics used by the planner, and the compact
// integer identifiers for groups and registered volumes. All types derive
// `Serialize` and `Deserialize` so diagnostics can be exported by the host.
//
// **Critical constraint: determinism.** Every type here has a total order so
// it can key a `BTreeMap`. Identifiers are supplied by the host, never
// generated from OS entropy.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A walkable cell (or any point) in the 3D grid, in integer cell units.
///
/// The coordinate system uses right-handed conventions:
/// - X: east  (positive) / west  (negative)
/// - Y: up    (positive) / down  (negative)
/// - Z: south (positive) / north (negative)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The horizontal column this position stands in.
    pub const fn column(self) -> Column {
        Column::new(self.x, self.z)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A horizontal coordinate: one vertical column of the terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Column {
    pub x: i32,
    pub z: i32,
}

impl Column {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Place this column at height `y`.
    pub const fn at(self, y: i32) -> GridPos {
        GridPos::new(self.x, y, self.z)
    }

    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Straight-line (Euclidean) horizontal distance.
    pub fn euclidean_distance(self, other: Self) -> f64 {
        let dx = (self.x as i64 - other.x as i64) as f64;
        let dz = (self.z as i64 - other.z as i64) as f64;
        (dx * dx + dz * dz).sqrt()
    }

    /// Number of 8-connected steps between two columns (Chebyshev distance).
    ///
    /// With diagonal steps counted as one cell, this is the length of the
    /// straight cell line between the columns.
    pub fn cell_distance(self, other: Self) -> u32 {
        let dx = (self.x as i64 - other.x as i64).unsigned_abs();
        let dz = (self.z as i64 - other.z as i64).unsigned_abs();
        dx.max(dz) as u32
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a logical group (one hub plus its members).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", self.0)
    }
}

/// Identifier of a registered occupied volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VolumeId(pub u64);

/// One of the three grid axes, used in geometry diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_distance_counts_diagonals_once() {
        let a = Column::new(0, 0);
        assert_eq!(a.cell_distance(Column::new(10, 10)), 10);
        assert_eq!(a.cell_distance(Column::new(-7, 3)), 7);
        assert_eq!(Column::new(3, -4).cell_distance(a), 4);
    }

    #[test]
    fn euclidean_distance_is_straight_line() {
        let a = Column::new(0, 0);
        assert_eq!(a.euclidean_distance(Column::new(3, 4)), 5.0);
        assert_eq!(a.euclidean_distance(Column::new(250, 0)), 250.0);
    }

    #[test]
    fn cell_distance_never_exceeds_euclidean() {
        let a = Column::new(1, 2);
        for (x, z) in [(9, 2), (9, 9), (-5, 7), (1, -30)] {
            let b = Column::new(x, z);
            assert!(a.cell_distance(b) as f64 <= a.euclidean_distance(b));
        }
    }

    #[test]
    fn grid_pos_ordering_is_total() {
        let a = GridPos::new(0, 0, 0);
        let b = GridPos::new(1, 0, 0);
        assert!(a < b);
        assert_eq!(a.column(), Column::new(0, 0));
        assert_eq!(Column::new(4, 5).at(6), GridPos::new(4, 6, 5));
    }
}
