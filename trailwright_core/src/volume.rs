// Occupied volumes: axis-aligned boxes with an optional occupancy mask.
//
// A `Volume` is the footprint of a placed structure as the placement
// subsystem reports it: inclusive integer bounds on all three axes and,
// optionally, a per-cell `BitVec` mask. Without a mask the whole box is
// occupied. With one, the mask is indexed like a dense voxel grid:
//   index = dx + dz * width + dy * width * depth
// where `dx/dy/dz` are offsets from `min`. A mask shorter than the box
// leaves the trailing cells unoccupied.
//
// Volumes are immutable. `expand(buffer)` returns a new, larger box with
// the mask dropped: a buffered volume is always fully occupied. This is how
// the obstacle field keeps routes off the edges of structures.
//
// See also: `obstacle.rs` for the field built from expanded volumes and the
// registry that owns them.

use crate::error::{PathingError, Result};
use crate::types::{Axis, Column, GridPos};
use bit_vec::BitVec;

/// Largest box `from_cells` will build a mask for (2 MiB of bits).
pub const MAX_MASK_CELLS: u64 = 1 << 24;

/// Inclusive axis-aligned box with an optional occupancy mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Volume {
    min: GridPos,
    max: GridPos,
    mask: Option<BitVec>,
}

impl Volume {
    /// A fully occupied box. Fails if `max < min` on any axis.
    pub fn new(min: GridPos, max: GridPos) -> Result<Self> {
        check_bounds(min, max)?;
        Ok(Self {
            min,
            max,
            mask: None,
        })
    }

    /// A box whose occupancy is given per cell. Fails on inverted bounds or
    /// a mask longer than the box.
    pub fn with_mask(min: GridPos, max: GridPos, mask: BitVec) -> Result<Self> {
        check_bounds(min, max)?;
        let capacity = capacity(min, max);
        if mask.len() as u64 > capacity {
            return Err(PathingError::MaskTooLarge {
                len: mask.len(),
                capacity,
            });
        }
        Ok(Self {
            min,
            max,
            mask: Some(mask),
        })
    }

    /// The tight masked box around a set of occupied cells. Returns `None`
    /// for an empty set. Fails if the box holds more than `MAX_MASK_CELLS`.
    pub fn from_cells(cells: &[GridPos]) -> Result<Option<Self>> {
        let Some(&first) = cells.first() else {
            return Ok(None);
        };
        let (min, max) = cells.iter().fold((first, first), |(lo, hi), c| {
            (
                GridPos::new(lo.x.min(c.x), lo.y.min(c.y), lo.z.min(c.z)),
                GridPos::new(hi.x.max(c.x), hi.y.max(c.y), hi.z.max(c.z)),
            )
        });
        let mut volume = Self {
            min,
            max,
            mask: None,
        };
        let cells_in_box = capacity(min, max);
        if cells_in_box > MAX_MASK_CELLS {
            return Err(PathingError::VolumeTooLarge {
                cells: cells_in_box,
                limit: MAX_MASK_CELLS,
            });
        }
        let len = cells_in_box as usize;
        let mut mask = BitVec::from_elem(len, false);
        for &cell in cells {
            if let Some(i) = volume.mask_index(cell) {
                mask.set(i, true);
            }
        }
        if !mask.all() {
            volume.mask = Some(mask);
        }
        Ok(Some(volume))
    }

    pub fn min(&self) -> GridPos {
        self.min
    }

    pub fn max(&self) -> GridPos {
        self.max
    }

    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    pub fn width(&self) -> u64 {
        span(self.min.x, self.max.x)
    }

    pub fn height(&self) -> u64 {
        span(self.min.y, self.max.y)
    }

    pub fn depth(&self) -> u64 {
        span(self.min.z, self.max.z)
    }

    /// Cells in the box, occupied or not.
    pub fn cell_count(&self) -> u64 {
        capacity(self.min, self.max)
    }

    /// Occupied cells.
    pub fn occupied_count(&self) -> u64 {
        match &self.mask {
            None => self.cell_count(),
            Some(mask) => mask.iter().filter(|&b| b).count() as u64,
        }
    }

    /// A larger, fully occupied box grown by `buffer` cells on every side.
    ///
    /// A zero buffer returns the volume unchanged, mask included.
    pub fn expand(&self, buffer: i32) -> Self {
        if buffer <= 0 {
            return self.clone();
        }
        Self {
            min: GridPos::new(
                self.min.x.saturating_sub(buffer),
                self.min.y.saturating_sub(buffer),
                self.min.z.saturating_sub(buffer),
            ),
            max: GridPos::new(
                self.max.x.saturating_add(buffer),
                self.max.y.saturating_add(buffer),
                self.max.z.saturating_add(buffer),
            ),
            mask: None,
        }
    }

    pub fn bounds_contain(&self, pos: GridPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x)
            && (self.min.y..=self.max.y).contains(&pos.y)
            && (self.min.z..=self.max.z).contains(&pos.z)
    }

    /// Whether `pos` is an occupied cell of this volume.
    pub fn contains(&self, pos: GridPos) -> bool {
        match &self.mask {
            None => self.bounds_contain(pos),
            Some(mask) => self
                .mask_index(pos)
                .is_some_and(|i| mask.get(i).unwrap_or(false)),
        }
    }

    /// Whether the box spans `column` horizontally.
    pub fn covers_column(&self, column: Column) -> bool {
        (self.min.x..=self.max.x).contains(&column.x) && (self.min.z..=self.max.z).contains(&column.z)
    }

    /// Whether any occupied cell lies in `column` between `y_min` and
    /// `y_max` inclusive.
    pub fn intersects_column(&self, column: Column, y_min: i32, y_max: i32) -> bool {
        if !self.covers_column(column) {
            return false;
        }
        let lo = y_min.max(self.min.y);
        let hi = y_max.min(self.max.y);
        if lo > hi {
            return false;
        }
        match &self.mask {
            None => true,
            Some(_) => (lo..=hi).any(|y| self.contains(column.at(y))),
        }
    }

    fn mask_index(&self, pos: GridPos) -> Option<usize> {
        if !self.bounds_contain(pos) {
            return None;
        }
        let dx = (pos.x as i64 - self.min.x as i64) as u64;
        let dy = (pos.y as i64 - self.min.y as i64) as u64;
        let dz = (pos.z as i64 - self.min.z as i64) as u64;
        let w = self.width();
        let d = self.depth();
        usize::try_from(dx + dz * w + dy * w * d).ok()
    }
}

fn check_bounds(min: GridPos, max: GridPos) -> Result<()> {
    for (axis, lo, hi) in [
        (Axis::X, min.x, max.x),
        (Axis::Y, min.y, max.y),
        (Axis::Z, min.z, max.z),
    ] {
        if hi < lo {
            return Err(PathingError::InvalidObstacleGeometry {
                axis,
                min: lo,
                max: hi,
            });
        }
    }
    Ok(())
}

fn span(lo: i32, hi: i32) -> u64 {
    (hi as i64 - lo as i64 + 1) as u64
}

fn capacity(min: GridPos, max: GridPos) -> u64 {
    span(min.x, max.x)
        .saturating_mul(span(min.y, max.y))
        .saturating_mul(span(min.z, max.z))
}
