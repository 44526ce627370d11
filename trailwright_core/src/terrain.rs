// Terrain oracle contract and an in-memory heightfield implementation.
//
// The planner never owns the world. It consumes a `TerrainOracle`, a
// read-only snapshot supplied by the host that answers two questions: the
// top of each column (`height_at`) and the material of any cell
// (`material_at`). Every search receives the oracle explicitly; nothing in
// this crate reads global or live-mutating terrain.
//
// `TerrainGrid` is the stock oracle: a dense column grid over a finite
// window, stored as a flat `Vec<ColumnSample>` indexed by
// `(x - origin.x) + (z - origin.z) * size_x`. Columns outside the window
// return the grid's default sample, so the surface is implicit and
// unbounded. Each column is a solid ground stack, an optional fluid layer
// on top of it, and an optional layer of vegetation cover above that.
//
// See also: `surface.rs` for the ground-finding scan over an oracle,
// `cost.rs` for how fluid cells are priced.
//
// **Critical constraint: determinism.** Oracles must be pure: the same
// query returns the same answer for the lifetime of a build.

use crate::types::{Column, GridPos};
use serde::{Deserialize, Serialize};

/// Material classification of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    /// Supports a walker; cannot be occupied.
    Solid,
    /// Water or similar. Can be waded through at a cost; never supports.
    Fluid,
    /// Air and vegetation cover. Passable and never supports.
    Transparent,
}

/// Read-only terrain snapshot consumed by the planner.
pub trait TerrainOracle {
    /// Height of the topmost occupied cell in the column, as a host
    /// heightmap reports it. This may be vegetation cover rather than true
    /// support; every cell above it is `Transparent`.
    fn height_at(&self, column: Column) -> i32;

    /// Material of one cell.
    fn material_at(&self, pos: GridPos) -> Material;
}

impl<T: TerrainOracle + ?Sized> TerrainOracle for &T {
    fn height_at(&self, column: Column) -> i32 {
        (**self).height_at(column)
    }

    fn material_at(&self, pos: GridPos) -> Material {
        (**self).material_at(pos)
    }
}

// ---------------------------------------------------------------------------
// TerrainGrid
// ---------------------------------------------------------------------------

/// Layout of one column: solid up to `ground`, then `fluid_depth` fluid
/// cells, then `cover_height` vegetation cells, then air.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSample {
    pub ground: i32,
    pub fluid_depth: u8,
    pub cover_height: u8,
}

impl ColumnSample {
    pub const fn ground(ground: i32) -> Self {
        Self {
            ground,
            fluid_depth: 0,
            cover_height: 0,
        }
    }

    /// Topmost fluid cell, or the ground when there is no fluid.
    pub fn waterline(&self) -> i32 {
        self.ground + self.fluid_depth as i32
    }

    /// Topmost occupied cell, cover included.
    pub fn top(&self) -> i32 {
        self.waterline() + self.cover_height as i32
    }

    pub fn material_at(&self, y: i32) -> Material {
        if y <= self.ground {
            Material::Solid
        } else if y <= self.waterline() {
            Material::Fluid
        } else {
            Material::Transparent
        }
    }
}

/// Dense column grid over a window, with a default sample outside it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerrainGrid {
    /// Flat storage: index = (x - origin.x) + (z - origin.z) * size_x.
    columns: Vec<ColumnSample>,
    origin: Column,
    size_x: u32,
    size_z: u32,
    default: ColumnSample,
}

impl TerrainGrid {
    /// A `size_x` × `size_z` window starting at `origin`, filled with
    /// `default`, which also covers every column outside the window.
    pub fn new(origin: Column, size_x: u32, size_z: u32, default: ColumnSample) -> Self {
        let total = (size_x as usize) * (size_z as usize);
        Self {
            columns: vec![default; total],
            origin,
            size_x,
            size_z,
            default,
        }
    }

    /// Unbounded flat ground with its top solid cell at `ground`.
    pub fn flat(ground: i32) -> Self {
        Self::new(Column::new(0, 0), 0, 0, ColumnSample::ground(ground))
    }

    pub fn in_window(&self, column: Column) -> bool {
        self.index(column).is_some()
    }

    fn index(&self, column: Column) -> Option<usize> {
        let dx = column.x as i64 - self.origin.x as i64;
        let dz = column.z as i64 - self.origin.z as i64;
        if dx >= 0 && dz >= 0 && (dx as u64) < self.size_x as u64 && (dz as u64) < self.size_z as u64
        {
            Some(dx as usize + dz as usize * self.size_x as usize)
        } else {
            None
        }
    }

    /// Column layout at `column`; the default outside the window.
    pub fn sample(&self, column: Column) -> ColumnSample {
        self.index(column)
            .map(|i| self.columns[i])
            .unwrap_or(self.default)
    }

    /// Overwrite one column. No-op outside the window.
    pub fn set(&mut self, column: Column, sample: ColumnSample) {
        if let Some(i) = self.index(column) {
            self.columns[i] = sample;
        }
    }

    /// Apply `f` to every in-window column of the inclusive rectangle.
    pub fn update_rect(&mut self, min: Column, max: Column, mut f: impl FnMut(&mut ColumnSample)) {
        for z in min.z..=max.z {
            for x in min.x..=max.x {
                if let Some(i) = self.index(Column::new(x, z)) {
                    f(&mut self.columns[i]);
                }
            }
        }
    }

    /// Set the ground height of every column in the inclusive rectangle.
    pub fn fill_ground(&mut self, min: Column, max: Column, ground: i32) {
        self.update_rect(min, max, |c| c.ground = ground);
    }

    /// Flood the inclusive rectangle with a fluid layer `depth` cells deep.
    pub fn add_fluid(&mut self, min: Column, max: Column, depth: u8) {
        self.update_rect(min, max, |c| c.fluid_depth = depth);
    }

    /// Grow vegetation cover `height` cells tall over the rectangle.
    pub fn add_cover(&mut self, min: Column, max: Column, height: u8) {
        self.update_rect(min, max, |c| c.cover_height = height);
    }
}

impl TerrainOracle for TerrainGrid {
    fn height_at(&self, column: Column) -> i32 {
        self.sample(column).top()
    }

    fn material_at(&self, pos: GridPos) -> Material {
        self.sample(pos.column()).material_at(pos.y)
    }
}
