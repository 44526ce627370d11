// Ground finding: the nearest walkable height in a column.
//
// A walkable height is the cell directly above solid support that is not
// itself solid. Vegetation cover and air are transparent, so the scan runs
// straight through them to the real ground; fluid never supports, so a
// flooded column resolves to the first cell above the riverbed (the walker
// wades).
//
// Scan order is fixed: downward from the reference height through
// `scan_down` cells, then upward through `scan_up` cells. The first match
// wins, which makes the resolver prefer the surface the walker is already
// on over a ledge above it. The oracle's reported column height is used to
// skip the empty cells above the column top.
//
// See also: `obstacle.rs` for the walkability test that layers obstacle
// exclusion on top of this, `planner.rs` which resolves every neighbor
// column through here.

use crate::config::SurfaceParams;
use crate::terrain::{Material, TerrainOracle};
use crate::types::{Column, GridPos};

/// Pure ground-finding over a terrain oracle.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceResolver {
    params: SurfaceParams,
}

impl SurfaceResolver {
    pub fn new(params: SurfaceParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }

    /// Walkable height nearest to `reference_y` in `column`, or `None` if no
    /// supported cell lies within the scan window.
    pub fn nearest_walkable<T: TerrainOracle + ?Sized>(
        &self,
        terrain: &T,
        column: Column,
        reference_y: i32,
    ) -> Option<i32> {
        let low = reference_y.saturating_sub(self.params.scan_down);
        let high = reference_y.saturating_add(self.params.scan_up);

        // Nothing above the column top can be supported except the cell
        // directly over it.
        let ceiling = terrain.height_at(column).saturating_add(1);

        let down_from = reference_y.min(ceiling);
        if let Some(y) = (low..=down_from)
            .rev()
            .find(|&y| is_supported(terrain, column.at(y)))
        {
            return Some(y);
        }

        let up_to = high.min(ceiling);
        (reference_y.saturating_add(1)..=up_to).find(|&y| is_supported(terrain, column.at(y)))
    }

    /// Whether `pos` is open and sits within the walkable tolerance of the
    /// resolved surface in its column.
    pub fn is_aligned<T: TerrainOracle + ?Sized>(&self, terrain: &T, pos: GridPos) -> bool {
        if terrain.material_at(pos) == Material::Solid {
            return false;
        }
        self.nearest_walkable(terrain, pos.column(), pos.y)
            .is_some_and(|ground| (pos.y - ground).abs() <= self.params.walkable_tolerance)
    }
}

/// Non-solid cell resting on a solid one.
fn is_supported<T: TerrainOracle + ?Sized>(terrain: &T, pos: GridPos) -> bool {
    terrain.material_at(pos) != Material::Solid
        && terrain.material_at(GridPos::new(pos.x, pos.y - 1, pos.z)) == Material::Solid
}
