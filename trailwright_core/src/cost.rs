// Terrain cost classification for a single step.
//
// Prices one traversed cell from the height change of the step into it and
// whether the cell is fluid:
//
//   |dy| = 0              Flat   flat_cost
//   0 < |dy| < steep      Slope  |dy| * slope_cost_multiplier
//   |dy| >= steep         Steep  |dy| * slope_cost_multiplier
//   fluid cell            Fluid  water_cost added to any of the above
//
// Steep steps are discouraged but not forbidden; whether a steep step is
// reachable at all is the planner's `max_step` rule. Cells that fail the
// walkability test are never enumerated, so "blocked" never reaches here as
// a price, but the category exists for diagnostics.
//
// The classifier is a pure function of its inputs and `CostParams`. With
// the default weights every cost is an exact binary fraction, so equal-cost
// paths tie exactly and ordering falls through to the seeded tie-break.

use crate::config::CostParams;
use serde::{Deserialize, Serialize};

/// Coarse classification of one traversed cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainCategory {
    Flat,
    Slope,
    Steep,
    Fluid,
    Blocked,
}

/// Per-route tallies of traversed cells by category. A fluid cell counts as
/// fluid only, whatever its height change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub flat: u32,
    pub slope: u32,
    pub steep: u32,
    pub fluid: u32,
}

impl CategoryCounts {
    pub fn record(&mut self, category: TerrainCategory) {
        match category {
            TerrainCategory::Flat => self.flat += 1,
            TerrainCategory::Slope => self.slope += 1,
            TerrainCategory::Steep => self.steep += 1,
            TerrainCategory::Fluid => self.fluid += 1,
            TerrainCategory::Blocked => {}
        }
    }

    pub fn total(&self) -> u32 {
        self.flat + self.slope + self.steep + self.fluid
    }

    pub fn add(&mut self, other: &CategoryCounts) {
        self.flat += other.flat;
        self.slope += other.slope;
        self.steep += other.steep;
        self.fluid += other.fluid;
    }
}

/// Stateless step pricing.
#[derive(Clone, Copy, Debug)]
pub struct TerrainCostClassifier {
    params: CostParams,
}

impl TerrainCostClassifier {
    pub fn new(params: CostParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CostParams {
        &self.params
    }

    /// Category and cost of stepping into a cell `height_delta` above the
    /// previous one.
    pub fn classify(&self, height_delta: i32, is_fluid: bool) -> (TerrainCategory, f32) {
        let rise = height_delta.unsigned_abs();
        let (category, base) = if rise == 0 {
            (TerrainCategory::Flat, self.params.flat_cost)
        } else if rise < self.params.steep_threshold {
            (
                TerrainCategory::Slope,
                rise as f32 * self.params.slope_cost_multiplier,
            )
        } else {
            (
                TerrainCategory::Steep,
                rise as f32 * self.params.slope_cost_multiplier,
            )
        };
        if is_fluid {
            (TerrainCategory::Fluid, base + self.params.water_cost)
        } else {
            (category, base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> TerrainCostClassifier {
        TerrainCostClassifier::new(CostParams::default())
    }

    #[test]
    fn flat_step_costs_one() {
        assert_eq!(classifier().classify(0, false), (TerrainCategory::Flat, 1.0));
    }

    #[test]
    fn single_rise_or_drop_is_slope() {
        let c = classifier();
        assert_eq!(c.classify(1, false), (TerrainCategory::Slope, 2.0));
        assert_eq!(c.classify(-1, false), (TerrainCategory::Slope, 2.0));
    }

    #[test]
    fn two_or_more_is_steep() {
        let c = classifier();
        assert_eq!(c.classify(2, false), (TerrainCategory::Steep, 4.0));
        assert_eq!(c.classify(-3, false), (TerrainCategory::Steep, 6.0));
    }

    #[test]
    fn fluid_adds_water_cost() {
        let c = classifier();
        assert_eq!(c.classify(0, true), (TerrainCategory::Fluid, 11.0));
        assert_eq!(c.classify(-1, true), (TerrainCategory::Fluid, 12.0));
    }

    #[test]
    fn minimum_cost_is_flat_cost() {
        let c = classifier();
        for dy in -4..=4 {
            for fluid in [false, true] {
                assert!(c.classify(dy, fluid).1 >= 1.0);
            }
        }
    }

    #[test]
    fn counts_accumulate() {
        let mut counts = CategoryCounts::default();
        for cat in [
            TerrainCategory::Flat,
            TerrainCategory::Flat,
            TerrainCategory::Slope,
            TerrainCategory::Fluid,
            TerrainCategory::Blocked,
        ] {
            counts.record(cat);
        }
        assert_eq!(counts.flat, 2);
        assert_eq!(counts.slope, 1);
        assert_eq!(counts.fluid, 1);
        assert_eq!(counts.total(), 4);

        let mut sum = CategoryCounts::default();
        sum.add(&counts);
        sum.add(&counts);
        assert_eq!(sum.total(), 8);
    }
}
