// A* route planning over the implicit terrain surface.
//
// There is no prebuilt graph. Nodes are walkable cells discovered on the
// fly: from each expanded node the planner visits its 8 horizontal
// neighbors in a fixed compass order, resolves each neighbor column's
// walkable height near the current height (`SurfaceResolver`), rejects
// steps taller than `max_step` and cells inside the obstacle field, and
// prices the rest with the `TerrainCostClassifier`. Diagonal steps may not
// cut the corner of an obstacle.
//
// Node records live in a `Vec` arena; an `FxHashMap` maps positions to
// arena slots for lookup only and is never iterated. The open set is a
// `BinaryHeap` (min-heap via reversed ordering, the same pattern as a
// scheduled-event queue) keyed by
//   (f asc, h asc, seeded key asc, insertion sequence asc)
// where the seeded key is drawn from a `SearchRng` seeded per pair. Equal
// (f, h) nodes therefore expand in an order that is reproducible for a seed
// and differs between seeds. Both halves of that are required: identical
// requests must produce identical routes, and reseeding must be able to
// pick a different one of several equally cheap routes.
//
// g is accumulated classified cost. h is the Chebyshev cell distance to the
// goal column times the cheapest possible step, which never overestimates
// with 8-connected moves. A node is explored the first time it is dequeued;
// the search aborts before dequeuing a node past `max_explored_nodes`.
//
// Outcomes: a `PathRoute`, or one of the recoverable `SearchFailure`s. The
// distance pre-check rejects far pairs before any node is touched.
//
// See also: `surface.rs`, `obstacle.rs`, `cost.rs` for the per-node
// collaborators, `network.rs` which runs one search per pair.
//
// **Critical constraint: determinism.** The search is a pure function of
// (terrain, obstacles, config, start, goal, seed). No wall clock, no hash
// map iteration, no floating-point ambiguity: default costs are exact
// binary fractions.

use crate::config::{PlannerConfig, SearchBudget};
use crate::cost::{CategoryCounts, TerrainCategory, TerrainCostClassifier};
use crate::digest::{DeterminismHasher, RouteDigest};
use crate::obstacle::ObstacleField;
use crate::surface::SurfaceResolver;
use crate::terrain::{Material, TerrainOracle};
use crate::types::{Column, GridPos};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;
use trailwright_prng::SearchRng;

/// Horizontal step offsets in expansion order: N, NE, E, SE, S, SW, W, NW.
const COMPASS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A successful route: ordered cells from start to goal, both included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathRoute {
    pub points: Vec<GridPos>,
    /// Sum of classified step costs.
    pub total_cost: f32,
    /// Tallies over every cell after the start.
    pub counts: CategoryCounts,
    /// Distinct nodes dequeued by the search that produced this route.
    pub explored_nodes: u32,
    pub digest: RouteDigest,
}

impl PathRoute {
    fn from_points(points: Vec<GridPos>, total_cost: f32, counts: CategoryCounts, explored_nodes: u32) -> Self {
        let digest = DeterminismHasher::hash(&points);
        Self {
            points,
            total_cost,
            counts,
            explored_nodes,
            digest,
        }
    }

    /// First cell. `None` only for a route built by hand with no points.
    pub fn start(&self) -> Option<GridPos> {
        self.points.first().copied()
    }

    pub fn goal(&self) -> Option<GridPos> {
        self.points.last().copied()
    }

    /// Number of cells stepped into (the start is not counted).
    pub fn steps(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// The waypoints where the step direction changes, plus both ends.
    pub fn corners(&self) -> Vec<GridPos> {
        let (Some(start), Some(goal)) = (self.start(), self.goal()) else {
            return Vec::new();
        };
        let mut out = vec![start];
        for w in self.points.windows(3) {
            let d0 = (w[1].x - w[0].x, w[1].y - w[0].y, w[1].z - w[0].z);
            let d1 = (w[2].x - w[1].x, w[2].y - w[1].y, w[2].z - w[1].z);
            if d0 != d1 {
                out.push(w[1]);
            }
        }
        if self.points.len() > 1 {
            out.push(goal);
        }
        out
    }
}

/// Why a pair produced no route. All variants are recoverable.
#[derive(Clone, Copy, Debug, PartialEq, Error, Serialize, Deserialize)]
pub enum SearchFailure {
    /// Straight-line distance over the budget; no search was run.
    #[error("skipped: {distance:.1} apart exceeds {max_distance:.1}")]
    SkippedTooFar { distance: f64, max_distance: f64 },
    /// The node budget ran out before the goal was dequeued.
    #[error("budget exceeded: explored {explored} of {budget} nodes")]
    BudgetExceeded { explored: u32, budget: u32 },
    /// The frontier emptied before the goal was dequeued.
    #[error("unreachable after exploring {explored} nodes")]
    Unreachable { explored: u32 },
}

impl SearchFailure {
    /// Nodes dequeued before the search gave up.
    pub fn explored(&self) -> u32 {
        match *self {
            SearchFailure::SkippedTooFar { .. } => 0,
            SearchFailure::BudgetExceeded { explored, .. } => explored,
            SearchFailure::Unreachable { explored } => explored,
        }
    }
}

// ---------------------------------------------------------------------------
// Open set
// ---------------------------------------------------------------------------

struct OpenEntry {
    f: f32,
    h: u32,
    tiebreak: u64,
    sequence: u64,
    slot: u32,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: the smallest key is "greatest".
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.tiebreak.cmp(&self.tiebreak))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Open,
    Explored,
}

struct NodeRecord {
    pos: GridPos,
    g: f32,
    parent: Option<u32>,
    /// Category of the step into this node.
    category: TerrainCategory,
    state: NodeState,
}

/// One accepted neighbor of an expanded node.
struct Step {
    pos: GridPos,
    category: TerrainCategory,
    cost: f32,
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Configured A* planner. Cheap to copy; holds no search state.
#[derive(Clone, Copy, Debug)]
pub struct PathPlanner {
    resolver: SurfaceResolver,
    classifier: TerrainCostClassifier,
    budget: SearchBudget,
}

impl PathPlanner {
    pub fn new(resolver: SurfaceResolver, classifier: TerrainCostClassifier, budget: SearchBudget) -> Self {
        Self {
            resolver,
            classifier,
            budget,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(
            SurfaceResolver::new(config.surface),
            TerrainCostClassifier::new(config.costs),
            config.budget,
        )
    }

    /// The same planner with a different budget.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> SearchBudget {
        self.budget
    }

    pub fn resolver(&self) -> &SurfaceResolver {
        &self.resolver
    }

    /// Search from `start` (its y is the reference height for finding the
    /// start surface) to any walkable cell of the `goal` column.
    pub fn plan<T: TerrainOracle + ?Sized>(
        &self,
        terrain: &T,
        obstacles: &ObstacleField,
        start: GridPos,
        goal: Column,
        seed: u64,
    ) -> Result<PathRoute, SearchFailure> {
        let distance = start.column().euclidean_distance(goal);
        if distance > self.budget.max_distance {
            return Err(SearchFailure::SkippedTooFar {
                distance,
                max_distance: self.budget.max_distance,
            });
        }

        let Some(start_y) = self.resolver.nearest_walkable(terrain, start.column(), start.y) else {
            log::trace!("no walkable surface under start {start}");
            return Err(SearchFailure::Unreachable { explored: 0 });
        };
        let start = start.column().at(start_y);
        if obstacles.is_obstacle(start) {
            log::trace!("start {start} lies inside an obstacle");
            return Err(SearchFailure::Unreachable { explored: 0 });
        }

        let costs = self.classifier.params();
        let min_step_cost = costs.flat_cost.min(costs.slope_cost_multiplier);
        let heuristic = |pos: GridPos| {
            let cells = pos.column().cell_distance(goal);
            (cells, cells as f32 * min_step_cost)
        };

        let mut rng = SearchRng::new(seed);
        let mut records: Vec<NodeRecord> = Vec::new();
        let mut index: FxHashMap<GridPos, u32> = FxHashMap::default();
        let mut open = BinaryHeap::new();
        let mut sequence = 0u64;

        records.push(NodeRecord {
            pos: start,
            g: 0.0,
            parent: None,
            category: TerrainCategory::Flat,
            state: NodeState::Open,
        });
        index.insert(start, 0);
        let (h_cells, h_cost) = heuristic(start);
        open.push(OpenEntry {
            f: h_cost,
            h: h_cells,
            tiebreak: rng.next_u64(),
            sequence,
            slot: 0,
        });

        let mut explored = 0u32;
        while let Some(entry) = open.pop() {
            let slot = entry.slot as usize;
            if records[slot].state == NodeState::Explored {
                continue;
            }
            if explored >= self.budget.max_explored_nodes {
                return Err(SearchFailure::BudgetExceeded {
                    explored,
                    budget: self.budget.max_explored_nodes,
                });
            }
            explored += 1;
            records[slot].state = NodeState::Explored;

            let current = records[slot].pos;
            if current.column() == goal {
                return Ok(reconstruct(&records, slot, explored));
            }

            let current_g = records[slot].g;
            for step in self.neighbors(terrain, obstacles, current) {
                let tentative = current_g + step.cost;
                let next_slot = match index.get(&step.pos) {
                    Some(&existing) => {
                        let rec = &mut records[existing as usize];
                        if rec.state == NodeState::Explored || tentative >= rec.g {
                            continue;
                        }
                        rec.g = tentative;
                        rec.parent = Some(slot as u32);
                        rec.category = step.category;
                        existing
                    }
                    None => {
                        let new_slot = records.len() as u32;
                        records.push(NodeRecord {
                            pos: step.pos,
                            g: tentative,
                            parent: Some(slot as u32),
                            category: step.category,
                            state: NodeState::Open,
                        });
                        index.insert(step.pos, new_slot);
                        new_slot
                    }
                };
                sequence += 1;
                let (h_cells, h_cost) = heuristic(step.pos);
                open.push(OpenEntry {
                    f: tentative + h_cost,
                    h: h_cells,
                    tiebreak: rng.next_u64(),
                    sequence,
                    slot: next_slot,
                });
            }
        }

        Err(SearchFailure::Unreachable { explored })
    }

    /// Accepted neighbors of `current`, in compass order.
    fn neighbors<T: TerrainOracle + ?Sized>(
        &self,
        terrain: &T,
        obstacles: &ObstacleField,
        current: GridPos,
    ) -> SmallVec<[Step; 8]> {
        let max_step = self.resolver.params().max_step;
        let column = current.column();
        let mut out = SmallVec::new();

        for &(dx, dz) in &COMPASS {
            let next_column = column.offset(dx, dz);
            let Some(y) = self.resolver.nearest_walkable(terrain, next_column, current.y) else {
                continue;
            };
            let dy = y - current.y;
            if dy.abs() > max_step {
                continue;
            }
            let pos = next_column.at(y);
            if obstacles.is_obstacle(pos) {
                continue;
            }
            if dx != 0 && dz != 0 && cuts_corner(obstacles, current, pos, dx, dz) {
                continue;
            }
            let is_fluid = terrain.material_at(pos) == Material::Fluid;
            let (category, cost) = self.classifier.classify(dy, is_fluid);
            out.push(Step {
                pos,
                category,
                cost,
            });
        }
        out
    }
}

/// Whether a diagonal step passes through an obstacle at either of the two
/// orthogonal cells it squeezes between.
fn cuts_corner(obstacles: &ObstacleField, from: GridPos, to: GridPos, dx: i32, dz: i32) -> bool {
    let y = from.y.max(to.y);
    obstacles.is_obstacle(GridPos::new(from.x + dx, y, from.z))
        || obstacles.is_obstacle(GridPos::new(from.x, y, from.z + dz))
}

/// Walk parent links from `goal_slot` back to the start.
fn reconstruct(records: &[NodeRecord], goal_slot: usize, explored: u32) -> PathRoute {
    let mut points = Vec::new();
    let mut counts = CategoryCounts::default();
    let mut slot = Some(goal_slot);
    while let Some(s) = slot {
        let rec = &records[s];
        points.push(rec.pos);
        if rec.parent.is_some() {
            counts.record(rec.category);
        }
        slot = rec.parent.map(|p| p as usize);
    }
    points.reverse();
    PathRoute::from_points(points, records[goal_slot].g, counts, explored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{ColumnSample, TerrainGrid};
    use crate::volume::Volume;

    fn planner() -> PathPlanner {
        PathPlanner::from_config(&PlannerConfig::default())
    }

    fn flat() -> TerrainGrid {
        TerrainGrid::flat(63)
    }

    #[test]
    fn straight_line_on_flat_ground() {
        let route = planner()
            .plan(&flat(), &ObstacleField::empty(), GridPos::new(0, 64, 0), Column::new(40, 0), 1)
            .unwrap();
        assert_eq!(route.start(), Some(GridPos::new(0, 64, 0)));
        assert_eq!(route.goal(), Some(GridPos::new(40, 64, 0)));
        assert_eq!(route.total_cost, 40.0);
        assert_eq!(route.counts.flat, 40);
        assert_eq!(route.counts.slope + route.counts.steep + route.counts.fluid, 0);
        assert_eq!(route.steps(), 40);
        assert!(route.explored_nodes <= planner().budget().max_explored_nodes);
    }

    #[test]
    fn same_column_is_a_single_node_route() {
        let route = planner()
            .plan(&flat(), &ObstacleField::empty(), GridPos::new(3, 64, 3), Column::new(3, 3), 9)
            .unwrap();
        assert_eq!(route.points, vec![GridPos::new(3, 64, 3)]);
        assert_eq!(route.total_cost, 0.0);
        assert_eq!(route.counts.total(), 0);
        assert_eq!(route.explored_nodes, 1);
    }

    #[test]
    fn start_height_is_resolved_from_reference() {
        let route = planner()
            .plan(&flat(), &ObstacleField::empty(), GridPos::new(0, 70, 0), Column::new(2, 0), 1)
            .unwrap();
        assert_eq!(route.start(), Some(GridPos::new(0, 64, 0)));
    }

    #[test]
    fn far_pairs_are_skipped_without_search() {
        let err = planner()
            .plan(&flat(), &ObstacleField::empty(), GridPos::new(0, 64, 0), Column::new(250, 0), 1)
            .unwrap_err();
        assert_eq!(
            err,
            SearchFailure::SkippedTooFar {
                distance: 250.0,
                max_distance: 200.0
            }
        );
        assert_eq!(err.explored(), 0);
    }

    #[test]
    fn budget_is_enforced() {
        let tiny = planner().with_budget(SearchBudget {
            max_explored_nodes: 10,
            max_distance: 200.0,
        });
        let err = tiny
            .plan(&flat(), &ObstacleField::empty(), GridPos::new(0, 64, 0), Column::new(40, 0), 1)
            .unwrap_err();
        assert_eq!(
            err,
            SearchFailure::BudgetExceeded {
                explored: 10,
                budget: 10
            }
        );
    }

    #[test]
    fn walled_in_goal_exhausts_budget() {
        // A pit at ground 63 ringed by cliffs at 80. The plain around it is
        // unbounded, so the search runs out of budget rather than frontier.
        let mut grid = TerrainGrid::new(Column::new(-10, -10), 40, 40, ColumnSample::ground(63));
        grid.fill_ground(Column::new(8, -2), Column::new(12, 2), 80);
        grid.set(Column::new(10, 0), ColumnSample::ground(63));
        let err = planner()
            .plan(&grid, &ObstacleField::empty(), GridPos::new(0, 64, 0), Column::new(10, 0), 1)
            .unwrap_err();
        assert_eq!(
            err,
            SearchFailure::BudgetExceeded {
                explored: 5000,
                budget: 5000
            }
        );
    }

    #[test]
    fn enclosed_start_exhausts_frontier() {
        // Start in a 3x3 pit whose walls are 5 tall; goal outside.
        let mut grid = TerrainGrid::new(Column::new(-5, -5), 11, 11, ColumnSample::ground(63));
        grid.fill_ground(Column::new(-2, -2), Column::new(2, 2), 68);
        grid.fill_ground(Column::new(-1, -1), Column::new(1, 1), 63);
        let err = planner()
            .plan(&grid, &ObstacleField::empty(), GridPos::new(0, 64, 0), Column::new(4, 4), 1)
            .unwrap_err();
        assert_eq!(err, SearchFailure::Unreachable { explored: 9 });
    }

    #[test]
    fn start_inside_obstacle_is_unreachable() {
        let wall = Volume::new(GridPos::new(-1, 60, -1), GridPos::new(1, 70, 1)).unwrap();
        let field = ObstacleField::new([wall], 0);
        let err = planner()
            .plan(&flat(), &field, GridPos::new(0, 64, 0), Column::new(10, 0), 1)
            .unwrap_err();
        assert_eq!(err, SearchFailure::Unreachable { explored: 0 });
    }

    #[test]
    fn routes_around_obstacles() {
        let wall = Volume::new(GridPos::new(10, 60, -5), GridPos::new(11, 70, 5)).unwrap();
        let field = ObstacleField::new([wall], 2);
        let route = planner()
            .plan(&flat(), &field, GridPos::new(0, 64, 0), Column::new(20, 0), 3)
            .unwrap();
        assert!(route.points.iter().all(|p| !field.is_obstacle(*p)));
        assert!(route.total_cost > 20.0);
    }

    #[test]
    fn climbs_single_steps_and_counts_slopes() {
        // A staircase: ground rises by one every 5 columns.
        let mut grid = TerrainGrid::new(Column::new(-5, -20), 40, 40, ColumnSample::ground(63));
        for i in 0..4 {
            grid.fill_ground(Column::new(5 * i, -20), Column::new(5 * i + 4, 19), 63 + i);
        }
        let route = planner()
            .plan(&grid, &ObstacleField::empty(), GridPos::new(0, 64, 0), Column::new(19, 0), 2)
            .unwrap();
        assert_eq!(route.goal(), Some(GridPos::new(19, 67, 0)));
        assert_eq!(route.counts.slope, 3);
        assert_eq!(route.counts.steep, 0);
        assert_eq!(route.total_cost, 16.0 + 3.0 * 2.0);
    }

    #[test]
    fn wades_a_river_that_cannot_be_walked_around() {
        // A 3-wide river across the whole window; the nearest dry crossing
        // is more than 60 columns away.
        let mut grid = TerrainGrid::new(Column::new(-30, -60), 80, 120, ColumnSample::ground(63));
        grid.add_fluid(Column::new(9, -60), Column::new(11, 59), 1);
        let route = planner()
            .plan(&grid, &ObstacleField::empty(), GridPos::new(0, 64, 0), Column::new(20, 0), 4)
            .unwrap();
        assert_eq!(route.goal(), Some(GridPos::new(20, 64, 0)));
        assert_eq!(
            route.counts,
            CategoryCounts {
                flat: 17,
                slope: 0,
                steep: 0,
                fluid: 3
            }
        );
        assert_eq!(route.total_cost, 17.0 + 3.0 * 11.0);
        for p in &route.points {
            let wet = grid.material_at(*p) == Material::Fluid;
            assert_eq!(wet, (9..=11).contains(&p.x), "{p}");
        }
    }

    /// A plateau two cells above the plain covering x >= 10, with a one-cell
    /// ramp column at (9, ramp_z).
    fn ledge(ramp_z: i32) -> TerrainGrid {
        let mut grid = TerrainGrid::new(Column::new(-10, -40), 60, 80, ColumnSample::ground(63));
        grid.fill_ground(Column::new(10, -40), Column::new(49, 39), 65);
        grid.set(Column::new(9, ramp_z), ColumnSample::ground(64));
        grid
    }

    fn two_step_planner() -> PathPlanner {
        PathPlanner::from_config(&PlannerConfig {
            surface: crate::config::SurfaceParams {
                max_step: 2,
                ..Default::default()
            },
            ..PlannerConfig::default()
        })
    }

    #[test]
    fn steep_step_taken_when_the_ramp_is_far() {
        let route = two_step_planner()
            .plan(&ledge(20), &ObstacleField::empty(), GridPos::new(0, 64, 0), Column::new(20, 0), 6)
            .unwrap();
        assert_eq!(route.goal(), Some(GridPos::new(20, 66, 0)));
        assert_eq!(route.counts.steep, 1);
        assert_eq!(route.counts.slope, 0);
        assert_eq!(route.total_cost, 19.0 + 4.0);
    }

    #[test]
    fn nearby_ramp_beats_the_steep_step() {
        let route = two_step_planner()
            .plan(&ledge(2), &ObstacleField::empty(), GridPos::new(0, 64, 0), Column::new(20, 0), 6)
            .unwrap();
        assert_eq!(route.goal(), Some(GridPos::new(20, 66, 0)));
        assert_eq!(route.counts.steep, 0);
        assert_eq!(route.counts.slope, 2);
        assert!(route.points.contains(&GridPos::new(9, 65, 2)));
        assert_eq!(route.total_cost, 18.0 + 2.0 * 2.0);
    }

    #[test]
    fn single_steps_detour_to_the_ramp() {
        let route = planner()
            .plan(&ledge(20), &ObstacleField::empty(), GridPos::new(0, 64, 0), Column::new(20, 0), 6)
            .unwrap();
        assert!(route.points.contains(&GridPos::new(9, 65, 20)));
        assert_eq!(route.counts.steep, 0);
        assert_eq!(route.counts.slope, 2);
        assert_eq!(route.total_cost, 38.0 + 2.0 * 2.0);
    }

    #[test]
    fn identical_inputs_identical_routes() {
        let wall = Volume::new(GridPos::new(10, 60, -3), GridPos::new(10, 70, 3)).unwrap();
        let field = ObstacleField::new([wall], 2);
        let a = planner()
            .plan(&flat(), &field, GridPos::new(0, 64, 0), Column::new(25, 7), 77)
            .unwrap();
        let b = planner()
            .plan(&flat(), &field, GridPos::new(0, 64, 0), Column::new(25, 7), 77)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn seeds_choose_among_equal_cost_routes() {
        let digests: std::collections::BTreeSet<_> = (0..16)
            .map(|seed| {
                planner()
                    .plan(&flat(), &ObstacleField::empty(), GridPos::new(0, 64, 0), Column::new(20, 9), seed)
                    .unwrap()
            })
            .inspect(|r| assert_eq!(r.total_cost, 20.0))
            .map(|r| r.digest)
            .collect();
        assert!(digests.len() > 1);
    }

    fn route_through(points: Vec<GridPos>) -> PathRoute {
        let cost = points.len().saturating_sub(1) as f32;
        PathRoute::from_points(points, cost, CategoryCounts::default(), 0)
    }

    #[test]
    fn corners_of_a_straight_run_are_its_ends() {
        let route = route_through((0..=10).map(|x| GridPos::new(x, 64, 0)).collect());
        assert_eq!(
            route.corners(),
            vec![GridPos::new(0, 64, 0), GridPos::new(10, 64, 0)]
        );
    }

    #[test]
    fn corners_keep_bends_and_height_changes() {
        // East along z = 0, a one-cell climb at x = 3, then north to z = -3.
        let route = route_through(vec![
            GridPos::new(0, 64, 0),
            GridPos::new(1, 64, 0),
            GridPos::new(2, 64, 0),
            GridPos::new(3, 65, 0),
            GridPos::new(3, 65, -1),
            GridPos::new(3, 65, -2),
            GridPos::new(3, 65, -3),
        ]);
        assert_eq!(
            route.corners(),
            vec![
                GridPos::new(0, 64, 0),
                GridPos::new(2, 64, 0),
                GridPos::new(3, 65, 0),
                GridPos::new(3, 65, -3),
            ]
        );
    }

    #[test]
    fn single_cell_route_has_one_corner() {
        let route = route_through(vec![GridPos::new(4, 64, 4)]);
        assert_eq!(route.corners(), vec![GridPos::new(4, 64, 4)]);
        assert_eq!(route.steps(), 0);
    }

    #[test]
    fn empty_route_accessors_do_not_panic() {
        let json = serde_json::to_string(&route_through(Vec::new())).unwrap();
        let route: PathRoute = serde_json::from_str(&json).unwrap();
        assert!(route.points.is_empty());
        assert_eq!(route.start(), None);
        assert_eq!(route.goal(), None);
        assert_eq!(route.steps(), 0);
        assert!(route.corners().is_empty());
    }

    #[test]
    fn failure_messages() {
        let e = SearchFailure::BudgetExceeded {
            explored: 5000,
            budget: 5000,
        };
        assert_eq!(e.to_string(), "budget exceeded: explored 5000 of 5000 nodes");
    }
}
