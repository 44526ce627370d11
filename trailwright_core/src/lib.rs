// trailwright_core: deterministic terrain-aware route planning.
//
// This crate computes walkable routes between points of interest over an
// implicit, unbounded terrain surface. Routes avoid occupied volumes, prefer
// cheap terrain, respect per-search node and distance budgets, and come out
// identical for identical inputs. It never owns the world: terrain arrives
// through a `TerrainOracle`, obstacles through a `VolumeRegistry` snapshot,
// and groups through `NetworkRequest`s.
//
// Module overview:
// - `types.rs`:    GridPos, Column, GroupId, VolumeId, Axis.
// - `terrain.rs`:  TerrainOracle contract + TerrainGrid, an in-memory heightfield.
// - `surface.rs`:  SurfaceResolver, nearest walkable height in a column.
// - `volume.rs`:   Volume, inclusive box with optional occupancy mask and buffer expansion.
// - `obstacle.rs`: ObstacleField (chunk-indexed, read-only) + VolumeRegistry snapshots.
// - `cost.rs`:     TerrainCostClassifier and per-route category tallies.
// - `planner.rs`:  PathPlanner, A* over the implicit surface with seeded tie-breaking.
// - `network.rs`:  NetworkBuild, PathNetwork, and PathNetworkCache (pooled, atomic replace).
// - `digest.rs`:   DeterminismHasher, SHA-256 over canonical waypoint text.
// - `config.rs`:   PlannerConfig, every tunable, loaded from JSON.
// - `error.rs`:    PathingError, fatal input-validation errors.
// - `prng`:        Re-exported from `trailwright_prng`: xoshiro256++ with keyed seed derivation.
//
// The library logs through the `log` facade and never installs a logger.
// Hosts that want the records wire up their own backend.
//
// **Critical constraint: determinism.** A network build is a pure function
// of (request, config, terrain, obstacle snapshot). All tie-break randomness
// comes from seeded `SearchRng` streams. No iteration over hashed
// containers, no system time, no OS entropy. Use `BTreeMap` for ordered
// collections.

pub mod config;
pub mod cost;
pub mod digest;
pub mod error;
pub mod network;
pub mod obstacle;
pub mod planner;
pub use trailwright_prng as prng;
pub mod surface;
pub mod terrain;
pub mod types;
pub mod volume;

pub use config::{CostParams, PairingPolicy, PlannerConfig, SearchBudget, SurfaceParams};
pub use cost::{CategoryCounts, TerrainCategory, TerrainCostClassifier};
pub use digest::{DeterminismHasher, RouteDigest};
pub use error::{PathingError, Result};
pub use network::{
    NetworkBuild, NetworkReport, NetworkRequest, NetworkRoute, NetworkStats, PairOutcome,
    PathNetwork, PathNetworkCache,
};
pub use obstacle::{ObstacleField, OccupiedVolume, VolumeRegistry};
pub use planner::{PathPlanner, PathRoute, SearchFailure};
pub use surface::SurfaceResolver;
pub use terrain::{ColumnSample, Material, TerrainGrid, TerrainOracle};
pub use types::{Axis, Column, GridPos, GroupId, VolumeId};
pub use volume::{MAX_MASK_CELLS, Volume};
