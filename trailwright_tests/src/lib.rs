// Fixture worlds and helpers for trailwright integration tests.
//
// Every fixture is reproducible from its arguments: mixed terrain and
// member placement draw from a seeded `SearchRng`, never from OS entropy.
// The terrain is a plain `TerrainGrid` and obstacles go through a real
// `VolumeRegistry`, so the integration tests exercise the same code paths a
// host would.
//
// See also: `tests/properties.rs` for the end-to-end planner properties,
// `tests/cache.rs` for snapshot consistency and the concurrency cap.

use std::collections::BTreeSet;
use std::sync::Mutex;

use trailwright_core::{
    Column, ColumnSample, GridPos, GroupId, Material, NetworkRequest, TerrainGrid, TerrainOracle,
    Volume, VolumeId, VolumeRegistry,
};
use trailwright_prng::SearchRng;

/// Top solid cell of the default ground.
pub const GROUND: i32 = 63;

/// Walkable cell over default ground.
pub fn surface(x: i32, z: i32) -> GridPos {
    GridPos::new(x, GROUND + 1, z)
}

/// Unbounded flat ground.
pub fn flat_world() -> TerrainGrid {
    TerrainGrid::flat(GROUND)
}

/// Flat ground with a fluid patch straddling the x axis between x = 15 and
/// x = 25, directly on the straight line from (0, 0) to (40, 0).
pub fn fluid_crossing() -> TerrainGrid {
    let mut grid = TerrainGrid::new(Column::new(-20, -40), 100, 80, ColumnSample::ground(GROUND));
    grid.add_fluid(Column::new(15, -6), Column::new(25, 6), 1);
    grid
}

/// Rolling terrain over a `(2 * half + 1)` square window: stepped hills
/// built from nested rectangles one cell taller than the ring around them,
/// scattered ponds, and vegetation cover.
pub fn mixed_terrain(seed: u64, half: i32) -> TerrainGrid {
    let mut rng = SearchRng::new(seed);
    let size = (2 * half + 1) as u32;
    let mut grid = TerrainGrid::new(
        Column::new(-half, -half),
        size,
        size,
        ColumnSample::ground(GROUND),
    );

    for _ in 0..(half / 6).max(1) {
        let cx = rng.range_i32(-half, half + 1);
        let cz = rng.range_i32(-half, half + 1);
        let levels = rng.range_i32(1, 4);
        let radius = rng.range_i32(8, 14);
        for level in 0..levels {
            let r = radius - level * 3;
            if r < 1 {
                break;
            }
            grid.update_rect(
                Column::new(cx - r, cz - r),
                Column::new(cx + r, cz + r),
                |c| c.ground += 1,
            );
        }
    }

    for _ in 0..(half / 10).max(1) {
        let cx = rng.range_i32(-half, half + 1);
        let cz = rng.range_i32(-half, half + 1);
        let w = rng.range_i32(1, 4);
        let d = rng.range_i32(1, 4);
        grid.add_fluid(Column::new(cx - w, cz - d), Column::new(cx + w, cz + d), 1);
    }

    for _ in 0..(half / 8).max(1) {
        let cx = rng.range_i32(-half, half + 1);
        let cz = rng.range_i32(-half, half + 1);
        let r = rng.range_i32(2, 6);
        grid.add_cover(Column::new(cx - r, cz - r), Column::new(cx + r, cz + r), 2);
    }

    grid
}

/// `count` dry walkable sites within `radius` columns of `center`, none of
/// them in or next to fluid.
pub fn dry_sites(
    terrain: &TerrainGrid,
    rng: &mut SearchRng,
    center: Column,
    radius: i32,
    count: usize,
) -> Vec<GridPos> {
    let mut sites = Vec::with_capacity(count);
    let mut attempts = 0;
    while sites.len() < count {
        attempts += 1;
        assert!(attempts < 10_000, "could not place {count} dry sites");
        let column = Column::new(
            center.x + rng.range_i32(-radius, radius + 1),
            center.z + rng.range_i32(-radius, radius + 1),
        );
        let wet = (-1..=1).any(|dx| {
            (-1..=1).any(|dz| terrain.sample(column.offset(dx, dz)).fluid_depth > 0)
        });
        if wet {
            continue;
        }
        let pos = column.at(terrain.sample(column).ground + 1);
        if !sites.contains(&pos) {
            sites.push(pos);
        }
    }
    sites
}

/// A group request with a hub at `hub` and `members` dry sites around it.
pub fn group_request(
    terrain: &TerrainGrid,
    group: u64,
    hub: Column,
    radius: i32,
    members: usize,
    seed: u64,
) -> NetworkRequest {
    let mut rng = SearchRng::from_keys(seed, &[group]);
    let mut sites = dry_sites(terrain, &mut rng, hub, radius, members + 1);
    let hub = sites.remove(0);
    NetworkRequest::new(GroupId(group), hub, sites, seed)
}

/// A registry holding a row of huts along z = 0 between x = 10 and x = 40,
/// alternating sides of the axis, each owned by group 1.
pub fn hut_row() -> VolumeRegistry {
    let mut registry = VolumeRegistry::new();
    for (i, x) in (10..40).step_by(8).enumerate() {
        let z = if i % 2 == 0 { -4 } else { 1 };
        let hut = Volume::new(
            GridPos::new(x, GROUND + 1, z),
            GridPos::new(x + 2, GROUND + 4, z + 2),
        )
        .expect("hut bounds are ordered");
        registry.register(VolumeId(i as u64), GroupId(1), hut);
    }
    registry
}

/// Oracle wrapper that records the name of every thread that queries it.
pub struct ThreadRecorder<T> {
    inner: T,
    threads: Mutex<BTreeSet<String>>,
}

impl<T> ThreadRecorder<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            threads: Mutex::new(BTreeSet::new()),
        }
    }

    /// Names of the threads seen so far. Unnamed threads record as "".
    pub fn threads(&self) -> BTreeSet<String> {
        self.threads.lock().expect("recorder lock poisoned").clone()
    }

    fn record(&self) {
        let name = std::thread::current().name().unwrap_or("").to_string();
        self.threads
            .lock()
            .expect("recorder lock poisoned")
            .insert(name);
    }
}

impl<T: TerrainOracle> TerrainOracle for ThreadRecorder<T> {
    fn height_at(&self, column: Column) -> i32 {
        self.record();
        self.inner.height_at(column)
    }

    fn material_at(&self, pos: GridPos) -> Material {
        self.inner.material_at(pos)
    }
}
