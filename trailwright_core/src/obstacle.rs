// Obstacle geometry: the occupied-volume registry and the read-only field
// snapshots searches run against.
//
// `VolumeRegistry` mirrors the placement subsystem's footprints: a volume is
// registered when a structure is placed and removed when its owner goes
// away. Searches never see the registry directly. A build takes one
// `snapshot()`, an `Arc<ObstacleField>` of buffer-expanded volumes, and uses
// it for every pair search in that build, so registrations that land
// mid-build are invisible to in-flight searches.
//
// `ObstacleField` keeps its volumes in registration order and indexes them
// by 16×16 horizontal chunk in a `BTreeMap`, so a point query only tests
// volumes whose footprint touches the query's chunk. Volumes too wide to
// index cheaply go into a short list that every query scans.
//
// See also: `volume.rs` for `Volume` and buffer expansion, `surface.rs` for
// the vertical alignment half of walkability, `planner.rs` which queries
// `is_obstacle` for every candidate neighbor.
//
// **Critical constraint: determinism.** Registry iteration is `VolumeId`
// order and chunk candidate lists are ascending volume indices, so query
// results never depend on insertion history beyond the snapshot contents.

use crate::surface::SurfaceResolver;
use crate::terrain::TerrainOracle;
use crate::types::{Column, GridPos, GroupId, VolumeId};
use crate::volume::Volume;
use std::collections::BTreeMap;
use std::sync::Arc;

/// log2 of the chunk edge length used by the spatial index.
const CHUNK_SHIFT: u32 = 4;

/// Volumes covering more chunks than this skip the index.
const MAX_INDEXED_CHUNKS: u64 = 1024;

// ---------------------------------------------------------------------------
// ObstacleField
// ---------------------------------------------------------------------------

/// Immutable set of buffer-expanded volumes.
#[derive(Clone, Debug, Default)]
pub struct ObstacleField {
    volumes: Vec<Volume>,
    chunks: BTreeMap<(i32, i32), Vec<u32>>,
    wide: Vec<u32>,
    buffer: i32,
}

impl ObstacleField {
    /// A field with no obstacles.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Expand every volume by `buffer` and index the results.
    pub fn new(volumes: impl IntoIterator<Item = Volume>, buffer: i32) -> Self {
        let mut field = Self {
            buffer,
            ..Self::default()
        };
        for volume in volumes {
            field.insert(volume.expand(buffer));
        }
        log::trace!(
            "obstacle field: {} volumes, {} chunks indexed, {} wide",
            field.volumes.len(),
            field.chunks.len(),
            field.wide.len()
        );
        field
    }

    fn insert(&mut self, volume: Volume) {
        let idx = self.volumes.len() as u32;
        let (cx0, cz0) = chunk_of(Column::new(volume.min().x, volume.min().z));
        let (cx1, cz1) = chunk_of(Column::new(volume.max().x, volume.max().z));
        let covered = (cx1 as i64 - cx0 as i64 + 1) as u64 * (cz1 as i64 - cz0 as i64 + 1) as u64;
        if covered > MAX_INDEXED_CHUNKS {
            self.wide.push(idx);
        } else {
            for cz in cz0..=cz1 {
                for cx in cx0..=cx1 {
                    self.chunks.entry((cx, cz)).or_default().push(idx);
                }
            }
        }
        self.volumes.push(volume);
    }

    /// Buffer the source volumes were expanded by.
    pub fn buffer(&self) -> i32 {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Expanded volumes in registration order.
    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    fn candidates(&self, column: Column) -> impl Iterator<Item = &Volume> + '_ {
        let indexed = self
            .chunks
            .get(&chunk_of(column))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        indexed
            .iter()
            .chain(self.wide.iter())
            .map(|&i| &self.volumes[i as usize])
    }

    /// Whether `pos` lies inside any expanded volume.
    pub fn is_obstacle(&self, pos: GridPos) -> bool {
        self.candidates(pos.column()).any(|v| v.contains(pos))
    }

    /// Whether any expanded volume occupies `column` between `y_min` and
    /// `y_max` inclusive.
    pub fn intersects_column(&self, column: Column, y_min: i32, y_max: i32) -> bool {
        self.candidates(column)
            .any(|v| v.intersects_column(column, y_min, y_max))
    }

    /// A walkable node: aligned with the resolved ground surface and not
    /// inside any obstacle.
    pub fn is_walkable<T: TerrainOracle + ?Sized>(
        &self,
        terrain: &T,
        resolver: &SurfaceResolver,
        pos: GridPos,
    ) -> bool {
        !self.is_obstacle(pos) && resolver.is_aligned(terrain, pos)
    }
}

/// Chunk key of a column. Arithmetic shift floors negative coordinates.
fn chunk_of(column: Column) -> (i32, i32) {
    (column.x >> CHUNK_SHIFT, column.z >> CHUNK_SHIFT)
}

// ---------------------------------------------------------------------------
// VolumeRegistry
// ---------------------------------------------------------------------------

/// A footprint registered by the placement subsystem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupiedVolume {
    pub id: VolumeId,
    pub owner: GroupId,
    pub volume: Volume,
}

/// Current set of occupied volumes, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct VolumeRegistry {
    entries: BTreeMap<VolumeId, OccupiedVolume>,
}

impl VolumeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a footprint. Returns the entry it replaced, if any.
    pub fn register(
        &mut self,
        id: VolumeId,
        owner: GroupId,
        volume: Volume,
    ) -> Option<OccupiedVolume> {
        self.entries.insert(id, OccupiedVolume { id, owner, volume })
    }

    pub fn remove(&mut self, id: VolumeId) -> Option<OccupiedVolume> {
        self.entries.remove(&id)
    }

    /// Drop every footprint owned by `owner`. Returns how many were removed.
    pub fn remove_owner(&mut self, owner: GroupId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.owner != owner);
        before - self.entries.len()
    }

    pub fn get(&self, id: VolumeId) -> Option<&OccupiedVolume> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in `VolumeId` order.
    pub fn iter(&self) -> impl Iterator<Item = &OccupiedVolume> + '_ {
        self.entries.values()
    }

    /// Freeze the current footprints into an obstacle field.
    pub fn snapshot(&self, buffer: i32) -> Arc<ObstacleField> {
        Arc::new(ObstacleField::new(
            self.entries.values().map(|e| e.volume.clone()),
            buffer,
        ))
    }
}
