// Fatal, input-validation errors.
//
// `PathingError` covers failures that reject caller input outright: malformed
// volume geometry, an occupancy mask that does not fit its box, and
// configuration that cannot be loaded or does not validate. Recoverable
// per-pair search outcomes are not errors and live in `planner.rs` as
// `SearchFailure`; a network build never fails because one pair did.

use crate::types::Axis;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathingError {
    /// A volume with `max < min` on some axis. Rejected, never clamped.
    #[error("invalid obstacle geometry: {axis} max {max} is below min {min}")]
    InvalidObstacleGeometry { axis: Axis, min: i32, max: i32 },

    /// An occupancy mask longer than the box it describes.
    #[error("occupancy mask has {len} cells but the volume holds only {capacity}")]
    MaskTooLarge { len: usize, capacity: u64 },

    /// A cell set whose bounding box is too large to mask cell by cell.
    #[error("volume spans {cells} cells, more than the {limit} a mask may cover")]
    VolumeTooLarge { cells: u64, limit: u64 },

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The search worker pool could not be started.
    #[error("failed to start search pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, PathingError>;
