//! Configuration errors raised while building the occupancy engine.
//!
//! These are the only failures the engine can report. Once constructed,
//! frame processing and snapshots cannot fail.

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("smoothing_frames must be >= 1 (got {0})")]
    InvalidSmoothingFrames(usize),

    #[error("zone '{id}' has {vertices} polygon vertices; at least 3 are required")]
    TooFewVertices { id: String, vertices: usize },

    #[error("zone id must not be empty")]
    EmptyZoneId,

    #[error("zone id '{0}' is defined more than once")]
    DuplicateZoneId(String),

    #[error("no valid parking zones configured")]
    NoValidZones,

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid zone file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
