//! SmartParking occupancy engine
//!
//! Turns per-frame vehicle detections into a debounced occupied/free state
//! for each configured parking space, and serves an aggregate status view.
//!
//! # Architecture
//!
//! 1. **Containment**: a detection counts for a space when its box center lies
//!    inside or on the space's polygon.
//! 2. **Debounce**: a space changes state only after `smoothing_frames`
//!    consecutive frames agree on the new state.
//! 3. **Sharing**: one producer updates the engine per frame while readers take
//!    snapshots concurrently; the engine serializes both behind one lock.
//!
//! # Module Structure
//!
//! - `geometry`: integer points and polygons, boundary-inclusive containment
//! - `detect`: detection values and the upstream class/confidence filter
//! - `occupancy`: zones, smoothing windows, the engine and status snapshots
//! - `ingest`: detection sources for the daemon loop (synthetic, replay)
//! - `config`: daemon configuration and zone file loading
//! - `api`: HTTP status endpoint

pub mod api;
pub mod config;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod ingest;
pub mod occupancy;

pub use detect::{BoundingBox, Detection, DetectionFilter, ObjectClass};
pub use error::ConfigError;
pub use geometry::{Point, Polygon};
pub use ingest::{open_source, DetectionSource, ReplaySource, SourceStats, StubSource};
pub use occupancy::{
    OccupancyEngine, OccupancyState, SmoothingWindow, SpaceStatus, StatusSnapshot, Zone, ZoneSpec,
};
