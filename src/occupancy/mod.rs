//! Occupancy state engine.
//!
//! - `window`: per-zone FIFO of raw observations and the unanimity rule
//! - `zone`: zone outline, stable state and config-time validation
//! - `engine`: shared, lock-guarded zone set updated once per frame
//! - `snapshot`: immutable status view served to readers

mod engine;
mod snapshot;
mod window;
mod zone;

pub use engine::OccupancyEngine;
pub use snapshot::{SpaceStatus, StatusSnapshot};
pub use window::SmoothingWindow;
pub use zone::{validate_zone_id, OccupancyState, Transition, Zone, ZoneSpec};
