use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::detect::Detection;
use crate::error::ConfigError;

use super::snapshot::StatusSnapshot;
use super::zone::{validate_zone_id, OccupancyState, Zone, ZoneSpec};

/// Shared occupancy state for every configured zone.
///
/// One producer calls [`process_frame`](Self::process_frame) per video frame
/// while any number of readers call [`snapshot`](Self::snapshot). A single
/// mutex covers the whole zone set, so a reader never sees a zone mid-update.
/// Share it behind an `Arc`.
#[derive(Debug)]
pub struct OccupancyEngine {
    inner: Mutex<EngineState>,
    smoothing_frames: usize,
    rejected: Vec<ConfigError>,
}

#[derive(Debug)]
struct EngineState {
    zones: Vec<Zone>,
    frames_processed: u64,
}

impl OccupancyEngine {
    /// Build the engine from configured zones.
    ///
    /// A zero `smoothing_frames` fails construction. Individual zones with an
    /// empty id, a repeated id or fewer than three vertices are logged, left
    /// out of the active set and kept in [`rejected_zones`](Self::rejected_zones).
    /// An empty active set is accepted here; callers decide if that is fatal.
    pub fn new(
        specs: impl IntoIterator<Item = ZoneSpec>,
        smoothing_frames: usize,
    ) -> Result<Self, ConfigError> {
        if smoothing_frames == 0 {
            return Err(ConfigError::InvalidSmoothingFrames(smoothing_frames));
        }

        let mut zones = Vec::new();
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();
        for spec in specs {
            match accept_zone(spec, smoothing_frames, &seen) {
                Ok(zone) => {
                    seen.insert(zone.id().to_string());
                    zones.push(zone);
                }
                Err(err) => {
                    log::warn!("skipping parking space: {}", err);
                    rejected.push(err);
                }
            }
        }

        log::info!(
            "occupancy engine ready: {} spaces, smoothing over {} frames",
            zones.len(),
            smoothing_frames
        );

        Ok(Self {
            inner: Mutex::new(EngineState {
                zones,
                frames_processed: 0,
            }),
            smoothing_frames,
            rejected,
        })
    }

    /// Update every zone from one frame's detections.
    ///
    /// A zone is raw-occupied when any detection center lies inside or on
    /// its outline. Zones are updated independently; an empty detection set
    /// counts as a free observation for all of them.
    pub fn process_frame(&self, detections: &[Detection]) {
        let mut state = self.lock();
        state.frames_processed += 1;
        let frame = state.frames_processed;
        for zone in state.zones.iter_mut() {
            let raw = zone.is_hit_by(detections);
            if let Some(transition) = zone.observe(raw) {
                log::info!(
                    "space {} {} -> {} (frame {})",
                    zone.id(),
                    transition.from,
                    transition.to,
                    frame
                );
            }
        }
        log::trace!(
            "frame {} processed with {} detections",
            frame,
            detections.len()
        );
    }

    /// Copy of the current stable states. Mutates nothing.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::from_zones(&self.lock().zones)
    }

    pub fn zone_state(&self, id: &str) -> Option<OccupancyState> {
        self.lock()
            .zones
            .iter()
            .find(|zone| zone.id() == id)
            .map(Zone::state)
    }

    pub fn zone_count(&self) -> usize {
        self.lock().zones.len()
    }

    pub fn frames_processed(&self) -> u64 {
        self.lock().frames_processed
    }

    pub fn smoothing_frames(&self) -> usize {
        self.smoothing_frames
    }

    pub fn rejected_zones(&self) -> &[ConfigError] {
        &self.rejected
    }

    // Zone updates cannot panic halfway, so a poisoned lock still guards
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn accept_zone(
    spec: ZoneSpec,
    smoothing_frames: usize,
    seen: &HashSet<String>,
) -> Result<Zone, ConfigError> {
    validate_zone_id(&spec.id)?;
    if seen.contains(&spec.id) {
        return Err(ConfigError::DuplicateZoneId(spec.id));
    }
    Zone::from_spec(spec, smoothing_frames)
}
