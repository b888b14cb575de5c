use serde::{Deserialize, Serialize};
use std::fmt;

use crate::detect::Detection;
use crate::error::ConfigError;
use crate::geometry::{Point, Polygon};

use super::window::SmoothingWindow;

/// Debounced occupancy of one parking space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyState {
    #[default]
    Free,
    Occupied,
}

impl OccupancyState {
    pub fn as_str(self) -> &'static str {
        match self {
            OccupancyState::Free => "free",
            OccupancyState::Occupied => "occupied",
        }
    }
}

impl From<bool> for OccupancyState {
    fn from(occupied: bool) -> Self {
        if occupied {
            OccupancyState::Occupied
        } else {
            OccupancyState::Free
        }
    }
}

impl fmt::Display for OccupancyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated zone definition as read from configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub id: String,
    pub polygon: Vec<Point>,
}

impl ZoneSpec {
    pub fn new(id: impl Into<String>, polygon: impl IntoIterator<Item = (i32, i32)>) -> Self {
        Self {
            id: id.into(),
            polygon: polygon.into_iter().map(Point::from).collect(),
        }
    }
}

/// Zone ids are free-form labels ("A1", "Spot 1", "Plads-Å2"); only the
/// empty string is refused.
pub fn validate_zone_id(id: &str) -> Result<(), ConfigError> {
    if id.is_empty() {
        return Err(ConfigError::EmptyZoneId);
    }
    Ok(())
}

/// A stable-state change produced by one observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: OccupancyState,
    pub to: OccupancyState,
}

/// One parking space: fixed outline plus debounced state.
#[derive(Clone, Debug)]
pub struct Zone {
    id: String,
    polygon: Polygon,
    state: OccupancyState,
    window: SmoothingWindow,
}

impl Zone {
    /// Validates the window length and polygon; id rules are checked by the engine.
    pub fn from_spec(spec: ZoneSpec, smoothing_frames: usize) -> Result<Self, ConfigError> {
        if smoothing_frames == 0 {
            return Err(ConfigError::InvalidSmoothingFrames(smoothing_frames));
        }
        let vertices = spec.polygon.len();
        let polygon =
            Polygon::new(spec.polygon).ok_or_else(|| ConfigError::TooFewVertices {
                id: spec.id.clone(),
                vertices,
            })?;
        Ok(Self {
            id: spec.id,
            polygon,
            state: OccupancyState::Free,
            window: SmoothingWindow::new(smoothing_frames),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn state(&self) -> OccupancyState {
        self.state
    }

    pub fn window(&self) -> &SmoothingWindow {
        &self.window
    }

    /// Raw occupancy for this frame: any detection center inside the outline.
    pub fn is_hit_by(&self, detections: &[Detection]) -> bool {
        detections
            .iter()
            .any(|det| self.polygon.contains(det.center()))
    }

    /// Feed one raw observation and apply the unanimity rule.
    ///
    /// The stable state only moves when the full window agrees; warm-up and
    /// mixed windows leave it untouched.
    pub fn observe(&mut self, raw: bool) -> Option<Transition> {
        self.window.push(raw);
        let next = OccupancyState::from(self.window.unanimous()?);
        if next == self.state {
            return None;
        }
        let transition = Transition {
            from: self.state,
            to: next,
        };
        self.state = next;
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(n: usize) -> Zone {
        Zone::from_spec(
            ZoneSpec::new("A1", [(0, 0), (10, 0), (10, 10), (0, 10)]),
            n,
        )
        .expect("zone")
    }

    fn feed(zone: &mut Zone, raws: &[bool]) {
        for raw in raws {
            zone.observe(*raw);
        }
    }

    #[test]
    fn rejects_short_polygon() {
        let err = Zone::from_spec(ZoneSpec::new("A1", [(0, 0), (1, 1)]), 3).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TooFewVertices { ref id, vertices: 2 } if id == "A1"
        ));
    }

    #[test]
    fn starts_free() {
        assert_eq!(zone(3).state(), OccupancyState::Free);
    }

    #[test]
    fn unanimous_window_flips_state() {
        let mut z = zone(3);
        assert_eq!(z.observe(true), None);
        assert_eq!(z.observe(true), None);
        assert_eq!(
            z.observe(true),
            Some(Transition {
                from: OccupancyState::Free,
                to: OccupancyState::Occupied,
            })
        );
        assert_eq!(z.observe(true), None);
    }

    #[test]
    fn single_dissent_blocks_release() {
        let mut z = zone(3);
        feed(&mut z, &[true, true, true]);
        feed(&mut z, &[false, false, true]);
        assert_eq!(z.state(), OccupancyState::Occupied);
        feed(&mut z, &[false, false]);
        assert_eq!(z.state(), OccupancyState::Occupied);
        z.observe(false);
        assert_eq!(z.state(), OccupancyState::Free);
    }

    #[test]
    fn window_of_one_follows_raw_signal() {
        let mut z = zone(1);
        for raw in [true, false, false, true] {
            z.observe(raw);
            assert_eq!(z.state(), OccupancyState::from(raw));
        }
    }

    #[test]
    fn zero_window_is_a_config_error() {
        let err = Zone::from_spec(
            ZoneSpec::new("A1", [(0, 0), (10, 0), (10, 10)]),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSmoothingFrames(0)));
    }

    #[test]
    fn any_non_empty_zone_id_is_accepted() {
        for id in ["A1", "lot_b:12.east-3", "Spot 1", "Plads-Å2", "lot/b#3"] {
            assert!(validate_zone_id(id).is_ok(), "{id}");
        }
        assert!(validate_zone_id(&"x".repeat(200)).is_ok());
        assert!(matches!(validate_zone_id(""), Err(ConfigError::EmptyZoneId)));
    }

    #[test]
    fn state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OccupancyState::Occupied).unwrap(),
            r#""occupied""#
        );
        assert_eq!(OccupancyState::Free.to_string(), "free");
    }
}
