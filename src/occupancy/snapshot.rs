use serde::{Deserialize, Serialize};
use std::fmt;

use super::zone::{OccupancyState, Zone};

/// Per-space entry of a [`StatusSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceStatus {
    pub id: String,
    pub state: OccupancyState,
}

/// Immutable aggregate of every zone's stable state at one instant.
///
/// Serializes to `{"total", "occupied", "free", "spaces": [{"id", "state"}]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub total: usize,
    pub occupied: usize,
    pub free: usize,
    pub spaces: Vec<SpaceStatus>,
}

impl StatusSnapshot {
    pub(crate) fn from_zones(zones: &[Zone]) -> Self {
        let spaces: Vec<SpaceStatus> = zones
            .iter()
            .map(|zone| SpaceStatus {
                id: zone.id().to_string(),
                state: zone.state(),
            })
            .collect();
        let occupied = spaces
            .iter()
            .filter(|space| space.state == OccupancyState::Occupied)
            .count();
        let total = spaces.len();
        Self {
            total,
            occupied,
            free: total - occupied,
            spaces,
        }
    }

    pub fn state_of(&self, id: &str) -> Option<OccupancyState> {
        self.spaces
            .iter()
            .find(|space| space.id == id)
            .map(|space| space.state)
    }
}

/// Status bar text, e.g. `OCCUPIED: 3 | FREE: 9 | TOTAL: 12`.
impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OCCUPIED: {} | FREE: {} | TOTAL: {}",
            self.occupied, self.free, self.total
        )
    }
}
