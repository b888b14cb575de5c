use super::result::{Detection, ObjectClass};

/// Upstream gate between the detector and the occupancy engine.
///
/// Keeps detections of an allowed class at or above a confidence threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionFilter {
    pub min_confidence: f32,
    pub classes: Vec<ObjectClass>,
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            classes: ObjectClass::VEHICLES.to_vec(),
        }
    }
}

impl DetectionFilter {
    pub fn new(min_confidence: f32, classes: Vec<ObjectClass>) -> Self {
        Self {
            min_confidence,
            classes,
        }
    }

    pub fn accepts(&self, detection: &Detection) -> bool {
        detection.confidence >= self.min_confidence && self.classes.contains(&detection.class)
    }

    pub fn apply(&self, detections: Vec<Detection>) -> Vec<Detection> {
        detections.into_iter().filter(|d| self.accepts(d)).collect()
    }
}
