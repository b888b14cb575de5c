//! Synthetic detection source (`stub://`).
//!
//! Emulates a single vehicle that parks in one box for 60 of every 100
//! frames. While parked, every 17th frame drops the vehicle to mimic a missed
//! detection, and every 10th frame adds a low-value non-vehicle detection.
//! The stream never ends.

use anyhow::Result;

use super::{DetectionSource, SourceStats};
use crate::detect::{BoundingBox, Detection, ObjectClass};

const CYCLE_FRAMES: u64 = 100;
const PARKED_FRAMES: u64 = 60;
const DROPOUT_EVERY: u64 = 17;
const DISTRACTOR_EVERY: u64 = 10;
const DEFAULT_BOX: BoundingBox = BoundingBox::new(40, 40, 80, 80);

pub struct StubSource {
    uri: String,
    parked_box: BoundingBox,
    stats: SourceStats,
}

impl StubSource {
    pub fn new(name: &str) -> Self {
        Self {
            uri: format!("stub://{name}"),
            parked_box: DEFAULT_BOX,
            stats: SourceStats::default(),
        }
    }

    pub fn with_box(mut self, parked_box: BoundingBox) -> Self {
        self.parked_box = parked_box;
        self
    }

    fn detections_for(&self, frame: u64) -> Vec<Detection> {
        let phase = frame % CYCLE_FRAMES;
        let mut detections = Vec::new();
        if phase < PARKED_FRAMES && (frame + 1) % DROPOUT_EVERY != 0 {
            detections.push(Detection::new(self.parked_box, ObjectClass::Car, 0.87));
        }
        if frame % DISTRACTOR_EVERY == 0 {
            detections.push(Detection::new(
                BoundingBox::new(0, 0, 12, 30),
                ObjectClass::Other,
                0.66,
            ));
        }
        detections
    }
}

impl DetectionSource for StubSource {
    fn name(&self) -> &str {
        &self.uri
    }

    fn connect(&mut self) -> Result<()> {
        log::info!("StubSource: connected to {} (synthetic)", self.uri);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>> {
        let detections = self.detections_for(self.stats.frames_read);
        self.stats.frames_read += 1;
        self.stats.detections_read += detections.len() as u64;
        Ok(Some(detections))
    }

    fn stats(&self) -> SourceStats {
        self.stats.clone()
    }
}
