//! JSON-lines replay of recorded detector output.
//!
//! Each line is one frame: a JSON array of detections, e.g.
//! `[{"box":[10,20,60,80],"class":"car","confidence":0.91}]`.
//! A blank line is a frame with no detections. A line that fails to parse is
//! logged, counted as skipped and replayed as an empty frame so frame
//! numbering stays aligned with the recording.

use anyhow::{anyhow, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};

use super::{DetectionSource, SourceStats};
use crate::detect::Detection;

pub struct ReplaySource {
    path: String,
    lines: Option<Lines<BufReader<File>>>,
    stats: SourceStats,
}

impl ReplaySource {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            lines: None,
            stats: SourceStats::default(),
        }
    }
}

impl DetectionSource for ReplaySource {
    fn name(&self) -> &str {
        &self.path
    }

    fn connect(&mut self) -> Result<()> {
        let file = File::open(&self.path)
            .map_err(|e| anyhow!("failed to open replay file {}: {}", self.path, e))?;
        self.lines = Some(BufReader::new(file).lines());
        log::info!("ReplaySource: opened {}", self.path);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>> {
        let lines = self
            .lines
            .as_mut()
            .ok_or_else(|| anyhow!("replay source {} not connected", self.path))?;
        let Some(line) = lines.next() else {
            return Ok(None);
        };
        let line = line.map_err(|e| anyhow!("failed to read {}: {}", self.path, e))?;
        self.stats.frames_read += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Some(Vec::new()));
        }
        match serde_json::from_str::<Vec<Detection>>(trimmed) {
            Ok(detections) => {
                self.stats.detections_read += detections.len() as u64;
                Ok(Some(detections))
            }
            Err(err) => {
                log::warn!(
                    "{}: frame {} is not a detection list, treating as empty: {}",
                    self.path,
                    self.stats.frames_read,
                    err
                );
                self.stats.frames_skipped += 1;
                Ok(Some(Vec::new()))
            }
        }
    }

    fn stats(&self) -> SourceStats {
        self.stats.clone()
    }
}
