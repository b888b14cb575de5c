//! Detection sources for the producer loop.
//!
//! Video decoding and model inference happen outside this crate. A source
//! hands the daemon one frame's worth of detections at a time:
//! - `stub://<name>`: deterministic synthetic lot (testing, demos)
//! - local path: JSON-lines replay of recorded detector output
//!
//! Remote URL schemes are rejected; network ingestion is out of scope.

pub mod replay;
pub mod stub;

use anyhow::{anyhow, Result};

use crate::detect::Detection;

pub use replay::ReplaySource;
pub use stub::StubSource;

/// Producer of per-frame detections.
pub trait DetectionSource: Send {
    fn name(&self) -> &str;

    /// Open the underlying input. Called once before the first frame.
    fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    /// Detections for the next frame, or `None` once the stream has ended.
    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>>;

    fn stats(&self) -> SourceStats;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub frames_read: u64,
    pub frames_skipped: u64,
    pub detections_read: u64,
}

/// Pick a source implementation from a URI.
pub fn open_source(uri: &str) -> Result<Box<dyn DetectionSource>> {
    if let Some(name) = uri.strip_prefix("stub://") {
        return Ok(Box::new(StubSource::new(name)));
    }
    if !is_local_file_path(uri) {
        return Err(anyhow!(
            "detection source '{}' must be stub://<name> or a local file path",
            uri
        ));
    }
    Ok(Box::new(ReplaySource::new(uri)))
}

fn is_local_file_path(path: &str) -> bool {
    !path.trim().is_empty() && !path.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_source_by_uri() {
        assert_eq!(open_source("stub://lot").unwrap().name(), "stub://lot");
        assert!(open_source("recordings/day1.jsonl").is_ok());
        assert!(open_source("rtsp://camera-1/stream").is_err());
        assert!(open_source("  ").is_err());
    }
}
