use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::detect::{DetectionFilter, ObjectClass};
use crate::error::ConfigError;
use crate::occupancy::{OccupancyEngine, ZoneSpec};

const DEFAULT_ZONES_PATH: &str = "config/parking_zones.json";
const DEFAULT_SMOOTHING_FRAMES: usize = 5;
const DEFAULT_API_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_SOURCE_URI: &str = "stub://lot";
const DEFAULT_TARGET_FPS: u32 = 10;
const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

#[derive(Debug, Deserialize, Default)]
struct ParkingdConfigFile {
    zones_path: Option<PathBuf>,
    parking_spaces: Option<Vec<ZoneSpec>>,
    smoothing_frames: Option<usize>,
    api: Option<ApiConfigFile>,
    source: Option<SourceConfigFile>,
    detection: Option<DetectionConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiConfigFile {
    addr: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    uri: Option<String>,
    target_fps: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectionConfigFile {
    min_confidence: Option<f32>,
    classes: Option<Vec<ObjectClass>>,
}

/// On-disk zone file: `{"parking_spaces": [{"id": "A1", "polygon": [[x, y], ...]}]}`.
#[derive(Debug, Deserialize)]
struct ZoneFile {
    #[serde(default)]
    parking_spaces: Vec<ZoneSpec>,
}

#[derive(Debug, Clone)]
pub struct ParkingdConfig {
    pub zones: ZoneSource,
    pub smoothing_frames: usize,
    pub api_addr: String,
    pub source: SourceSettings,
    pub detection: DetectionFilter,
}

/// Where zone definitions come from. Inline zones win over a zone file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneSource {
    Inline(Vec<ZoneSpec>),
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub uri: String,
    pub target_fps: u32,
}

impl ParkingdConfig {
    /// Load from the file named by `PARKING_CONFIG` (if set), then apply env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("PARKING_CONFIG").ok().map(PathBuf::from);
        Self::load_from(config_path.as_deref())
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ParkingdConfigFile) -> Self {
        let zones = match (file.parking_spaces, file.zones_path) {
            (Some(inline), _) => ZoneSource::Inline(inline),
            (None, Some(path)) => ZoneSource::File(path),
            (None, None) => ZoneSource::File(PathBuf::from(DEFAULT_ZONES_PATH)),
        };
        let api_addr = file
            .api
            .and_then(|api| api.addr)
            .unwrap_or_else(|| DEFAULT_API_ADDR.to_string());
        let source = SourceSettings {
            uri: file
                .source
                .as_ref()
                .and_then(|source| source.uri.clone())
                .unwrap_or_else(|| DEFAULT_SOURCE_URI.to_string()),
            target_fps: file
                .source
                .as_ref()
                .and_then(|source| source.target_fps)
                .unwrap_or(DEFAULT_TARGET_FPS),
        };
        let detection = DetectionFilter::new(
            file.detection
                .as_ref()
                .and_then(|detection| detection.min_confidence)
                .unwrap_or(DEFAULT_MIN_CONFIDENCE),
            file.detection
                .and_then(|detection| detection.classes)
                .unwrap_or_else(|| ObjectClass::VEHICLES.to_vec()),
        );
        Self {
            zones,
            smoothing_frames: file.smoothing_frames.unwrap_or(DEFAULT_SMOOTHING_FRAMES),
            api_addr,
            source,
            detection,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(addr) = std::env::var("PARKING_API_ADDR") {
            if !addr.trim().is_empty() {
                self.api_addr = addr;
            }
        }
        if let Ok(uri) = std::env::var("PARKING_SOURCE") {
            if !uri.trim().is_empty() {
                self.source.uri = uri;
            }
        }
        if let Ok(path) = std::env::var("PARKING_ZONES_PATH") {
            if !path.trim().is_empty() {
                match self.zones {
                    ZoneSource::File(_) => self.zones = ZoneSource::File(PathBuf::from(path)),
                    ZoneSource::Inline(_) => log::warn!(
                        "PARKING_ZONES_PATH={} ignored: inline parking_spaces take precedence",
                        path
                    ),
                }
            }
        }
        if let Ok(frames) = std::env::var("PARKING_SMOOTHING_FRAMES") {
            self.smoothing_frames = frames
                .trim()
                .parse()
                .map_err(|_| anyhow!("PARKING_SMOOTHING_FRAMES must be a positive integer"))?;
        }
        if let Ok(conf) = std::env::var("PARKING_MIN_CONFIDENCE") {
            self.detection.min_confidence = conf
                .trim()
                .parse()
                .map_err(|_| anyhow!("PARKING_MIN_CONFIDENCE must be a number in 0..=1"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.smoothing_frames == 0 {
            return Err(ConfigError::InvalidSmoothingFrames(self.smoothing_frames).into());
        }
        if self.source.target_fps == 0 {
            return Err(anyhow!("source.target_fps must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.detection.min_confidence) {
            return Err(anyhow!("detection.min_confidence must be within 0..=1"));
        }
        if self.detection.classes.is_empty() {
            return Err(anyhow!("detection.classes must not be empty"));
        }
        Ok(())
    }

    /// Resolve zone definitions from inline config or the zone file.
    pub fn zone_specs(&self) -> Result<Vec<ZoneSpec>, ConfigError> {
        match &self.zones {
            ZoneSource::Inline(specs) => Ok(specs.clone()),
            ZoneSource::File(path) => load_zone_file(path),
        }
    }

    /// Build the engine for a monitoring session.
    ///
    /// Unlike the engine itself, the daemon refuses to run with no valid zones.
    pub fn build_engine(&self) -> Result<OccupancyEngine, ConfigError> {
        let engine = OccupancyEngine::new(self.zone_specs()?, self.smoothing_frames)?;
        if engine.zone_count() == 0 {
            return Err(ConfigError::NoValidZones);
        }
        Ok(engine)
    }
}

/// Read zone definitions, preserving file order.
pub fn load_zone_file(path: &Path) -> Result<Vec<ZoneSpec>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file: ZoneFile = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    if file.parking_spaces.is_empty() {
        log::error!("zone file {} has no parking_spaces defined", path.display());
    } else {
        log::info!(
            "loaded {} parking space definitions from {}",
            file.parking_spaces.len(),
            path.display()
        );
    }
    Ok(file.parking_spaces)
}

fn read_config_file(path: &Path) -> Result<ParkingdConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
