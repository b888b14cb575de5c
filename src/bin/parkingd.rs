//! parkingd - parking lot occupancy daemon
//!
//! This daemon:
//! 1. Loads zone definitions and builds the occupancy engine
//! 2. Serves the status API on a background thread
//! 3. Pulls per-frame detections from the configured source
//! 4. Filters them to vehicle classes and feeds the engine once per frame

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use smartparking::{
    api::{ApiConfig, ApiServer},
    config::ParkingdConfig,
    open_source,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON configuration file.
    #[arg(long, env = "PARKING_CONFIG")]
    config: Option<PathBuf>,
    /// Detection source: stub://<name> or a JSON-lines replay file.
    #[arg(long)]
    source: Option<String>,
    /// Status API listen address.
    #[arg(long)]
    api_addr: Option<String>,
    /// Consecutive agreeing frames required for a state change.
    #[arg(long)]
    smoothing_frames: Option<usize>,
    /// Stop after this many frames (runs until the source ends by default).
    #[arg(long)]
    max_frames: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    log::info!("--- parkingd starting ---");

    let mut cfg = ParkingdConfig::load_from(args.config.as_deref())?;
    if let Some(source) = args.source {
        cfg.source.uri = source;
    }
    if let Some(addr) = args.api_addr {
        cfg.api_addr = addr;
    }
    if let Some(frames) = args.smoothing_frames {
        cfg.smoothing_frames = frames;
    }
    cfg.validate()?;

    let engine = Arc::new(
        cfg.build_engine()
            .map_err(|e| anyhow!("refusing to start: {}", e))?,
    );

    let api_handle = ApiServer::new(
        ApiConfig {
            addr: cfg.api_addr.clone(),
        },
        engine.clone(),
    )
    .spawn()?;
    log::info!("status api listening on http://{}/status", api_handle.addr);

    let mut source = open_source(&cfg.source.uri)?;
    source.connect()?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_handler = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_handler.store(true, Ordering::SeqCst);
    })
    .map_err(|e| anyhow!("error setting Ctrl-C handler: {}", e))?;

    let frame_interval = Duration::from_secs_f64(1.0 / cfg.source.target_fps as f64);
    let mut last_health_log = Instant::now();

    log::info!(
        "parkingd running: source={} fps={} spaces={} smoothing_frames={}",
        source.name(),
        cfg.source.target_fps,
        engine.zone_count(),
        engine.smoothing_frames()
    );

    while !shutdown.load(Ordering::SeqCst) {
        if args
            .max_frames
            .is_some_and(|max| engine.frames_processed() >= max)
        {
            log::info!("frame limit reached");
            break;
        }
        let started = Instant::now();

        let detections = match source.next_frame() {
            Ok(Some(detections)) => detections,
            Ok(None) => {
                log::info!("end of stream from {}", source.name());
                break;
            }
            Err(e) => {
                log::error!("detection source error: {}", e);
                break;
            }
        };

        let vehicles = cfg.detection.apply(detections);
        log::debug!("frame: {} vehicle detections", vehicles.len());
        engine.process_frame(&vehicles);

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            let stats = source.stats();
            log::info!(
                "{} | frames={} skipped={} source={}",
                engine.snapshot(),
                stats.frames_read,
                stats.frames_skipped,
                source.name()
            );
            last_health_log = Instant::now();
        }

        if let Some(remaining) = frame_interval.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    log::info!("final status: {}", engine.snapshot());
    log::info!("stopping status api...");
    api_handle.stop()?;
    log::info!("--- parkingd shut down ---");
    Ok(())
}
