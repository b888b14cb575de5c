use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::NamedTempFile;

use smartparking::config::{load_zone_file, ParkingdConfig, ZoneSource};
use smartparking::{ConfigError, ObjectClass, OccupancyState, ZoneSpec};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "PARKING_CONFIG",
        "PARKING_API_ADDR",
        "PARKING_SOURCE",
        "PARKING_ZONES_PATH",
        "PARKING_SMOOTHING_FRAMES",
        "PARKING_MIN_CONFIDENCE",
    ] {
        std::env::remove_var(key);
    }
}

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_temp(
        r#"{
            "zones_path": "lots/north.json",
            "smoothing_frames": 8,
            "api": { "addr": "0.0.0.0:9000" },
            "source": { "uri": "recordings/north.jsonl", "target_fps": 25 },
            "detection": { "min_confidence": 0.4, "classes": ["car", "truck"] }
        }"#,
    );

    std::env::set_var("PARKING_CONFIG", file.path());
    std::env::set_var("PARKING_SMOOTHING_FRAMES", "3");
    std::env::set_var("PARKING_SOURCE", "stub://north");

    let cfg = ParkingdConfig::load().expect("load config");

    assert_eq!(cfg.zones, ZoneSource::File(PathBuf::from("lots/north.json")));
    assert_eq!(cfg.smoothing_frames, 3);
    assert_eq!(cfg.api_addr, "0.0.0.0:9000");
    assert_eq!(cfg.source.uri, "stub://north");
    assert_eq!(cfg.source.target_fps, 25);
    assert!((cfg.detection.min_confidence - 0.4).abs() < f32::EPSILON);
    assert_eq!(
        cfg.detection.classes,
        vec![ObjectClass::Car, ObjectClass::Truck]
    );

    clear_env();
}

#[test]
fn zero_smoothing_frames_fails_startup() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("PARKING_SMOOTHING_FRAMES", "0");
    assert!(ParkingdConfig::load().is_err());

    std::env::set_var("PARKING_SMOOTHING_FRAMES", "many");
    assert!(ParkingdConfig::load().is_err());

    clear_env();
}

#[test]
fn zone_file_preserves_order_and_builds_engine() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let zones = write_temp(
        r#"{
            "parking_spaces": [
                {"id": "Z9", "polygon": [[0,0],[4,0],[4,4],[0,4]]},
                {"id": "A1", "polygon": [[10,10],[14,10],[14,14],[10,14]]},
                {"id": "broken", "polygon": [[0,0],[1,1]]}
            ]
        }"#,
    );

    let specs = load_zone_file(zones.path()).expect("zone file");
    assert_eq!(specs.len(), 3);
    assert_eq!(specs[0], ZoneSpec::new("Z9", [(0, 0), (4, 0), (4, 4), (0, 4)]));

    std::env::set_var("PARKING_ZONES_PATH", zones.path());
    let cfg = ParkingdConfig::load().expect("load config");
    let engine = cfg.build_engine().expect("engine");
    assert_eq!(engine.zone_count(), 2);
    assert_eq!(engine.rejected_zones().len(), 1);

    let snap = engine.snapshot();
    let ids: Vec<&str> = snap.spaces.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["Z9", "A1"]);
    assert!(snap
        .spaces
        .iter()
        .all(|s| s.state == OccupancyState::Free));

    clear_env();
}

#[test]
fn zones_path_env_does_not_replace_inline_zones() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_temp(
        r#"{
            "parking_spaces": [
                {"id": "Spot 1", "polygon": [[0,0],[4,0],[4,4],[0,4]]}
            ]
        }"#,
    );
    std::env::set_var("PARKING_ZONES_PATH", "lots/other.json");

    let cfg = ParkingdConfig::load_from(Some(file.path())).expect("load config");
    assert_eq!(
        cfg.zones,
        ZoneSource::Inline(vec![ZoneSpec::new(
            "Spot 1",
            [(0, 0), (4, 0), (4, 4), (0, 4)]
        )])
    );
    let engine = cfg.build_engine().expect("engine");
    assert_eq!(engine.zone_state("Spot 1"), Some(OccupancyState::Free));

    let file = write_temp(r#"{ "zones_path": "lots/north.json" }"#);
    let cfg = ParkingdConfig::load_from(Some(file.path())).expect("load config");
    assert_eq!(cfg.zones, ZoneSource::File(PathBuf::from("lots/other.json")));

    clear_env();
}

#[test]
fn malformed_or_empty_zone_file_is_fatal() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let garbage = write_temp("parking_spaces: [");
    assert!(matches!(
        load_zone_file(garbage.path()),
        Err(ConfigError::Parse { .. })
    ));

    let empty = write_temp(r#"{"parking_spaces": []}"#);
    std::env::set_var("PARKING_ZONES_PATH", empty.path());
    let cfg = ParkingdConfig::load().expect("load config");
    assert!(matches!(cfg.build_engine(), Err(ConfigError::NoValidZones)));

    clear_env();
}
