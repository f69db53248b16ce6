use lyrixa_core::{LyrixaConfig, MessageType};
use lyrixa_host::config::{ConfigError, HostConfig, LogFormat};
use lyrixa_host::driver::{Driver, StopReason};
use lyrixa_host::events::{parse_input, HostEvent, InputAction};
use lyrixa_test_utils::fixtures::{default_config, scripted_service};
use lyrixa_test_utils::ScriptedRandom;
use proptest::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../config/lyrixa.toml")
}

fn fast_config() -> LyrixaConfig {
    LyrixaConfig {
        tick_interval_ms: 1,
        seed: Some(7),
        ..default_config()
    }
}

fn base_toml() -> String {
    std::fs::read_to_string(sample_path()).expect("read sample config")
}

#[test]
fn sample_config_matches_stock_team() {
    let config = HostConfig::from_path(&sample_path()).expect("parse sample config");
    config.validate().expect("sample config is valid");
    assert_eq!(config.log_format, LogFormat::Pretty);
    assert_eq!(config.max_ticks, None);
    assert_eq!(config.lyrixa, LyrixaConfig::default_config());
}

#[test]
fn config_rejects_unknown_fields() {
    let toml = format!("verbose = true\n{}", base_toml());
    assert!(matches!(HostConfig::from_toml(&toml), Err(ConfigError::Parse(_))));
}

#[test]
fn config_requires_log_filter() {
    let mut config = HostConfig::from_toml(&base_toml()).unwrap();
    config.log_filter = "  ".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { field: "log_filter", .. })
    ));
}

#[test]
fn config_rejects_zero_tick_limit() {
    let mut config = HostConfig::from_toml(&base_toml()).unwrap();
    config.max_ticks = Some(0);
    assert!(config.validate().is_err());
}

#[test]
fn config_surfaces_core_validation() {
    let mut config = HostConfig::from_toml(&base_toml()).unwrap();
    config.lyrixa.workload_threshold = 1.5;
    assert!(matches!(config.validate(), Err(ConfigError::Lyrixa(_))));
}

#[test]
fn config_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(base_toml().replace("# max_ticks = 20", "max_ticks = 20").as_bytes())
        .unwrap();
    let config = HostConfig::from_path(file.path()).unwrap();
    assert_eq!(config.max_ticks, Some(20));
}

#[test]
fn config_missing_file_is_io_error() {
    let result = HostConfig::from_path(&PathBuf::from("/nonexistent/lyrixa.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn driver_routes_user_input() {
    let service = scripted_service(default_config(), ScriptedRandom::constant(0.0));
    let mut driver = Driver::with_service(service, None);

    assert!(!driver.handle_input("please help with memory management").unwrap());
    let pending = driver.service().bus().pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].recipient, "MemoryAgent");
    assert_eq!(pending[0].message_type, MessageType::Request);

    assert!(!driver.handle_input("/summary").unwrap());
    assert!(driver.handle_input("/quit").unwrap());
}

#[test]
fn driver_tick_processes_and_counts() {
    let service = scripted_service(default_config(), ScriptedRandom::constant(0.9));
    let mut driver = Driver::with_service(service, Some(2));
    driver.handle_input("goal planning").unwrap();

    let report = driver.tick();
    assert_eq!(report.processed, 1);
    assert!(!driver.finished());
    driver.tick();
    assert!(driver.finished());
    assert_eq!(driver.ticks(), 2);
}

#[test]
fn summaries_json_lists_every_agent() {
    let service = scripted_service(default_config(), ScriptedRandom::constant(0.5));
    let driver = Driver::with_service(service, None);
    let json: serde_json::Value = serde_json::from_str(&driver.summaries_json().unwrap()).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(5));
    assert_eq!(json[0]["agent"], "EscalationAgent");
}

#[tokio::test(flavor = "current_thread")]
async fn run_stops_at_tick_limit() {
    let service = lyrixa_agents::CollaborationService::new(fast_config()).unwrap();
    let mut driver = Driver::with_service(service, Some(3));
    let (tx, rx) = mpsc::channel(4);
    drop(tx);

    let reason = driver.run(rx).await.unwrap();
    assert_eq!(reason, StopReason::TickLimit);
    assert_eq!(driver.ticks(), 3);
}

#[tokio::test(flavor = "current_thread")]
async fn run_stops_on_quit() {
    let service = lyrixa_agents::CollaborationService::new(fast_config()).unwrap();
    let mut driver = Driver::with_service(service, None);
    let (tx, rx) = mpsc::channel(4);
    tx.send(HostEvent::Input("optimize the plan".to_string())).await.unwrap();
    tx.send(HostEvent::Input("/quit".to_string())).await.unwrap();

    let reason = driver.run(rx).await.unwrap();
    assert_eq!(reason, StopReason::Quit);
    assert!(driver.service().bus().len() >= 1);
}

#[tokio::test(flavor = "current_thread")]
async fn run_keeps_one_signal_listener_across_iterations() {
    let service = lyrixa_agents::CollaborationService::new(fast_config()).unwrap();
    let mut driver = Driver::with_service(service, None);
    let (tx, rx) = mpsc::channel(8);
    for line in ["goal planning", "memory management", "plugin management", "/quit"] {
        tx.send(HostEvent::Input(line.to_string())).await.unwrap();
    }

    let reason = driver.run(rx).await.unwrap();
    assert_eq!(reason, StopReason::Quit);
    assert_eq!(driver.service().bus().from_sender("User").count(), 3);
}

proptest! {
    #[test]
    fn parse_input_submits_trimmed_text(text in "[a-zA-Z][a-zA-Z ]{0,30}") {
        match parse_input(&format!("  {}  ", text)) {
            InputAction::Submit(s) => prop_assert_eq!(s, text.trim().to_string()),
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }
}
