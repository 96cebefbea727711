//! Integration tests for loading `BotConfig` from disk.

use homework_bot::config::BotConfig;
use homework_bot::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = BotConfig::load(&dir.path().join("nope.toml")).unwrap();

    assert_eq!(config.poll_interval(), Duration::from_secs(600));
    assert_eq!(config.log_file, PathBuf::from("homework_bot.log"));
    assert_eq!(config.telegram_api_base, "https://api.telegram.org");
}

#[test]
fn file_values_override_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bot.toml");
    std::fs::write(
        &path,
        r#"
poll_interval_secs = 60
endpoint = "http://localhost:8080/statuses/"
log_level = "info"
report_errors = true
"#,
    )
    .unwrap();

    let config = BotConfig::load(&path).unwrap();
    assert_eq!(config.poll_interval_secs, 60);
    assert_eq!(config.endpoint, "http://localhost:8080/statuses/");
    assert_eq!(config.log_level, "info");
    assert!(config.report_errors);
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
}

#[test]
fn malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bot.toml");
    std::fs::write(&path, "poll_interval_secs = \"ten\"").unwrap();

    match BotConfig::load(&path) {
        Err(ConfigError::Parse { path: p, .. }) => assert!(p.ends_with("bot.toml")),
        other => panic!("expected Parse error, got {other:?}"),
    }
}

#[test]
fn directory_instead_of_file_is_read_error() {
    let dir = TempDir::new().unwrap();

    assert!(matches!(
        BotConfig::load(dir.path()),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn zero_poll_interval_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bot.toml");
    std::fs::write(&path, "poll_interval_secs = 0").unwrap();

    match BotConfig::load(&path) {
        Err(ConfigError::Invalid { message, .. }) => {
            assert!(message.contains("poll_interval_secs"), "{message}");
        }
        other => panic!("expected Invalid error, got {other:?}"),
    }
}

#[test]
fn zero_request_timeout_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bot.toml");
    std::fs::write(&path, "request_timeout_secs = 0").unwrap();

    assert!(matches!(
        BotConfig::load(&path),
        Err(ConfigError::Invalid { .. })
    ));
}
