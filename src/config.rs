//! Bot configuration.
//!
//! Secrets come from the environment and are required. Everything else is
//! read from an optional TOML file (default `homework_bot.toml`, override with
//! `--config`); a missing file means defaults.
//!
//! ```toml
//! # Delay between polls, in seconds (default: 600).
//! poll_interval_secs = 600
//!
//! endpoint = "https://practicum.yandex.ru/api/user_api/homework_statuses/"
//! telegram_api_base = "https://api.telegram.org"
//!
//! log_file = "homework_bot.log"
//! log_level = "debug"
//!
//! # Also send iteration failures to the chat (default: false).
//! report_errors = false
//!
//! request_timeout_secs = 30
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// The three secrets the bot cannot run without.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    /// Numeric chat id or `@channel` username; passed to Telegram as-is.
    pub telegram_chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`. Unset and blank values both count
    /// as missing, and every missing name is reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let practicum_token = read(PRACTICUM_TOKEN);
        let telegram_token = read(TELEGRAM_TOKEN);
        let telegram_chat_id = read(TELEGRAM_CHAT_ID);

        match (practicum_token, telegram_token, telegram_chat_id) {
            (Some(practicum_token), Some(telegram_token), Some(telegram_chat_id)) => Ok(Self {
                practicum_token,
                telegram_token,
                telegram_chat_id,
            }),
            (p, t, c) => {
                let missing = [
                    (PRACTICUM_TOKEN, p.is_none()),
                    (TELEGRAM_TOKEN, t.is_none()),
                    (TELEGRAM_CHAT_ID, c.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(ConfigError::MissingVariables(missing))
            }
        }
    }
}

/// Non-secret settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Fixed delay between iterations, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Homework status endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Telegram Bot API base URL, without the `/bot<token>` part.
    #[serde(default = "default_telegram_api_base")]
    pub telegram_api_base: String,

    /// Append-only log file, mirrored to stdout.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Log level spec (`RUST_LOG` takes precedence).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Forward iteration failures to the chat as well as the log.
    #[serde(default)]
    pub report_errors: bool,

    /// Timeout for each HTTP request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_poll_interval() -> u64 {
    600
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".into()
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".into()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("homework_bot.log")
}

fn default_log_level() -> String {
    "debug".into()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            endpoint: default_endpoint(),
            telegram_api_base: default_telegram_api_base(),
            log_file: default_log_file(),
            log_level: default_log_level(),
            report_errors: false,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl BotConfig {
    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        config.validate().map_err(|message| ConfigError::Invalid {
            path: path.display().to_string(),
            message,
        })?;
        Ok(config)
    }

    /// Reject values that would turn the fixed delay into a busy loop or
    /// make every request time out at once.
    fn validate(&self) -> Result<(), String> {
        if self.poll_interval_secs == 0 {
            return Err("poll_interval_secs must be greater than 0".into());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".into());
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
