//! Error taxonomy for the poll-notify loop.
//!
//! Every stage of an iteration has its own error type so the loop can decide
//! whether a failure skips the whole iteration (`FetchError`, `ShapeError`),
//! one record (`StatusError`), or just one message (`DeliveryError`).
//! Only `ConfigError` is fatal, and only before the loop starts.

use thiserror::Error;

/// Startup configuration could not be assembled.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required environment variables are unset or empty.
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config file {path}: {message}")]
    Invalid { path: String, message: String },
}

/// The homework API could not be queried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The endpoint answered with something other than HTTP 200.
    #[error("homework API returned HTTP {status}")]
    Status { status: u16 },

    /// The request never produced a response.
    #[error("request to homework API failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// A 200 response whose body is not JSON.
    #[error("homework API returned an undecodable body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// The response body does not have the expected structure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("response has no `homeworks` key")]
    MissingHomeworks,

    #[error("`homeworks` is not a list")]
    HomeworksNotAList,

    #[error("homework #{0} is not a JSON object")]
    RecordNotAnObject(usize),

    #[error("`current_date` is not an integer")]
    CurrentDateNotAnInteger,
}

/// A homework record cannot be turned into a notification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("homework record has no status")]
    MissingStatus,

    #[error("unexpected homework status: {0}")]
    UnknownStatus(String),

    #[error("homework record has no `homework_name`")]
    MissingName,
}

/// A message could not be handed to the chat API.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("request to Telegram failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Telegram returned HTTP {status}: {description}")]
    Status { status: u16, description: String },

    #[error("Telegram rejected the message: {0}")]
    Rejected(String),
}

/// A failure that ends an iteration early. Caught by the loop, never
/// propagated past it.
#[derive(Debug, Error)]
pub enum IterationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
