//! homework-bot library — re-exports modules for integration tests.

pub mod channel;
pub mod config;
pub mod error;
pub mod logging;
pub mod poller;
pub mod practicum;
pub mod verdict;
