//! Configuration domain module

mod app_config;

pub use app_config::{AppConfig, DEFAULT_BASE_URL, DEFAULT_LOG_LEVEL, DEFAULT_TIMEOUT_SECS};
