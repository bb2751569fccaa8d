// ABOUTME: Configuration and environment variable management for Quill
// ABOUTME: Environment variable names and the runtime Config loaded from them

pub mod config;
pub mod constants;

pub use config::{parse_port, Config, ConfigError};
