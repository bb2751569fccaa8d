use std::env;
use std::net::IpAddr;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::constants::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[source] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid max connections: {0}")]
    InvalidMaxConnections(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: IpAddr,
    pub cors_origin: String,
    pub database_path: PathBuf,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = env::var(QUILL_PORT)
            .or_else(|_| env::var(PORT))
            .unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let port = parse_port(&port_str)?;

        let host_str = env::var(QUILL_HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let host = host_str
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHost(host_str.clone()))?;

        let cors_origin =
            env::var(QUILL_CORS_ORIGIN).unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        let database_path = env::var(QUILL_DATABASE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| quill_core::database_file());

        let max_connections = match env::var(QUILL_MAX_CONNECTIONS) {
            Ok(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidMaxConnections(raw)),
            },
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        debug!(
            "Loaded config: host={}, port={}, database={}",
            host,
            port,
            database_path.display()
        );

        Ok(Config {
            port,
            host,
            cors_origin,
            database_path,
            max_connections,
        })
    }
}

/// Parse and range-check a port number
pub fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let port = raw.trim().parse::<u16>().map_err(ConfigError::InvalidPort)?;
    if port == 0 {
        return Err(ConfigError::PortOutOfRange(port));
    }
    Ok(port)
}
