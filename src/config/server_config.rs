use super::{Lookup, parse_or};
use anyhow::Result;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://pricing_predictions.db";

/// Where served predictions are logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionLogBackend {
    Sqlite,
    /// Process-local log, lost on restart
    Memory,
}

#[derive(Debug, Error)]
#[error("unknown prediction log backend {0:?} (expected sqlite or memory)")]
pub struct UnknownBackend(String);

impl FromStr for PredictionLogBackend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

/// HTTP bind address and prediction log location
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub prediction_log: PredictionLogBackend,
}

impl ServerEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&super::process_env)
    }

    pub(crate) fn from_lookup(get: Lookup) -> Result<Self> {
        Ok(Self {
            host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get, "SERVER_PORT", 8000u16)?,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            prediction_log: parse_or(get, "PREDICTION_LOG", PredictionLogBackend::Sqlite)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
