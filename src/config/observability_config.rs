//! Periodic metrics snapshot settings.

use super::{Lookup, parse_or};
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 60,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&super::process_env)
    }

    pub(crate) fn from_lookup(get: Lookup) -> Result<Self> {
        Ok(Self {
            enabled: get("OBSERVABILITY_ENABLED")
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(true),
            interval_seconds: parse_or(get, "OBSERVABILITY_INTERVAL", 60u64)?.max(1),
        })
    }
}
