//! Configuration loaded from environment variables (and `.env` when present),
//! grouped by concern: server, artifacts, pricing, integrations, observability.

mod artifact_config;
mod integration_config;
mod observability_config;
mod pricing_config;
mod server_config;

pub use artifact_config::ArtifactEnvConfig;
pub use integration_config::IntegrationEnvConfig;
pub use observability_config::ObservabilityEnvConfig;
pub use pricing_config::PricingEnvConfig;
pub use server_config::{PredictionLogBackend, ServerEnvConfig};

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Variable lookup, `std::env` in production and a map in tests
pub(crate) type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub(crate) fn process_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_or<T>(get: Lookup, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {}={:?}", key, raw)),
        None => Ok(default),
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerEnvConfig,
    pub artifacts: ArtifactEnvConfig,
    pub pricing: PricingEnvConfig,
    pub integration: IntegrationEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(&process_env)
    }

    pub(crate) fn from_lookup(get: Lookup) -> Result<Self> {
        Ok(Self {
            server: ServerEnvConfig::from_lookup(get)?,
            artifacts: ArtifactEnvConfig::from_lookup(get),
            pricing: PricingEnvConfig::from_lookup(get)?,
            integration: IntegrationEnvConfig::from_lookup(get),
            observability: ObservabilityEnvConfig::from_lookup(get)?,
        })
    }
}
