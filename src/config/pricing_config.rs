use super::{Lookup, parse_or};
use crate::domain::pricing::policy::{DEFAULT_BASE_PRICE, PricingPolicy};
use anyhow::{Result, bail};

#[derive(Debug, Clone)]
pub struct PricingEnvConfig {
    pub base_price: f64,
    /// Window used by `/stats` when `days` is omitted
    pub stats_default_days: i64,
}

impl PricingEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&super::process_env)
    }

    pub(crate) fn from_lookup(get: Lookup) -> Result<Self> {
        let base_price = parse_or(get, "BASE_PRICE", DEFAULT_BASE_PRICE)?;
        if !(base_price > 0.0 && base_price.is_finite()) {
            bail!("BASE_PRICE must be a positive number, got {}", base_price);
        }
        let stats_default_days = parse_or(get, "STATS_DEFAULT_DAYS", 30i64)?;
        if stats_default_days < 1 {
            bail!("STATS_DEFAULT_DAYS must be at least 1, got {}", stats_default_days);
        }
        Ok(Self {
            base_price,
            stats_default_days,
        })
    }

    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy::with_base_price(self.base_price)
    }
}
