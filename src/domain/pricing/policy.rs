//! Turning a raw model output into a displayed price.
//!
//! The same policy is applied by every prediction path (HTTP service, CLI,
//! live pricing), so the clamp band and rounding live in exactly one place.

use super::types::{PricingQuote, SurgeStatus};
use serde::{Deserialize, Serialize};

/// Lowest multiplier ever quoted
pub const MULTIPLIER_FLOOR: f64 = 1.0;

/// Highest multiplier ever quoted. Sits above the largest value the
/// synthetic generator can label (3.3), so it only bounds extrapolation.
pub const MULTIPLIER_CEILING: f64 = 3.5;

/// Multiplier above which pricing is a moderate surge
pub const MODERATE_SURGE_THRESHOLD: f64 = 1.1;

/// Multiplier above which pricing is a high surge
pub const HIGH_SURGE_THRESHOLD: f64 = 1.2;

pub const DEFAULT_BASE_PRICE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub base_price: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            base_price: DEFAULT_BASE_PRICE,
            floor: MULTIPLIER_FLOOR,
            ceiling: MULTIPLIER_CEILING,
        }
    }
}

impl PricingPolicy {
    pub fn with_base_price(base_price: f64) -> Self {
        Self {
            base_price,
            ..Self::default()
        }
    }

    /// Clamp into the band and round to the 3 decimals that are reported.
    /// NaN collapses to the floor.
    pub fn clamp_multiplier(&self, raw: f64) -> f64 {
        let clamped = if raw.is_nan() {
            self.floor
        } else {
            raw.clamp(self.floor, self.ceiling)
        };
        round_to(clamped, 3)
    }

    pub fn quote(&self, raw_multiplier: f64) -> PricingQuote {
        let price_multiplier = self.clamp_multiplier(raw_multiplier);
        PricingQuote {
            price_multiplier,
            base_price: self.base_price,
            final_price: round_to(self.base_price * price_multiplier, 2),
            surge_percentage: round_to((price_multiplier - 1.0) * 100.0, 1),
            status: surge_status(price_multiplier),
        }
    }
}

/// Status bucket; strictly-greater comparisons at both thresholds
pub fn surge_status(multiplier: f64) -> SurgeStatus {
    if multiplier > HIGH_SURGE_THRESHOLD {
        SurgeStatus::HighSurge
    } else if multiplier > MODERATE_SURGE_THRESHOLD {
        SurgeStatus::ModerateSurge
    } else {
        SurgeStatus::Normal
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_thresholds_are_exclusive() {
        assert_eq!(surge_status(1.0), SurgeStatus::Normal);
        assert_eq!(surge_status(1.1), SurgeStatus::Normal);
        assert_eq!(surge_status(1.101), SurgeStatus::ModerateSurge);
        assert_eq!(surge_status(1.2), SurgeStatus::ModerateSurge);
        assert_eq!(surge_status(1.201), SurgeStatus::HighSurge);
        assert_eq!(surge_status(2.8), SurgeStatus::HighSurge);
    }

    #[test]
    fn test_clamp_band() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.clamp_multiplier(0.7), 1.0);
        assert_eq!(policy.clamp_multiplier(f64::NAN), 1.0);
        assert_eq!(policy.clamp_multiplier(9.0), MULTIPLIER_CEILING);
        assert_eq!(policy.clamp_multiplier(1.23456), 1.235);
    }

    #[test]
    fn test_quote_prices_from_reported_multiplier() {
        let policy = PricingPolicy::default();
        let quote = policy.quote(1.45678);

        assert_eq!(quote.price_multiplier, 1.457);
        assert_eq!(quote.base_price, 100.0);
        assert_eq!(quote.final_price, round_to(100.0 * 1.457, 2));
        assert!((quote.final_price - 145.7).abs() < 1e-9);
        assert!((quote.surge_percentage - 45.7).abs() < 1e-9);
        assert_eq!(quote.status, SurgeStatus::HighSurge);
    }

    #[test]
    fn test_quote_never_below_floor() {
        let policy = PricingPolicy::with_base_price(250.0);
        for raw in [-3.0, 0.0, 0.5, 0.999] {
            let quote = policy.quote(raw);
            assert_eq!(quote.price_multiplier, 1.0);
            assert_eq!(quote.final_price, 250.0);
            assert_eq!(quote.surge_percentage, 0.0);
            assert_eq!(quote.status, SurgeStatus::Normal);
        }
    }
}
