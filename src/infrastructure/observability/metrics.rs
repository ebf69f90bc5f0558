//! Prometheus metrics definitions for the pricing service
//!
//! All metrics use the `surge_pricing_` prefix and are read-only.

use crate::domain::pricing::types::SurgeStatus;
use prometheus::{
    Counter, CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Prometheus metrics for the prediction path
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Served predictions by surge status
    pub predictions_total: CounterVec,
    /// Requests rejected before reaching the model
    pub validation_rejections_total: Counter,
    /// Predictions served without a log row
    pub prediction_log_failures_total: Counter,
    /// End-to-end prediction latency in seconds
    pub prediction_latency_seconds: Histogram,
    /// Most recently quoted multiplier
    pub last_multiplier: Gauge,
    /// Uptime in seconds
    pub uptime_seconds: Gauge,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new(
                "surge_pricing_predictions_total",
                "Predictions served by surge status",
            ),
            &["status"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let validation_rejections_total = Counter::with_opts(Opts::new(
            "surge_pricing_validation_rejections_total",
            "Prediction requests rejected by input validation",
        ))?;
        registry.register(Box::new(validation_rejections_total.clone()))?;

        let prediction_log_failures_total = Counter::with_opts(Opts::new(
            "surge_pricing_prediction_log_failures_total",
            "Predictions that could not be written to the log",
        ))?;
        registry.register(Box::new(prediction_log_failures_total.clone()))?;

        let prediction_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "surge_pricing_prediction_latency_seconds",
                "Prediction latency in seconds",
            )
            .buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25]),
        )?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        let last_multiplier = Gauge::with_opts(Opts::new(
            "surge_pricing_last_multiplier",
            "Most recently quoted price multiplier",
        ))?;
        registry.register(Box::new(last_multiplier.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "surge_pricing_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            validation_rejections_total,
            prediction_log_failures_total,
            prediction_latency_seconds,
            last_multiplier,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn record_prediction(&self, status: SurgeStatus, multiplier: f64, latency: f64) {
        self.predictions_total
            .with_label_values(&[status.as_str()])
            .inc();
        self.last_multiplier.set(multiplier);
        self.prediction_latency_seconds.observe(latency);
    }

    pub fn predictions_by_status(&self, status: SurgeStatus) -> u64 {
        self.predictions_total
            .with_label_values(&[status.as_str()])
            .get() as u64
    }
}
