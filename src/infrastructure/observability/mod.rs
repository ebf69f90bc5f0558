//! Push-based observability for the pricing service
//!
//! Metrics are kept in a Prometheus registry and pushed out as periodic
//! structured JSON log lines. Nothing here listens for requests.

pub mod logging;
pub mod metrics;
pub mod reporter;

pub use logging::{init_stderr_tracing, init_tracing};
pub use metrics::Metrics;
pub use reporter::MetricsReporter;
