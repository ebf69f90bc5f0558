// Pricing request, quote and log record types
pub mod pricing;

// Feature encoding and regression metrics
pub mod ml;

// Demand forecasting value types
pub mod forecast;

// Public-holiday calendar
pub mod holidays;

// Training-run history
pub mod model_performance;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;

// Live data provider traits
pub mod ports;
