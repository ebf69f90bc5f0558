// Synthetic data, boosting model, training and artifacts
pub mod ml;

// Request-level pricing and prediction logging
pub mod pricing;

// Hourly demand forecasting
pub mod forecast;

// Live traffic/weather lookup feeding the pricing engine
pub mod integration;
