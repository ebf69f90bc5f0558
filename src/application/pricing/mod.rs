pub mod engine;
pub mod service;

pub use engine::{ModelInfo, PricingEngine};
pub use service::{PredictionResponse, PricingService, ServiceError};
