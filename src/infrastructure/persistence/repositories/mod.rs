pub mod model_performance_repository;
pub mod prediction_log_repository;

pub use model_performance_repository::SqliteModelPerformanceRepository;
pub use prediction_log_repository::SqlitePredictionRepository;
