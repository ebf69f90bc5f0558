pub mod artifacts;
pub mod observability;
pub mod persistence;
pub mod providers;
pub mod repositories;

pub use artifacts::ArtifactStore;
pub use persistence::{Database, SqliteModelPerformanceRepository, SqlitePredictionRepository};
pub use repositories::{InMemoryModelPerformanceRepository, InMemoryPredictionRepository};
