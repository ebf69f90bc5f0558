//! REST surface of the pricing service.

pub mod error;
pub mod handlers;
pub mod router;

pub use error::ApiError;
pub use router::{AppState, create_router};
