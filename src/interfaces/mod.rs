// HTTP prediction surface
pub mod api;
