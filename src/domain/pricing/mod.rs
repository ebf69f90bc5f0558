pub mod policy;
pub mod types;
pub mod validation;
