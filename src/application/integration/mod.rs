pub mod live_pricing;

pub use live_pricing::{ConditionSource, LivePricing, LiveQuote, LiveRequest};
