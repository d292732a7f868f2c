pub mod providers;
pub mod recent_items;
pub mod recommendations;

pub use recent_items::RecencyTracker;
pub use recommendations::{CardActions, LoadOptions, LoadOutcome, RecommendationLoader};
