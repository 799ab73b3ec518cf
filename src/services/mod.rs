pub mod cohort;
pub mod correlation;
pub mod matching;
pub mod ranking;
pub mod recommendations;

pub use recommendations::{EngineSettings, RecommendationEngine};
