pub mod compose;
pub mod config;
pub mod emit;
pub mod loader;
pub mod metrics;
pub mod pipeline;
pub mod planner;
pub mod resolver;
pub mod types;
