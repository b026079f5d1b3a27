//! Quality metric computation and health scoring.

mod metrics;
mod scorer;

pub use metrics::MetricsComputer;
pub use scorer::HealthScorer;
