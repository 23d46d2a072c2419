//! Aggregation engine.
//!
//! Read-side statistics recomputed from the current snapshot on every
//! query: streaks and completion rates per goal, per-tag rollups across
//! goals, and measurement trends. Nothing here is persisted or cached.

mod streaks;
mod tag_rollup;
mod trend;

pub use streaks::{best_streak, completion_rate, current_streak};
pub use tag_rollup::{stats_by_tag, TagStats};
pub use trend::{measurement_trend, MeasurementTrend, TrendDirection};
