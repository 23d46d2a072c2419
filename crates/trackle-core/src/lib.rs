//! # Trackle Core Library
//!
//! This library provides the core business logic for Trackle, a personal
//! habit and metric tracker. It implements a CLI-first philosophy where
//! all operations are available via a standalone CLI binary, with any GUI
//! being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Period Calculator**: pure mapping from an instant to the start of
//!   the day/week/month period containing it, given a configurable anchor
//! - **Completion Ledger**: bounded increment/decrement over a goal's
//!   sparse per-period history
//! - **Aggregation Engine**: streaks, completion rates, per-tag rollups
//!   and measurement trends, recomputed from the snapshot on every query
//! - **Store Façade**: [`TrackerService`], the single object owning the
//!   in-memory snapshot and its SQLite-backed persistence
//!
//! ## Key Components
//!
//! - [`TrackerService`]: query/mutation API consumed by the presentation
//!   layer, including JSON import/export of the whole store
//! - [`Database`]: key-value snapshot persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod ledger;
pub mod period;
pub mod stats;
pub mod storage;
pub mod store;
pub mod tracker;

pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use ledger::{PeriodProgress, DEFAULT_HISTORY_LIMIT};
pub use period::{period_start, period_start_millis, Period, PeriodRule, Weekday};
pub use stats::{
    best_streak, completion_rate, current_streak, measurement_trend, stats_by_tag,
    MeasurementTrend, TagStats, TrendDirection,
};
pub use storage::{Config, Database, SNAPSHOT_KEY};
pub use store::{GoalStats, GoalUpdate, NewGoal, NewMeasurement, TrackerService};
pub use tracker::{
    CompletionRecord, GoalTracker, MeasurementEntry, MeasurementTracker, Tracker, TrackerStore,
};
