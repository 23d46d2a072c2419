//! Store façade.
//!
//! [`TrackerService`] owns the in-memory snapshot and the database handle
//! and exposes every query and mutation the presentation layer uses. Each
//! mutation is a read-modify-write-persist sequence inside one `&mut self`
//! call; the exclusive borrow is the single-writer guard, so two mutations
//! can never race on a stale base snapshot in-process.
//!
//! Persistence is optimistic: the in-memory snapshot is updated first and
//! a failed write surfaces as an error without rolling it back, so memory
//! and disk may diverge until the next successful write.

use chrono::{DateTime, Local, TimeZone, Utc};
use uuid::Uuid;

use crate::error::{CoreError, Result, ValidationError};
use crate::ledger::{PeriodProgress, DEFAULT_HISTORY_LIMIT};
use crate::period::{Period, Weekday};
use crate::stats;
use crate::storage::{Database, SNAPSHOT_KEY};
use crate::tracker::{
    CompletionRecord, GoalTracker, MeasurementEntry, MeasurementTracker, Tracker, TrackerStore,
};

/// Fields required to create a goal tracker.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub tag: String,
    pub tag_color: String,
    pub frequency: u32,
    pub period: Period,
    pub start_day: Weekday,
    pub start_date: Option<u32>,
}

/// Partial-field update for a goal tracker. `None` leaves a field alone.
///
/// Changing `period` or `frequency` does not touch existing completions:
/// historical records stay keyed to the period starts computed when they
/// were written.
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub tag_color: Option<String>,
    pub frequency: Option<u32>,
    pub period: Option<Period>,
    pub start_day: Option<Weekday>,
    pub start_date: Option<u32>,
}

/// Fields required to create a measurement tracker.
#[derive(Debug, Clone)]
pub struct NewMeasurement {
    pub name: String,
    pub unit: String,
}

/// Derived statistics for one goal tracker.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStats {
    pub streak: u32,
    pub best_streak: u32,
    /// Fraction of recorded periods meeting target, `[0.0, 1.0]`.
    pub completion_rate: f64,
    pub completed_periods: u32,
    pub total_periods: u32,
}

/// The engine behind every screen: snapshot in memory, SQLite behind it.
pub struct TrackerService {
    store: TrackerStore,
    db: Database,
}

impl TrackerService {
    /// Open the service against the on-disk database.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn open() -> Result<Self> {
        Self::with_database(Database::open()?)
    }

    /// Open the service against an existing database handle.
    ///
    /// On first run (no snapshot under the well-known key) an empty store
    /// is written. A snapshot that fails to parse is replaced in memory by
    /// an empty store; disk is left alone until the next mutation.
    pub fn with_database(db: Database) -> Result<Self> {
        let store = match db.kv_get(SNAPSHOT_KEY)? {
            Some(json) => serde_json::from_str(&json).unwrap_or_default(),
            None => {
                let store = TrackerStore::default();
                db.kv_set(SNAPSHOT_KEY, &serde_json::to_string(&store)?)?;
                store
            }
        };
        Ok(Self { store, db })
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.store)?;
        self.db.kv_set(SNAPSHOT_KEY, &json)?;
        Ok(())
    }

    fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }

    fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    // === Queries ===

    /// The full in-memory snapshot.
    pub fn store(&self) -> &TrackerStore {
        &self.store
    }

    pub fn goal(&self, id: &str) -> Option<&GoalTracker> {
        self.store.goals.iter().find(|g| g.id == id)
    }

    pub fn measurement(&self, id: &str) -> Option<&MeasurementTracker> {
        self.store.measurements.iter().find(|m| m.id == id)
    }

    /// Either kind of tracker by id.
    pub fn tracker(&self, id: &str) -> Option<Tracker> {
        self.goal(id)
            .cloned()
            .map(Tracker::Goal)
            .or_else(|| self.measurement(id).cloned().map(Tracker::Measurement))
    }

    /// Current-period progress for a goal, `None` if the id is unknown.
    pub fn progress(&self, id: &str) -> Option<PeriodProgress> {
        self.progress_at(id, &Local::now())
    }

    pub fn progress_at<Tz: TimeZone>(&self, id: &str, now: &DateTime<Tz>) -> Option<PeriodProgress> {
        self.goal(id).map(|g| g.progress_at(now))
    }

    /// The most recent periods of a goal in chronological order.
    /// `limit` defaults to [`DEFAULT_HISTORY_LIMIT`].
    pub fn goal_history(&self, id: &str, limit: Option<usize>) -> Option<Vec<CompletionRecord>> {
        self.goal(id)
            .map(|g| g.history(limit.unwrap_or(DEFAULT_HISTORY_LIMIT)))
    }

    /// Per-tag rollup over all goals.
    pub fn stats_by_tag(&self) -> Vec<stats::TagStats> {
        self.stats_by_tag_at(&Local::now())
    }

    pub fn stats_by_tag_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<stats::TagStats> {
        stats::stats_by_tag(&self.store.goals, now)
    }

    /// Streaks and completion rate for a goal, `None` if the id is unknown.
    pub fn goal_stats(&self, id: &str) -> Option<GoalStats> {
        self.goal(id).map(|g| GoalStats {
            streak: stats::current_streak(g),
            best_streak: stats::best_streak(g),
            completion_rate: stats::completion_rate(g),
            completed_periods: g.completed_periods() as u32,
            total_periods: g.total_periods() as u32,
        })
    }

    /// Trend of a measurement tracker, `None` if the id is unknown or the
    /// tracker has no entries.
    pub fn measurement_trend(&self, id: &str) -> Option<stats::MeasurementTrend> {
        self.measurement(id).and_then(stats::measurement_trend)
    }

    /// Entries of a measurement tracker dated at or after `cutoff_ms`,
    /// sorted by date. `None` if the id is unknown.
    pub fn measurement_entries_since(
        &self,
        id: &str,
        cutoff_ms: i64,
    ) -> Option<Vec<MeasurementEntry>> {
        self.measurement(id).map(|m| m.entries_since(cutoff_ms))
    }

    // === Goal mutations ===

    /// Create a goal tracker and persist the store.
    ///
    /// # Errors
    /// Returns a validation error for an empty name, a zero frequency or
    /// an out-of-range start date.
    pub fn add_goal(&mut self, new: NewGoal) -> Result<GoalTracker> {
        if new.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "must not be empty".into(),
            }
            .into());
        }
        validate_frequency(new.frequency)?;
        if let Some(d) = new.start_date {
            validate_start_date(d)?;
        }

        let tracker = GoalTracker {
            id: Self::generate_id(),
            name: new.name,
            tag: new.tag,
            tag_color: new.tag_color,
            frequency: new.frequency,
            period: new.period,
            start_day: new.start_day,
            start_date: new.start_date,
            completions: Vec::new(),
            created_at: Self::now_millis(),
        };
        self.store.goals.push(tracker.clone());
        self.persist()?;
        Ok(tracker)
    }

    /// Merge the supplied fields into an existing goal and persist.
    /// Returns `false` if the id is unknown.
    pub fn update_goal(&mut self, id: &str, update: GoalUpdate) -> Result<bool> {
        if let Some(f) = update.frequency {
            validate_frequency(f)?;
        }
        if let Some(d) = update.start_date {
            validate_start_date(d)?;
        }

        let Some(goal) = self.store.goals.iter_mut().find(|g| g.id == id) else {
            return Ok(false);
        };
        if let Some(name) = update.name {
            goal.name = name;
        }
        if let Some(tag) = update.tag {
            goal.tag = tag;
        }
        if let Some(tag_color) = update.tag_color {
            goal.tag_color = tag_color;
        }
        if let Some(frequency) = update.frequency {
            goal.frequency = frequency;
        }
        if let Some(period) = update.period {
            goal.period = period;
        }
        if let Some(start_day) = update.start_day {
            goal.start_day = start_day;
        }
        if let Some(start_date) = update.start_date {
            goal.start_date = Some(start_date);
        }
        self.persist()?;
        Ok(true)
    }

    /// Add one completion to a goal's current period and persist if a
    /// count changed. Returns `false` if the id is unknown.
    pub fn increment_goal(&mut self, id: &str) -> Result<bool> {
        self.increment_goal_at(id, &Local::now())
    }

    pub fn increment_goal_at<Tz: TimeZone>(&mut self, id: &str, now: &DateTime<Tz>) -> Result<bool> {
        let Some(goal) = self.store.goals.iter_mut().find(|g| g.id == id) else {
            return Ok(false);
        };
        if goal.increment_at(now) {
            self.persist()?;
        }
        Ok(true)
    }

    /// Remove one completion from a goal's current period and persist if
    /// a count changed. Returns `false` if the id is unknown.
    pub fn decrement_goal(&mut self, id: &str) -> Result<bool> {
        self.decrement_goal_at(id, &Local::now())
    }

    pub fn decrement_goal_at<Tz: TimeZone>(&mut self, id: &str, now: &DateTime<Tz>) -> Result<bool> {
        let Some(goal) = self.store.goals.iter_mut().find(|g| g.id == id) else {
            return Ok(false);
        };
        if goal.decrement_at(now) {
            self.persist()?;
        }
        Ok(true)
    }

    // === Measurement mutations ===

    /// Create a measurement tracker and persist the store.
    ///
    /// # Errors
    /// Returns a validation error for an empty name.
    pub fn add_measurement(&mut self, new: NewMeasurement) -> Result<MeasurementTracker> {
        if new.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "must not be empty".into(),
            }
            .into());
        }
        let tracker = MeasurementTracker {
            id: Self::generate_id(),
            name: new.name,
            unit: new.unit,
            entries: Vec::new(),
            created_at: Self::now_millis(),
        };
        self.store.measurements.push(tracker.clone());
        self.persist()?;
        Ok(tracker)
    }

    /// Append a reading to a measurement tracker and persist. `date_ms`
    /// defaults to now; an explicit past date backfills. Returns `false`
    /// if the id is unknown.
    pub fn add_measurement_entry(
        &mut self,
        id: &str,
        value: f64,
        date_ms: Option<i64>,
    ) -> Result<bool> {
        let entry = MeasurementEntry {
            id: Self::generate_id(),
            value,
            date: date_ms.unwrap_or_else(Self::now_millis),
        };
        let Some(tracker) = self.store.measurements.iter_mut().find(|m| m.id == id) else {
            return Ok(false);
        };
        tracker.entries.push(entry);
        self.persist()?;
        Ok(true)
    }

    // === Shared mutations ===

    /// Delete a tracker of either kind and persist. Returns `false` if
    /// the id is unknown.
    pub fn delete_tracker(&mut self, id: &str) -> Result<bool> {
        let goals_before = self.store.goals.len();
        self.store.goals.retain(|g| g.id != id);
        let measurements_before = self.store.measurements.len();
        self.store.measurements.retain(|m| m.id != id);

        let removed = self.store.goals.len() != goals_before
            || self.store.measurements.len() != measurements_before;
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Move a goal to a new display position, shifting the others.
    ///
    /// # Errors
    /// Returns a validation error if either index is out of bounds.
    pub fn reorder_goals(&mut self, from: usize, to: usize) -> Result<()> {
        reorder(&mut self.store.goals, "goals", from, to)?;
        self.persist()
    }

    /// Move a measurement tracker to a new display position.
    ///
    /// # Errors
    /// Returns a validation error if either index is out of bounds.
    pub fn reorder_measurements(&mut self, from: usize, to: usize) -> Result<()> {
        reorder(&mut self.store.measurements, "measurements", from, to)?;
        self.persist()
    }

    // === Import / export ===

    /// Serialize the full store as a pretty-printed JSON document.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.store)?)
    }

    /// Replace the entire store from a JSON document.
    ///
    /// All-or-nothing: malformed JSON or a document missing the `goals`
    /// or `measurements` sequences returns `false` and leaves the store
    /// untouched. A valid document always replaces the in-memory store;
    /// the result is `false` if it then could not be written durably.
    pub fn import_json(&mut self, json: &str) -> bool {
        let parsed: TrackerStore = match serde_json::from_str(json) {
            Ok(store) => store,
            Err(_) => return false,
        };
        self.store = parsed;
        self.persist().is_ok()
    }
}

fn validate_frequency(frequency: u32) -> Result<(), ValidationError> {
    if frequency == 0 {
        return Err(ValidationError::InvalidValue {
            field: "frequency".into(),
            message: "must be at least 1".into(),
        });
    }
    Ok(())
}

fn validate_start_date(start_date: u32) -> Result<(), ValidationError> {
    if !(1..=31).contains(&start_date) {
        return Err(ValidationError::InvalidValue {
            field: "startDate".into(),
            message: "must be between 1 and 31".into(),
        });
    }
    Ok(())
}

fn reorder<T>(items: &mut Vec<T>, collection: &str, from: usize, to: usize) -> Result<(), CoreError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(ValidationError::OutOfBounds {
                collection: collection.into(),
                index,
                len,
            }
            .into());
        }
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}
