//! Tracker data model.
//!
//! These types serialize to the snapshot document stored under the
//! well-known key (camelCase field names, epoch-millisecond timestamps),
//! so the serde renames here are load-bearing: they pin the on-disk and
//! import/export format.

use serde::{Deserialize, Serialize};

use crate::period::{Period, PeriodRule, Weekday};

/// Completion count for one period of a goal tracker.
///
/// A period that was never interacted with has no record and reads as
/// zero; a record decremented back to zero stays in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    /// Epoch milliseconds of the period's midnight-aligned start.
    pub period_start: i64,
    pub count: u32,
}

/// A count-based habit repeating on a daily/weekly/monthly cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalTracker {
    pub id: String,
    pub name: String,
    /// Free-form grouping label; users define their own tags.
    pub tag: String,
    pub tag_color: String,
    /// Target count per period, at least 1.
    pub frequency: u32,
    pub period: Period,
    /// Weekday beginning a period; meaningful only for weekly trackers.
    pub start_day: Weekday,
    /// Day-of-month (1..31) beginning a period; meaningful only for
    /// monthly trackers. Absent means the 1st.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<u32>,
    /// Sparse per-period history, at most one record per period start,
    /// in insertion order.
    pub completions: Vec<CompletionRecord>,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl GoalTracker {
    /// The tracker's cadence with its anchor applied.
    pub fn period_rule(&self) -> PeriodRule {
        match self.period {
            Period::Daily => PeriodRule::Daily,
            Period::Weekly => PeriodRule::Weekly {
                start_day: self.start_day,
            },
            Period::Monthly => PeriodRule::Monthly {
                start_date: self.start_date.unwrap_or(1),
            },
        }
    }

    /// Number of recorded periods that met the current target.
    pub fn completed_periods(&self) -> usize {
        self.completions
            .iter()
            .filter(|c| c.count >= self.frequency)
            .count()
    }

    /// Number of periods ever touched.
    pub fn total_periods(&self) -> usize {
        self.completions.len()
    }
}

/// One reading of a measurement tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementEntry {
    pub id: String,
    pub value: f64,
    /// Epoch milliseconds of the reading.
    pub date: i64,
}

/// A time series of numeric readings (weight, waist, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementTracker {
    pub id: String,
    pub name: String,
    /// Display unit, free-form ("kg", "lbs", "cm", ...).
    pub unit: String,
    /// Entries in insertion order. Readings may be backfilled, so
    /// chronology is derived from `date`, not position.
    pub entries: Vec<MeasurementEntry>,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl MeasurementTracker {
    /// The entry with the greatest `date` (latest insertion wins ties).
    pub fn latest_entry(&self) -> Option<&MeasurementEntry> {
        self.entries
            .iter()
            .enumerate()
            .max_by_key(|(i, e)| (e.date, *i))
            .map(|(_, e)| e)
    }

    /// Entries with `date >= cutoff_ms`, sorted ascending by date.
    pub fn entries_since(&self, cutoff_ms: i64) -> Vec<MeasurementEntry> {
        let mut window: Vec<MeasurementEntry> = self
            .entries
            .iter()
            .filter(|e| e.date >= cutoff_ms)
            .cloned()
            .collect();
        window.sort_by_key(|e| e.date);
        window
    }
}

/// Either kind of tracker, discriminated explicitly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Tracker {
    Goal(GoalTracker),
    Measurement(MeasurementTracker),
}

impl Tracker {
    pub fn id(&self) -> &str {
        match self {
            Tracker::Goal(g) => &g.id,
            Tracker::Measurement(m) => &m.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tracker::Goal(g) => &g.name,
            Tracker::Measurement(m) => &m.name,
        }
    }
}

/// The persisted aggregate root. Both sequences are in user-controlled
/// display order.
///
/// Both fields are required on purpose: import validation rejects a
/// document missing either sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerStore {
    pub goals: Vec<GoalTracker>,
    pub measurements: Vec<MeasurementTracker>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal() -> GoalTracker {
        GoalTracker {
            id: "g1".into(),
            name: "Gym".into(),
            tag: "Health".into(),
            tag_color: "#34d399".into(),
            frequency: 3,
            period: Period::Weekly,
            start_day: Weekday::Mon,
            start_date: None,
            completions: vec![
                CompletionRecord {
                    period_start: 1_000,
                    count: 3,
                },
                CompletionRecord {
                    period_start: 2_000,
                    count: 1,
                },
            ],
            created_at: 0,
        }
    }

    #[test]
    fn goal_wire_format_uses_camel_case() {
        let json = serde_json::to_value(goal()).unwrap();
        assert_eq!(json["tagColor"], "#34d399");
        assert_eq!(json["startDay"], "Mon");
        assert_eq!(json["period"], "weekly");
        assert_eq!(json["completions"][0]["periodStart"], 1_000);
        assert_eq!(json["createdAt"], 0);
        // Absent start_date is omitted entirely.
        assert!(json.get("startDate").is_none());
    }

    #[test]
    fn goal_round_trips_through_json() {
        let original = goal();
        let json = serde_json::to_string(&original).unwrap();
        let back: GoalTracker = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn completed_and_total_periods() {
        let g = goal();
        assert_eq!(g.completed_periods(), 1);
        assert_eq!(g.total_periods(), 2);
    }

    #[test]
    fn latest_entry_is_by_date_not_position() {
        let tracker = MeasurementTracker {
            id: "m1".into(),
            name: "Weight".into(),
            unit: "kg".into(),
            entries: vec![
                MeasurementEntry {
                    id: "e1".into(),
                    value: 75.0,
                    date: 300,
                },
                // Backfilled older reading appended last.
                MeasurementEntry {
                    id: "e2".into(),
                    value: 76.0,
                    date: 100,
                },
            ],
            created_at: 0,
        };
        assert_eq!(tracker.latest_entry().unwrap().id, "e1");
    }

    #[test]
    fn entries_since_filters_and_sorts() {
        let tracker = MeasurementTracker {
            id: "m1".into(),
            name: "Weight".into(),
            unit: "kg".into(),
            entries: vec![
                MeasurementEntry {
                    id: "e1".into(),
                    value: 75.0,
                    date: 300,
                },
                MeasurementEntry {
                    id: "e2".into(),
                    value: 76.0,
                    date: 100,
                },
                MeasurementEntry {
                    id: "e3".into(),
                    value: 74.0,
                    date: 200,
                },
            ],
            created_at: 0,
        };
        let window = tracker.entries_since(150);
        let ids: Vec<&str> = window.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e3", "e1"]);
    }

    #[test]
    fn store_rejects_missing_sequences() {
        assert!(serde_json::from_str::<TrackerStore>(r#"{"goals": []}"#).is_err());
        assert!(serde_json::from_str::<TrackerStore>(r#"{"measurements": []}"#).is_err());
        assert!(
            serde_json::from_str::<TrackerStore>(r#"{"goals": [], "measurements": []}"#).is_ok()
        );
    }
}
