//! Measurement trend between the two most recent readings.

use serde::{Deserialize, Serialize};

use crate::tracker::MeasurementTracker;

/// Direction of change between the two most recent readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Down,
    Up,
    Same,
}

/// Trend of a measurement tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementTrend {
    pub direction: TrendDirection,
    /// Absolute difference between the latest and previous reading.
    pub magnitude: f64,
    pub latest: f64,
    pub previous: f64,
    /// Change since the earliest reading.
    pub total_change: f64,
}

/// Compare the two most recent entries by `date` (not by position, so a
/// backfilled older reading cannot pose as "latest"). A tracker with a
/// single entry reads as `Same` with zero magnitude; an empty tracker has
/// no trend.
pub fn measurement_trend(tracker: &MeasurementTracker) -> Option<MeasurementTrend> {
    let mut ordered: Vec<&crate::tracker::MeasurementEntry> = tracker.entries.iter().collect();
    ordered.sort_by_key(|e| e.date);

    let latest = ordered.last()?.value;
    let previous = ordered
        .len()
        .checked_sub(2)
        .map_or(latest, |i| ordered[i].value);
    let first = ordered.first().map_or(latest, |e| e.value);

    let direction = if latest < previous {
        TrendDirection::Down
    } else if latest > previous {
        TrendDirection::Up
    } else {
        TrendDirection::Same
    };

    Some(MeasurementTrend {
        direction,
        magnitude: (latest - previous).abs(),
        latest,
        previous,
        total_change: latest - first,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::MeasurementEntry;

    fn tracker(values: &[(f64, i64)]) -> MeasurementTracker {
        MeasurementTracker {
            id: "m1".into(),
            name: "Weight".into(),
            unit: "kg".into(),
            entries: values
                .iter()
                .enumerate()
                .map(|(i, &(value, date))| MeasurementEntry {
                    id: format!("e{i}"),
                    value,
                    date,
                })
                .collect(),
            created_at: 0,
        }
    }

    #[test]
    fn downward_trend_with_magnitude() {
        let t = tracker(&[(75.0, 1), (74.5, 2), (74.2, 3)]);
        let trend = measurement_trend(&t).unwrap();
        assert_eq!(trend.direction, TrendDirection::Down);
        assert!((trend.magnitude - 0.3).abs() < 1e-9);
        assert!((trend.total_change - (-0.8)).abs() < 1e-9);
    }

    #[test]
    fn upward_trend() {
        let t = tracker(&[(60.0, 1), (61.5, 2)]);
        let trend = measurement_trend(&t).unwrap();
        assert_eq!(trend.direction, TrendDirection::Up);
        assert!((trend.magnitude - 1.5).abs() < 1e-9);
    }

    #[test]
    fn equal_readings_are_same() {
        let t = tracker(&[(60.0, 1), (60.0, 2)]);
        let trend = measurement_trend(&t).unwrap();
        assert_eq!(trend.direction, TrendDirection::Same);
        assert_eq!(trend.magnitude, 0.0);
    }

    #[test]
    fn single_entry_reads_as_same() {
        let t = tracker(&[(60.0, 1)]);
        let trend = measurement_trend(&t).unwrap();
        assert_eq!(trend.direction, TrendDirection::Same);
        assert_eq!(trend.latest, 60.0);
        assert_eq!(trend.previous, 60.0);
    }

    #[test]
    fn empty_tracker_has_no_trend() {
        assert!(measurement_trend(&tracker(&[])).is_none());
    }

    #[test]
    fn backfilled_entry_does_not_become_latest() {
        // Appended last but dated earliest.
        let t = tracker(&[(74.0, 200), (73.5, 300), (76.0, 100)]);
        let trend = measurement_trend(&t).unwrap();
        assert_eq!(trend.latest, 73.5);
        assert_eq!(trend.previous, 74.0);
        assert_eq!(trend.direction, TrendDirection::Down);
    }
}
