//! Per-tag rollup across all goal trackers.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::tracker::GoalTracker;

/// Accumulated progress for one tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagStats {
    pub tag: String,
    /// Color of the first goal seen with this tag.
    pub tag_color: String,
    pub total_goals: u32,
    /// Period records meeting target, summed across the tag's goals.
    pub completed_periods: u32,
    /// Period records ever touched, summed across the tag's goals.
    pub total_periods: u32,
    /// Current-period counts summed across the tag's goals.
    pub current_progress: u32,
    /// Current-period targets summed across the tag's goals.
    pub current_target: u32,
}

/// Single-pass rollup over all goals, grouped by tag in first-seen order.
///
/// Recomputed from scratch on every call; tracker counts are personal
/// scale, so there is no incremental maintenance.
pub fn stats_by_tag<Tz: TimeZone>(goals: &[GoalTracker], now: &DateTime<Tz>) -> Vec<TagStats> {
    let mut rollup: Vec<TagStats> = Vec::new();

    for goal in goals {
        let progress = goal.progress_at(now);
        let completed = goal.completed_periods() as u32;
        let total = goal.total_periods() as u32;

        match rollup.iter_mut().find(|s| s.tag == goal.tag) {
            Some(stats) => {
                stats.total_goals += 1;
                stats.completed_periods += completed;
                stats.total_periods += total;
                stats.current_progress += progress.count;
                stats.current_target += goal.frequency;
            }
            None => rollup.push(TagStats {
                tag: goal.tag.clone(),
                tag_color: goal.tag_color.clone(),
                total_goals: 1,
                completed_periods: completed,
                total_periods: total,
                current_progress: progress.count,
                current_target: goal.frequency,
            }),
        }
    }

    rollup
}
