//! Completion ledger.
//!
//! Bounded increment/decrement over a goal tracker's sparse per-period
//! history, plus the read-side views (current progress, bounded history).
//! Out-of-range attempts are silent no-ops, never errors: the ceiling is
//! a valid steady state and repeated clamped calls change nothing.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::period;
use crate::tracker::{CompletionRecord, GoalTracker};

/// Default number of periods returned by [`GoalTracker::history`].
pub const DEFAULT_HISTORY_LIMIT: usize = 8;

/// Progress within the current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodProgress {
    pub count: u32,
    pub frequency: u32,
    pub period_start: i64,
}

impl GoalTracker {
    /// The record for the given period start, if that period was ever
    /// touched.
    pub fn record_for(&self, period_start: i64) -> Option<&CompletionRecord> {
        self.completions
            .iter()
            .find(|c| c.period_start == period_start)
    }

    /// Add one completion to the period containing `now`.
    ///
    /// Creates the period's record on first touch. At the frequency
    /// ceiling this is a no-op. Returns whether a count changed.
    pub fn increment_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool {
        let period_start = period::period_start_millis(now, self.period_rule());
        match self
            .completions
            .iter_mut()
            .find(|c| c.period_start == period_start)
        {
            Some(record) => {
                if record.count >= self.frequency {
                    return false;
                }
                record.count += 1;
                true
            }
            None => {
                self.completions.push(CompletionRecord {
                    period_start,
                    count: 1,
                });
                true
            }
        }
    }

    /// Remove one completion from the period containing `now`.
    ///
    /// A missing record or a zero count is a no-op; records are never
    /// deleted, so a period decremented back to zero stays distinguishable
    /// from one never touched. Returns whether a count changed.
    pub fn decrement_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool {
        let period_start = period::period_start_millis(now, self.period_rule());
        match self
            .completions
            .iter_mut()
            .find(|c| c.period_start == period_start)
        {
            Some(record) if record.count > 0 => {
                record.count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Count, target and period start for the period containing `now`.
    pub fn progress_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> PeriodProgress {
        let period_start = period::period_start_millis(now, self.period_rule());
        PeriodProgress {
            count: self.record_for(period_start).map_or(0, |r| r.count),
            frequency: self.frequency,
            period_start,
        }
    }

    /// The `limit` most recent records, in chronological order.
    pub fn history(&self, limit: usize) -> Vec<CompletionRecord> {
        let mut records = self.completions.clone();
        records.sort_by_key(|c| std::cmp::Reverse(c.period_start));
        records.truncate(limit);
        records.reverse();
        records
    }

    /// The full record history, sorted ascending by period start.
    pub fn sorted_completions(&self) -> Vec<CompletionRecord> {
        let mut records = self.completions.clone();
        records.sort_by_key(|c| c.period_start);
        records
    }
}
