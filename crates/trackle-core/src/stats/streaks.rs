//! Streaks and completion rate for a single goal tracker.
//!
//! All walks run over the recorded (sparse) history sorted by period
//! start: a period without a record was never touched and is invisible
//! here, it neither extends nor breaks a streak.

use crate::tracker::GoalTracker;

/// Consecutive most-recent recorded periods that met the target.
///
/// The walk starts at the newest record, so an in-progress current period
/// below target breaks the streak.
pub fn current_streak(tracker: &GoalTracker) -> u32 {
    let mut streak = 0;
    for record in tracker.sorted_completions().iter().rev() {
        if record.count >= tracker.frequency {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Longest run of consecutive recorded periods that met the target.
pub fn best_streak(tracker: &GoalTracker) -> u32 {
    let mut best = 0;
    let mut run = 0;
    for record in tracker.sorted_completions() {
        if record.count >= tracker.frequency {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

/// Fraction of recorded periods that met the target, in `[0.0, 1.0]`.
/// Zero when nothing was ever recorded.
pub fn completion_rate(tracker: &GoalTracker) -> f64 {
    if tracker.completions.is_empty() {
        return 0.0;
    }
    tracker.completed_periods() as f64 / tracker.total_periods() as f64
}
