//! Period calculation.
//!
//! Maps an instant to the start of the period it falls in, given the
//! tracker's cadence and anchor. All functions here are pure and total:
//! any instant and any valid rule produce a midnight-aligned period start
//! at or before the input instant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Cadence of a goal tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    /// Singular display name for the period ("day", "week", "month").
    pub fn unit_name(self) -> &'static str {
        match self {
            Period::Daily => "day",
            Period::Weekly => "week",
            Period::Monthly => "month",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        };
        f.write_str(s)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            other => Err(format!(
                "unknown period '{other}' (expected daily, weekly or monthly)"
            )),
        }
    }
}

/// Weekday anchor for weekly trackers.
///
/// Serialized with the three-letter English names the snapshot document
/// uses ("Sun".."Sat"), indexed Sunday-first to match epoch weekday math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Sunday-first index (Sun = 0 .. Sat = 6).
    pub fn index(self) -> i64 {
        match self {
            Weekday::Sun => 0,
            Weekday::Mon => 1,
            Weekday::Tue => 2,
            Weekday::Wed => 3,
            Weekday::Thu => 4,
            Weekday::Fri => 5,
            Weekday::Sat => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept full names and any casing; only the first three letters count.
        let lower = s.to_ascii_lowercase();
        let key = lower.get(..3).unwrap_or(&lower);
        match key {
            "sun" => Ok(Weekday::Sun),
            "mon" => Ok(Weekday::Mon),
            "tue" => Ok(Weekday::Tue),
            "wed" => Ok(Weekday::Wed),
            "thu" => Ok(Weekday::Thu),
            "fri" => Ok(Weekday::Fri),
            "sat" => Ok(Weekday::Sat),
            _ => Err(format!("unknown weekday '{s}'")),
        }
    }
}

/// A tracker's cadence together with its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodRule {
    Daily,
    Weekly { start_day: Weekday },
    Monthly { start_date: u32 },
}

/// Start of the period containing `now`, at local midnight in `now`'s zone.
///
/// - Daily: `now` truncated to midnight.
/// - Weekly: the most recent occurrence of the anchor weekday at or before
///   `now` (today counts if today is the anchor), at midnight.
/// - Monthly: the anchor day-of-month in the current month, or in the
///   previous month when `now` falls before the anchor day. An anchor day
///   beyond the chosen month's length clamps to that month's last day; the
///   previous-month comparison uses the raw anchor day.
pub fn period_start<Tz: TimeZone>(now: &DateTime<Tz>, rule: PeriodRule) -> DateTime<Tz> {
    let today = now.date_naive();

    let start_date = match rule {
        PeriodRule::Daily => today,
        PeriodRule::Weekly { start_day } => {
            let current = today.weekday().num_days_from_sunday() as i64;
            let mut days_back = current - start_day.index();
            if days_back < 0 {
                days_back += 7;
            }
            today - Duration::days(days_back)
        }
        PeriodRule::Monthly { start_date } => {
            let anchor = start_date.max(1);
            let (year, month) = if (today.day()) < anchor {
                if today.month() == 1 {
                    (today.year() - 1, 12)
                } else {
                    (today.year(), today.month() - 1)
                }
            } else {
                (today.year(), today.month())
            };
            let day = anchor.min(days_in_month(year, month));
            NaiveDate::from_ymd_opt(year, month, day).unwrap_or(today)
        }
    };

    local_midnight(start_date, now)
}

/// Epoch-millisecond form of [`period_start`], the key under which
/// completion records are stored.
pub fn period_start_millis<Tz: TimeZone>(now: &DateTime<Tz>, rule: PeriodRule) -> i64 {
    period_start(now, rule).timestamp_millis()
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Midnight of `date` in `now`'s timezone.
///
/// When a DST transition makes midnight ambiguous the earlier instant
/// wins; when midnight does not exist the first valid instant of the day
/// is used instead.
fn local_midnight<Tz: TimeZone>(date: NaiveDate, now: &DateTime<Tz>) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    match now.timezone().from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => now
            .timezone()
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| now.clone()),
    }
}
