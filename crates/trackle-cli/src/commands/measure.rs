//! Measurement tracker commands for CLI.

use clap::Subcommand;
use trackle_core::{NewMeasurement, TrackerService};

use super::parse_date_ms;

#[derive(Subcommand)]
pub enum MeasureAction {
    /// Create a new measurement tracker
    Add {
        /// Display name
        name: String,
        /// Display unit
        #[arg(long, default_value = "kg")]
        unit: String,
    },
    /// List measurement trackers
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get measurement tracker details
    Get {
        /// Tracker ID
        id: String,
    },
    /// Record a reading
    Log {
        /// Tracker ID
        id: String,
        /// Reading value
        value: f64,
        /// Reading date (epoch millis, YYYY-MM-DD or RFC 3339);
        /// defaults to now, past dates backfill
        #[arg(long)]
        date: Option<String>,
    },
    /// Trend between the two most recent readings
    Trend {
        /// Tracker ID
        id: String,
    },
    /// Readings at or after a cutoff date, sorted by date
    History {
        /// Tracker ID
        id: String,
        /// Cutoff date; defaults to the beginning of time
        #[arg(long)]
        since: Option<String>,
    },
    /// Delete a measurement tracker
    Delete {
        /// Tracker ID
        id: String,
    },
    /// Move a measurement tracker to a new display position
    Reorder {
        /// Current index
        from: usize,
        /// Target index
        to: usize,
    },
}

pub fn run(action: MeasureAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut service = TrackerService::open()?;

    match action {
        MeasureAction::Add { name, unit } => {
            let tracker = service.add_measurement(NewMeasurement { name, unit })?;
            println!("Measurement tracker created: {}", tracker.id);
        }
        MeasureAction::List { json } => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&service.store().measurements)?
                );
            } else {
                for tracker in &service.store().measurements {
                    let latest = tracker
                        .latest_entry()
                        .map(|e| format!("{} {}", e.value, tracker.unit))
                        .unwrap_or_else(|| "no entries".into());
                    println!("{}  {}  {}", tracker.id, tracker.name, latest);
                }
            }
        }
        MeasureAction::Get { id } => {
            let tracker = service.measurement(&id).ok_or_else(|| not_found(&id))?;
            println!("{}", serde_json::to_string_pretty(tracker)?);
        }
        MeasureAction::Log { id, value, date } => {
            let date_ms = date.as_deref().map(parse_date_ms).transpose()?;
            if !service.add_measurement_entry(&id, value, date_ms)? {
                return Err(not_found(&id).into());
            }
            println!("Entry recorded");
        }
        MeasureAction::Trend { id } => {
            service.measurement(&id).ok_or_else(|| not_found(&id))?;
            match service.measurement_trend(&id) {
                Some(trend) => println!("{}", serde_json::to_string_pretty(&trend)?),
                None => println!("no entries"),
            }
        }
        MeasureAction::History { id, since } => {
            let cutoff = since.as_deref().map(parse_date_ms).transpose()?.unwrap_or(0);
            let entries = service
                .measurement_entries_since(&id, cutoff)
                .ok_or_else(|| not_found(&id))?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        MeasureAction::Delete { id } => {
            if !service.delete_tracker(&id)? {
                return Err(not_found(&id).into());
            }
            println!("Measurement tracker deleted: {id}");
        }
        MeasureAction::Reorder { from, to } => {
            service.reorder_measurements(from, to)?;
            println!("Measurement trackers reordered");
        }
    }
    Ok(())
}

fn not_found(id: &str) -> String {
    format!("measurement tracker '{id}' not found")
}
