//! Aggregated statistics commands.

use clap::Subcommand;
use trackle_core::TrackerService;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Per-tag rollup across all goal trackers
    Tags,
    /// Streaks and completion rate for one goal
    Goal {
        /// Goal ID
        id: String,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = TrackerService::open()?;

    match action {
        StatsAction::Tags => {
            let rollup = service.stats_by_tag();
            println!("{}", serde_json::to_string_pretty(&rollup)?);
        }
        StatsAction::Goal { id } => {
            let stats = service
                .goal_stats(&id)
                .ok_or_else(|| format!("goal '{id}' not found"))?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
