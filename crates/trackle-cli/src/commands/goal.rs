//! Goal tracker commands for CLI.

use clap::Subcommand;
use trackle_core::storage::Config;
use trackle_core::{GoalUpdate, NewGoal, Period, TrackerService, Weekday};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a new goal tracker
    Add {
        /// Display name
        name: String,
        /// Grouping tag
        #[arg(long, default_value = "General")]
        tag: String,
        /// Display color for the tag
        #[arg(long, default_value = "#60a5fa")]
        tag_color: String,
        /// Target count per period
        #[arg(long, default_value = "1")]
        frequency: u32,
        /// Cadence: daily, weekly or monthly
        #[arg(long, default_value = "daily")]
        period: Period,
        /// Weekday starting a weekly period (defaults from config)
        #[arg(long)]
        start_day: Option<Weekday>,
        /// Day-of-month starting a monthly period (defaults from config)
        #[arg(long)]
        start_date: Option<u32>,
    },
    /// List goal trackers
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get goal details
    Get {
        /// Goal ID
        id: String,
    },
    /// Update a goal tracker
    Update {
        /// Goal ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New tag
        #[arg(long)]
        tag: Option<String>,
        /// New tag color
        #[arg(long)]
        tag_color: Option<String>,
        /// New target count per period
        #[arg(long)]
        frequency: Option<u32>,
        /// New cadence
        #[arg(long)]
        period: Option<Period>,
        /// New weekly anchor weekday
        #[arg(long)]
        start_day: Option<Weekday>,
        /// New monthly anchor day
        #[arg(long)]
        start_date: Option<u32>,
    },
    /// Delete a goal tracker
    Delete {
        /// Goal ID
        id: String,
    },
    /// Mark one completion in the current period
    Log {
        /// Goal ID
        id: String,
    },
    /// Undo one completion in the current period
    Undo {
        /// Goal ID
        id: String,
    },
    /// Current-period progress
    Progress {
        /// Goal ID
        id: String,
    },
    /// Recent period history
    History {
        /// Goal ID
        id: String,
        /// Number of periods (defaults from config)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Move a goal to a new display position
    Reorder {
        /// Current index
        from: usize,
        /// Target index
        to: usize,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut service = TrackerService::open()?;

    match action {
        GoalAction::Add {
            name,
            tag,
            tag_color,
            frequency,
            period,
            start_day,
            start_date,
        } => {
            let config = Config::load()?;
            let start_date = match period {
                Period::Monthly => {
                    Some(start_date.unwrap_or(config.defaults.month_start_date))
                }
                _ => start_date,
            };
            let goal = service.add_goal(NewGoal {
                name,
                tag,
                tag_color,
                frequency,
                period,
                start_day: start_day.unwrap_or(config.defaults.week_start),
                start_date,
            })?;
            println!("Goal created: {}", goal.id);
        }
        GoalAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&service.store().goals)?);
            } else {
                for goal in &service.store().goals {
                    let progress = service
                        .progress(&goal.id)
                        .map(|p| format!("{}/{}", p.count, p.frequency))
                        .unwrap_or_default();
                    println!(
                        "{}  {}  [{}]  {} this {}",
                        goal.id,
                        goal.name,
                        goal.tag,
                        progress,
                        goal.period.unit_name()
                    );
                }
            }
        }
        GoalAction::Get { id } => {
            let goal = service.goal(&id).ok_or_else(|| not_found(&id))?;
            println!("{}", serde_json::to_string_pretty(goal)?);
        }
        GoalAction::Update {
            id,
            name,
            tag,
            tag_color,
            frequency,
            period,
            start_day,
            start_date,
        } => {
            let updated = service.update_goal(
                &id,
                GoalUpdate {
                    name,
                    tag,
                    tag_color,
                    frequency,
                    period,
                    start_day,
                    start_date,
                },
            )?;
            if !updated {
                return Err(not_found(&id).into());
            }
            println!("Goal updated: {id}");
        }
        GoalAction::Delete { id } => {
            if !service.delete_tracker(&id)? {
                return Err(not_found(&id).into());
            }
            println!("Goal deleted: {id}");
        }
        GoalAction::Log { id } => {
            if !service.increment_goal(&id)? {
                return Err(not_found(&id).into());
            }
            let progress = service.progress(&id).ok_or_else(|| not_found(&id))?;
            println!("{}/{}", progress.count, progress.frequency);
        }
        GoalAction::Undo { id } => {
            if !service.decrement_goal(&id)? {
                return Err(not_found(&id).into());
            }
            let progress = service.progress(&id).ok_or_else(|| not_found(&id))?;
            println!("{}/{}", progress.count, progress.frequency);
        }
        GoalAction::Progress { id } => {
            let progress = service.progress(&id).ok_or_else(|| not_found(&id))?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        GoalAction::History { id, limit } => {
            let limit = match limit {
                Some(limit) => limit,
                None => Config::load()?.defaults.history_limit,
            };
            let history = service
                .goal_history(&id, Some(limit))
                .ok_or_else(|| not_found(&id))?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        GoalAction::Reorder { from, to } => {
            service.reorder_goals(from, to)?;
            println!("Goals reordered");
        }
    }
    Ok(())
}

fn not_found(id: &str) -> String {
    format!("goal '{id}' not found")
}
