//! Configuration management commands.

use clap::Subcommand;
use trackle_core::storage::Config;
use trackle_core::Weekday;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the full configuration
    List,
    /// Get a configuration value
    Get {
        /// Configuration key (e.g. defaults.week_start)
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.week_start)
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match key.as_str() {
                "defaults.week_start" => println!("{}", config.defaults.week_start),
                "defaults.month_start_date" => println!("{}", config.defaults.month_start_date),
                "defaults.history_limit" => println!("{}", config.defaults.history_limit),
                other => return Err(format!("unknown config key: {other}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            match key.as_str() {
                "defaults.week_start" => {
                    config.defaults.week_start = value.parse::<Weekday>()?;
                }
                "defaults.month_start_date" => {
                    let day: u32 = value.parse()?;
                    if !(1..=31).contains(&day) {
                        return Err("month_start_date must be between 1 and 31".into());
                    }
                    config.defaults.month_start_date = day;
                }
                "defaults.history_limit" => {
                    config.defaults.history_limit = value.parse()?;
                }
                other => return Err(format!("unknown config key: {other}").into()),
            }
            config.save()?;
            println!("Config updated");
        }
    }
    Ok(())
}
