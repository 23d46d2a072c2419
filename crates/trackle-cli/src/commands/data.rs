//! Snapshot import/export commands.

use std::io::Read;
use std::path::PathBuf;

use clap::Subcommand;
use trackle_core::TrackerService;

#[derive(Subcommand)]
pub enum DataAction {
    /// Print the full store as a JSON document
    Export,
    /// Replace the full store from a JSON document (all-or-nothing)
    Import {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DataAction::Export => {
            let service = TrackerService::open()?;
            println!("{}", service.export_json()?);
        }
        DataAction::Import { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let mut service = TrackerService::open()?;
            if !service.import_json(&text) {
                return Err("import failed: invalid document or write failure".into());
            }
            let store = service.store();
            println!(
                "Imported {} goals, {} measurements",
                store.goals.len(),
                store.measurements.len()
            );
        }
    }
    Ok(())
}
