//! The command-line front end: an interactive menu plus a few one-shot commands.

pub mod commands;
pub mod menu;
pub mod output;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Command, Config};
use crate::inventory::Inventory;
use crate::persistence;
pub use menu::{MenuChoice, Shell};
pub use output::Output;

/// Run the command selected in `config`.
pub fn run(config: &Config, output: Output) -> Result<()> {
    let path = config.data_file.as_path();
    match &config.command {
        Command::Menu => {
            let inventory = if config.load_on_start {
                let inventory = persistence::load_from_file(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?;
                info!(product_count = inventory.len(), "Loaded inventory at startup");
                inventory
            } else {
                Inventory::new()
            };
            Shell::new(inventory, config.data_file.clone(), output).run()
        }
        Command::List { json } => commands::list(path, *json, &output),
        Command::Value => commands::value(path, &output).map(|_| ()),
        Command::Purge { as_of, dry_run } => commands::purge(path, *as_of, *dry_run, &output).map(|_| ()),
    }
}
