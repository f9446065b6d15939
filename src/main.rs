use tracing::info;

use inventory_tracker::config::{Command, Config};
use inventory_tracker::shell::{self, Output};
use inventory_tracker::telemetry::setup_tracing;

fn main() -> anyhow::Result<()> {
    let config = Config::from_args();

    // Setup tracing once for the entire application
    setup_tracing(&config.log_directive);

    info!(data_file = %config.data_file.display(), command = ?config.command, "Starting inventory tracker");

    let output = Output::new(matches!(config.command, Command::List { json: true }));
    if let Err(e) = shell::run(&config, output) {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    info!("Inventory tracker finished");
    Ok(())
}
