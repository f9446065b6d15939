//! Command-line configuration.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

pub const DEFAULT_DATA_FILE: &str = "inventory.json";

/// Inventory tracker - manage electronics, groceries and clothing stock
#[derive(Debug, Parser)]
#[command(name = "inventory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Inventory file used by save/load and the one-shot commands
    #[arg(short, long, global = true, default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Load the inventory file before showing the menu
    #[arg(long)]
    pub load: bool,

    /// Tracing filter directive, e.g. `info` or `inventory=debug`
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Enable debug logging (same as `--log-level debug`)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Interactive menu (the default)
    Menu,
    /// Print every product in the inventory file
    List {
        /// Print the saved records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the total value of the inventory file
    Value,
    /// Remove expired groceries from the inventory file
    Purge {
        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Report what would be removed without saving
        #[arg(long)]
        dry_run: bool,
    },
}

/// Resolved settings the rest of the program runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_file: PathBuf,
    pub load_on_start: bool,
    pub log_directive: String,
    pub command: Command,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let log_directive = if cli.verbose {
            "debug".to_string()
        } else {
            cli.log_level
        };
        Self {
            data_file: cli.file,
            load_on_start: cli.load,
            log_directive,
            command: cli.command.unwrap_or(Command::Menu),
        }
    }
}

impl Config {
    pub fn from_args() -> Self {
        Cli::parse().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Cli::try_parse_from(args).unwrap().into()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["inventory"]);
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert!(!config.load_on_start);
        assert_eq!(config.log_directive, "warn");
        assert_eq!(config.command, Command::Menu);
    }

    #[test]
    fn test_verbose_overrides_log_level() {
        let config = parse(&["inventory", "--log-level", "info", "-v"]);
        assert_eq!(config.log_directive, "debug");
    }

    #[test]
    fn test_purge_arguments() {
        let config = parse(&["inventory", "purge", "--as-of", "2025-01-01", "--dry-run", "-f", "stock.json"]);
        assert_eq!(config.data_file, PathBuf::from("stock.json"));
        assert_eq!(
            config.command,
            Command::Purge {
                as_of: NaiveDate::from_ymd_opt(2025, 1, 1),
                dry_run: true,
            }
        );
    }

    #[test]
    fn test_rejects_bad_dates() {
        assert!(Cli::try_parse_from(["inventory", "purge", "--as-of", "tomorrow"]).is_err());
    }
}
