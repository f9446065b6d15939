//! One-shot commands that operate on the inventory file without the menu.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::info;

use super::output::{format_money, Output};
use crate::persistence::{self, InventoryDocument};

pub fn list(path: &Path, json: bool, output: &Output) -> Result<()> {
    let inventory = load(path)?;
    if json {
        output
            .json(&InventoryDocument::from(&inventory))
            .context("Failed to encode inventory as JSON")?;
    } else {
        let today = Local::now().date_naive();
        output.header(&format!("{} product(s) in {}", inventory.len(), path.display()));
        output.products(inventory.list_all(), |p| p.describe(today));
    }
    Ok(())
}

pub fn value(path: &Path, output: &Output) -> Result<f64> {
    let total = load(path)?.total_inventory_value();
    output.info(&format!("Total Inventory Value: {}", format_money(total)));
    Ok(total)
}

/// Purge expired groceries from the file and return the removed ids.
pub fn purge(path: &Path, as_of: Option<NaiveDate>, dry_run: bool, output: &Output) -> Result<Vec<String>> {
    let reference_date = as_of.unwrap_or_else(|| Local::now().date_naive());
    let mut inventory = load(path)?;
    let removed: Vec<String> = inventory.purge_expired(reference_date).into_iter().collect();

    for id in &removed {
        output.list_item(id);
    }
    if removed.is_empty() {
        output.info(&format!("No groceries expired before {}.", reference_date));
    } else if dry_run {
        output.warn(&format!("Dry run: {} product(s) would be removed.", removed.len()));
    } else {
        persistence::save_to_file(&inventory, path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        info!(removed = removed.len(), "Purged inventory file");
        output.success(&format!("Removed {} expired product(s).", removed.len()));
    }
    Ok(removed)
}

fn load(path: &Path) -> Result<crate::inventory::Inventory> {
    persistence::load_from_file(path).with_context(|| format!("Failed to load {}", path.display()))
}
