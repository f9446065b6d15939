//! Interactive menu loop.
//!
//! The menu only prompts, calls the [`Inventory`] and prints the outcome. Domain errors are
//! shown and the loop continues; terminal errors end the session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use tracing::{debug, info, instrument};

use super::output::{format_money, Output};
use crate::domain::{Product, ProductCategory, ProductKind};
use crate::error::InventoryError;
use crate::inventory::{Inventory, ProductQuery};
use crate::persistence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddProduct,
    SellProduct,
    RestockProduct,
    RemoveProduct,
    ListAll,
    SearchByName,
    SearchByType,
    PurgeExpired,
    TotalValue,
    Save,
    Load,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 12] = [
        MenuChoice::AddProduct,
        MenuChoice::SellProduct,
        MenuChoice::RestockProduct,
        MenuChoice::RemoveProduct,
        MenuChoice::ListAll,
        MenuChoice::SearchByName,
        MenuChoice::SearchByType,
        MenuChoice::PurgeExpired,
        MenuChoice::TotalValue,
        MenuChoice::Save,
        MenuChoice::Load,
        MenuChoice::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::AddProduct => "Add product",
            MenuChoice::SellProduct => "Sell product",
            MenuChoice::RestockProduct => "Restock product",
            MenuChoice::RemoveProduct => "Remove product",
            MenuChoice::ListAll => "List all products",
            MenuChoice::SearchByName => "Search by name",
            MenuChoice::SearchByType => "Search by type",
            MenuChoice::PurgeExpired => "Remove expired groceries",
            MenuChoice::TotalValue => "Show total inventory value",
            MenuChoice::Save => "Save inventory",
            MenuChoice::Load => "Load inventory",
            MenuChoice::Exit => "Exit",
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct Shell {
    inventory: Inventory,
    data_file: PathBuf,
    output: Output,
    theme: ColorfulTheme,
}

impl Shell {
    pub fn new(inventory: Inventory, data_file: PathBuf, output: Output) -> Self {
        Self {
            inventory,
            data_file,
            output,
            theme: ColorfulTheme::default(),
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Replace the in-memory inventory with the contents of `path`.
    ///
    /// The current inventory is kept when the file cannot be loaded in full.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn load(&mut self, path: &Path) -> Result<usize, InventoryError> {
        self.inventory = persistence::load_from_file(path)?;
        Ok(self.inventory.len())
    }

    #[instrument(name = "menu", skip(self))]
    pub fn run(&mut self) -> Result<()> {
        info!("Menu starting");
        loop {
            self.output.header("Inventory Management");
            let choice = self.prompt_choice()?;
            debug!(?choice, "Menu choice");
            if choice == MenuChoice::Exit {
                self.output.info("Exiting...");
                break;
            }
            if let Err(e) = self.dispatch(choice) {
                match e.downcast_ref::<InventoryError>() {
                    Some(err) => self.output.error(&err.to_string()),
                    None => return Err(e),
                }
            }
        }
        info!("Menu stopped");
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::AddProduct => self.add_product(),
            MenuChoice::SellProduct => self.sell_product(),
            MenuChoice::RestockProduct => self.restock_product(),
            MenuChoice::RemoveProduct => self.remove_product(),
            MenuChoice::ListAll => {
                let date = today();
                self.output
                    .products(self.inventory.list_all(), |p| p.describe(date));
                Ok(())
            }
            MenuChoice::SearchByName => {
                let needle = self.text("Search name")?;
                self.show_search(ProductQuery::NameContains(needle));
                Ok(())
            }
            MenuChoice::SearchByType => {
                let category = self.prompt_category("Type to search")?;
                self.show_search(ProductQuery::Category(category));
                Ok(())
            }
            MenuChoice::PurgeExpired => {
                let removed = self.inventory.purge_expired(today());
                if removed.is_empty() {
                    self.output.info("No expired groceries.");
                } else {
                    for id in &removed {
                        self.output.list_item(id);
                    }
                    self.output
                        .success(&format!("Removed {} expired grocery product(s).", removed.len()));
                }
                Ok(())
            }
            MenuChoice::TotalValue => {
                let total = self.inventory.total_inventory_value();
                self.output
                    .info(&format!("Total Inventory Value: {}", format_money(total)));
                Ok(())
            }
            MenuChoice::Save => {
                let path = self.prompt_path("Filename to save")?;
                persistence::save_to_file(&self.inventory, &path)?;
                self.output.success(&format!("Saved to {}.", path.display()));
                Ok(())
            }
            MenuChoice::Load => {
                let path = self.prompt_path("Filename to load")?;
                let count = self.load(&path)?;
                self.output
                    .success(&format!("Loaded {} product(s) from {}.", count, path.display()));
                Ok(())
            }
            MenuChoice::Exit => Ok(()),
        }
    }

    fn add_product(&mut self) -> Result<()> {
        let category = self.prompt_category("Product type")?;
        let id = self.text("Product ID")?;
        let name = self.text("Name")?;
        let price: f64 = self.parsed("Price")?;
        let stock: u32 = self.parsed("Quantity in stock")?;
        let kind = match category {
            ProductCategory::Electronics => {
                let brand = self.text("Brand")?;
                let warranty_years = self.parsed("Warranty (years)")?;
                ProductKind::Electronics { warranty_years, brand }
            }
            ProductCategory::Grocery => {
                let expiry_date = self.parsed("Expiry date (YYYY-MM-DD)")?;
                ProductKind::Grocery { expiry_date }
            }
            ProductCategory::Clothing => {
                let size = self.text("Size")?;
                let material = self.text("Material")?;
                ProductKind::Clothing { size, material }
            }
        };
        self.inventory.add(Product::new(id, name, price, stock, kind)?)?;
        self.output.success("Product added successfully.");
        Ok(())
    }

    fn sell_product(&mut self) -> Result<()> {
        let id = self.text("Product ID")?;
        let available = self.inventory.check_stock(&id)?;
        self.output.info(&format!("In stock: {}", available));
        let quantity = self.parsed("Quantity to sell")?;
        let remaining = self.inventory.sell_as_of(&id, quantity, today())?;
        self.output
            .success(&format!("Sold successfully. Remaining stock: {}", remaining));
        Ok(())
    }

    fn restock_product(&mut self) -> Result<()> {
        let id = self.text("Product ID")?;
        let amount = self.parsed("Quantity to restock")?;
        let stock = self.inventory.restock(&id, amount)?;
        self.output
            .success(&format!("Restocked successfully. Stock: {}", stock));
        Ok(())
    }

    fn remove_product(&mut self) -> Result<()> {
        let id = self.text("Product ID")?;
        let removed = self.inventory.remove(&id)?;
        self.output.success(&format!("Removed {}", removed));
        Ok(())
    }

    fn show_search(&self, query: ProductQuery) {
        let date = today();
        self.output
            .products(self.inventory.search(&query), |p| p.describe(date));
    }

    // --- Prompts ---

    fn prompt_choice(&self) -> Result<MenuChoice> {
        let labels: Vec<&str> = MenuChoice::ALL.iter().map(MenuChoice::label).collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt("Choose an action")
            .items(&labels)
            .default(0)
            .interact()
            .context("failed to read menu choice")?;
        Ok(MenuChoice::ALL[index])
    }

    fn prompt_category(&self, prompt: &str) -> Result<ProductCategory> {
        let index = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&ProductCategory::ALL)
            .default(0)
            .interact()
            .context("failed to read product type")?;
        Ok(ProductCategory::ALL[index])
    }

    fn prompt_path(&self, prompt: &str) -> Result<PathBuf> {
        let path: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(self.data_file.display().to_string())
            .interact_text()
            .context("failed to read file name")?;
        Ok(PathBuf::from(path))
    }

    fn text(&self, prompt: &str) -> Result<String> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("failed to read {}", prompt))?;
        Ok(value.trim().to_string())
    }

    /// Prompts until the input parses as `T`.
    fn parsed<T>(&self, prompt: &str) -> Result<T>
    where
        T: Clone + ToString + std::str::FromStr,
        T::Err: ToString + std::fmt::Debug,
    {
        Input::<T>::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("failed to read {}", prompt))
    }
}
