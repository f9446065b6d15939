//! # Inventory Tracker
//!
//! A single-process inventory of electronics, groceries and clothing, persisted to a JSON
//! file.
//!
//! - **Domain types** - validated products and their tagged record form → [`domain::Product`], [`domain::ProductRecord`]
//! - **Store** - insertion-ordered keyed collection over an [`framework::Entity`] → [`framework::ResourceStore`]
//! - **Controller** - id and stock invariants, search, expiry purge → [`inventory::Inventory`]
//! - **Persistence** - atomic save, all-or-nothing load → [`persistence::save_to_file`], [`persistence::load_from_file`]
//! - **Front end** - interactive menu and one-shot commands → [`shell`]
//!
//! ## Example Usage
//!
//! ```no_run
//! use inventory_tracker::domain::Product;
//! use inventory_tracker::inventory::Inventory;
//! use inventory_tracker::persistence;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut inventory = Inventory::new();
//! inventory.add(Product::electronics("E1", "Phone", 500.0, 10, 2, "Acme")?)?;
//! inventory.sell("E1", 3)?;
//! persistence::save_to_file(&inventory, "inventory.json")?;
//! let reloaded = persistence::load_from_file("inventory.json")?;
//! assert_eq!(reloaded.get("E1").map(|p| p.quantity_in_stock()), Some(7));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod framework;
pub mod inventory;
pub mod persistence;
pub mod product;
pub mod shell;
pub mod telemetry;


pub use error::InventoryError;
