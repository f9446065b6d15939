//! The inventory controller: owns every product and enforces id and stock invariants.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{Product, ProductCategory};
use crate::error::InventoryError;
use crate::framework::ResourceStore;
use crate::product::{ProductAction, ProductActionResult};

/// A search over the inventory.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductQuery {
    /// Exact product id.
    Id(String),
    /// Case-insensitive substring of the product name.
    NameContains(String),
    /// Every product of one category.
    Category(ProductCategory),
}

impl ProductQuery {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductQuery::Id(id) => product.id() == id,
            ProductQuery::NameContains(needle) => product
                .name()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            ProductQuery::Category(category) => product.category() == *category,
        }
    }
}

/// Single mutable aggregate of products keyed by id, listed in insertion order.
///
/// Every mutating call either succeeds completely or returns an error with the collection
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    products: ResourceStore<Product>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an inventory from products, rejecting repeated ids.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Result<Self, InventoryError> {
        let mut inventory = Self::new();
        for product in products {
            inventory.add(product)?;
        }
        Ok(inventory)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.products.contains(&product_id.to_string())
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.get(&product_id.to_string())
    }

    #[instrument(fields(product_id = %product.id(), category = %product.category()), skip(self, product))]
    pub fn add(&mut self, product: Product) -> Result<(), InventoryError> {
        debug!("Processing add request");
        match self.products.insert(product) {
            Ok(()) => {
                info!(product_count = self.products.len(), "Product added");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Product rejected");
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub fn remove(&mut self, product_id: &str) -> Result<Product, InventoryError> {
        debug!("Processing remove request");
        let removed = self.products.remove(&product_id.to_string())?;
        info!(product_count = self.products.len(), "Product removed");
        Ok(removed)
    }

    /// Sells `quantity` units and returns the remaining stock.
    #[instrument(skip(self))]
    pub fn sell(&mut self, product_id: &str, quantity: u32) -> Result<u32, InventoryError> {
        debug!("Processing sell request");
        match self.perform(product_id, ProductAction::Sell(quantity)) {
            Ok(result) => {
                info!(remaining_stock = result.stock_level(), "Stock sold");
                Ok(result.stock_level())
            }
            Err(e) => {
                error!(error = %e, "Sale rejected");
                Err(e)
            }
        }
    }

    /// Like [`Inventory::sell`], but refuses groceries that have expired as of `reference_date`.
    #[instrument(skip(self))]
    pub fn sell_as_of(
        &mut self,
        product_id: &str,
        quantity: u32,
        reference_date: NaiveDate,
    ) -> Result<u32, InventoryError> {
        let product = self
            .get(product_id)
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.to_string()))?;
        if let Some(expiry_date) = product.expiry_date().filter(|_| product.is_expired(reference_date)) {
            warn!(%expiry_date, "Refusing to sell expired product");
            return Err(InventoryError::ExpiredProduct {
                product_id: product_id.to_string(),
                expiry_date,
            });
        }
        self.sell(product_id, quantity)
    }

    /// Adds `amount` units and returns the new stock level.
    #[instrument(skip(self))]
    pub fn restock(&mut self, product_id: &str, amount: u32) -> Result<u32, InventoryError> {
        debug!("Processing restock request");
        let result = self.perform(product_id, ProductAction::Restock(amount))?;
        info!(stock_level = result.stock_level(), "Stock replenished");
        Ok(result.stock_level())
    }

    pub fn check_stock(&self, product_id: &str) -> Result<u32, InventoryError> {
        self.get(product_id)
            .map(Product::quantity_in_stock)
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.to_string()))
    }

    fn perform(&mut self, product_id: &str, action: ProductAction) -> Result<ProductActionResult, InventoryError> {
        self.products.perform_action(&product_id.to_string(), action)
    }

    /// Lazily yields the products matching `query`, in insertion order.
    ///
    /// Each call starts a fresh pass, so the result can be re-created as often as needed.
    pub fn search<'a>(&'a self, query: &'a ProductQuery) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |product| query.matches(product))
    }

    /// Every product, in insertion order.
    pub fn list_all(&self) -> impl Iterator<Item = &Product> + '_ {
        self.products.iter()
    }

    pub fn total_inventory_value(&self) -> f64 {
        self.products.iter().map(Product::total_value).sum()
    }

    /// Removes every grocery that expired before `reference_date` and returns their ids.
    #[instrument(skip(self))]
    pub fn purge_expired(&mut self, reference_date: NaiveDate) -> BTreeSet<String> {
        let removed: BTreeSet<String> = self
            .products
            .extract_if(|product| product.is_expired(reference_date))
            .into_iter()
            .map(|product| product.id().to_string())
            .collect();
        if removed.is_empty() {
            debug!("No expired products");
        } else {
            info!(removed = removed.len(), "Expired products purged");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Inventory {
        Inventory::from_products([
            Product::electronics("E1", "Phone", 500.0, 10, 2, "Acme").unwrap(),
            Product::grocery("G1", "Milk", 2.0, 5, date(2024, 1, 1)).unwrap(),
            Product::grocery("G2", "Almond Milk", 3.0, 4, date(2030, 6, 1)).unwrap(),
            Product::clothing("C1", "Silk Shirt", 40.0, 3, "M", "Silk").unwrap(),
        ])
        .unwrap()
    }

    fn ids<'a>(products: impl Iterator<Item = &'a Product>) -> Vec<&'a str> {
        products.map(Product::id).collect()
    }

    #[test]
    fn test_duplicate_add_keeps_one_copy() {
        let mut inventory = Inventory::new();
        inventory
            .add(Product::electronics("E1", "Phone", 500.0, 10, 2, "Acme").unwrap())
            .unwrap();
        let err = inventory
            .add(Product::clothing("E1", "Scarf", 5.0, 1, "S", "Wool").unwrap())
            .unwrap_err();
        assert!(matches!(err, InventoryError::DuplicateProduct(id) if id == "E1"));
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.get("E1").unwrap().name(), "Phone");
    }

    #[test]
    fn test_remove_returns_record() {
        let mut inventory = sample();
        let removed = inventory.remove("G1").unwrap();
        assert_eq!(removed.name(), "Milk");
        assert!(!inventory.contains("G1"));
        assert!(matches!(
            inventory.remove("G1"),
            Err(InventoryError::ProductNotFound(id)) if id == "G1"
        ));
        assert_eq!(inventory.len(), 3);
    }

    #[test]
    fn test_sell_and_restock_through_lookup() {
        let mut inventory = sample();
        assert_eq!(inventory.sell("E1", 3).unwrap(), 7);
        assert_eq!(inventory.restock("E1", 2).unwrap(), 9);
        assert_eq!(inventory.check_stock("E1").unwrap(), 9);
        assert!(matches!(inventory.check_stock("nope"), Err(InventoryError::ProductNotFound(_))));
        assert!(matches!(inventory.sell("nope", 1), Err(InventoryError::ProductNotFound(_))));
        assert!(matches!(inventory.restock("nope", 1), Err(InventoryError::ProductNotFound(_))));
        assert!(matches!(inventory.restock("E1", 0), Err(InventoryError::Validation(_))));
    }

    #[test]
    fn test_oversell_leaves_stock_unchanged() {
        let mut inventory = sample();
        let err = inventory.sell("C1", 4).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InsufficientStock { requested: 4, available: 3, .. }
        ));
        assert_eq!(inventory.get("C1").unwrap().quantity_in_stock(), 3);
    }

    #[test]
    fn test_sell_until_empty() {
        let mut inventory = sample();
        for expected in (0..4).rev() {
            assert_eq!(inventory.sell("G2", 1).unwrap(), expected);
        }
        assert!(matches!(inventory.sell("G2", 1), Err(InventoryError::InsufficientStock { .. })));
    }

    #[test]
    fn test_sell_as_of_refuses_expired_groceries() {
        let mut inventory = sample();
        let err = inventory.sell_as_of("G1", 1, date(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, InventoryError::ExpiredProduct { product_id, .. } if product_id == "G1"));
        assert_eq!(inventory.get("G1").unwrap().quantity_in_stock(), 5);
        assert_eq!(inventory.sell_as_of("G1", 1, date(2024, 1, 1)).unwrap(), 4);
        assert_eq!(inventory.sell_as_of("E1", 1, date(2999, 1, 1)).unwrap(), 9);
    }

    #[test]
    fn test_search_queries() {
        let inventory = sample();
        let by_name = ProductQuery::NameContains("MILK".to_string());
        assert_eq!(ids(inventory.search(&by_name)), vec!["G1", "G2"]);
        // Fresh pass every call.
        assert_eq!(inventory.search(&by_name).count(), 2);

        let by_id = ProductQuery::Id("C1".to_string());
        assert_eq!(ids(inventory.search(&by_id)), vec!["C1"]);
        assert_eq!(inventory.search(&ProductQuery::Id("c1".to_string())).count(), 0);

        let by_type = ProductQuery::Category(ProductCategory::Grocery);
        assert_eq!(ids(inventory.search(&by_type)), vec!["G1", "G2"]);
        assert_eq!(inventory.len(), 4);
    }

    #[test]
    fn test_total_value() {
        assert_eq!(Inventory::new().total_inventory_value(), 0.0);
        assert_eq!(sample().total_inventory_value(), 5000.0 + 10.0 + 12.0 + 120.0);
    }

    #[test]
    fn test_purge_expired_only_touches_expired_groceries() {
        let mut inventory = sample();
        let removed = inventory.purge_expired(date(2025, 1, 1));
        assert_eq!(removed.into_iter().collect::<Vec<_>>(), vec!["G1".to_string()]);
        assert_eq!(ids(inventory.list_all()), vec!["E1", "G2", "C1"]);

        let removed = inventory.purge_expired(date(2100, 1, 1));
        assert_eq!(removed.len(), 1);
        assert_eq!(ids(inventory.list_all()), vec!["E1", "C1"]);
    }

    #[test]
    fn test_from_products_rejects_duplicates() {
        let result = Inventory::from_products([
            Product::electronics("X", "Phone", 1.0, 1, 1, "Acme").unwrap(),
            Product::electronics("X", "Phone", 1.0, 1, 1, "Acme").unwrap(),
        ]);
        assert!(matches!(result, Err(InventoryError::DuplicateProduct(_))));
    }
}
