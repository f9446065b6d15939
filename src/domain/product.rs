use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// The closed set of product categories. The `Display` form is the persisted `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Electronics,
    Grocery,
    Clothing,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 3] = [
        ProductCategory::Electronics,
        ProductCategory::Grocery,
        ProductCategory::Clothing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Electronics => "Electronics",
            ProductCategory::Grocery => "Grocery",
            ProductCategory::Clothing => "Clothing",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ProductCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                InventoryError::validation(format!(
                    "unknown product type `{}` (expected electronics, grocery or clothing)",
                    wanted
                ))
            })
    }
}

/// Category-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductKind {
    Electronics { warranty_years: u32, brand: String },
    Grocery { expiry_date: NaiveDate },
    Clothing { size: String, material: String },
}

impl ProductKind {
    pub fn category(&self) -> ProductCategory {
        match self {
            ProductKind::Electronics { .. } => ProductCategory::Electronics,
            ProductKind::Grocery { .. } => ProductCategory::Grocery,
            ProductKind::Clothing { .. } => ProductCategory::Clothing,
        }
    }
}

/// A product held in the inventory.
///
/// Fields are not public so the construction checks (non-empty name, non-negative finite
/// price) cannot be bypassed. Stock is unsigned and only changes through [`Product::sell`]
/// and [`Product::restock`].
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub(crate) id: String,
    name: String,
    price: f64,
    quantity_in_stock: u32,
    kind: ProductKind,
}

impl Product {
    /// Creates a validated product.
    ///
    /// # Errors
    /// `Validation` when the id or name is blank or the price is negative or not finite.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity_in_stock: u32,
        kind: ProductKind,
    ) -> Result<Self, InventoryError> {
        let id = id.into();
        let name = name.into();
        if id.trim().is_empty() {
            return Err(InventoryError::validation("product id must not be empty"));
        }
        if name.trim().is_empty() {
            return Err(InventoryError::validation(format!("name of {} must not be empty", id)));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(InventoryError::validation(format!(
                "price of {} must be a non-negative number, got {}",
                id, price
            )));
        }
        Ok(Self {
            id,
            name,
            price,
            quantity_in_stock,
            kind,
        })
    }

    pub fn electronics(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity_in_stock: u32,
        warranty_years: u32,
        brand: impl Into<String>,
    ) -> Result<Self, InventoryError> {
        let kind = ProductKind::Electronics {
            warranty_years,
            brand: brand.into(),
        };
        Self::new(id, name, price, quantity_in_stock, kind)
    }

    pub fn grocery(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity_in_stock: u32,
        expiry_date: NaiveDate,
    ) -> Result<Self, InventoryError> {
        Self::new(id, name, price, quantity_in_stock, ProductKind::Grocery { expiry_date })
    }

    pub fn clothing(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity_in_stock: u32,
        size: impl Into<String>,
        material: impl Into<String>,
    ) -> Result<Self, InventoryError> {
        let kind = ProductKind::Clothing {
            size: size.into(),
            material: material.into(),
        };
        Self::new(id, name, price, quantity_in_stock, kind)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity_in_stock(&self) -> u32 {
        self.quantity_in_stock
    }

    pub fn kind(&self) -> &ProductKind {
        &self.kind
    }

    pub fn category(&self) -> ProductCategory {
        self.kind.category()
    }

    pub fn total_value(&self) -> f64 {
        self.price * f64::from(self.quantity_in_stock)
    }

    /// The grocery expiry date, if this is a grocery product.
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        match &self.kind {
            ProductKind::Grocery { expiry_date } => Some(*expiry_date),
            _ => None,
        }
    }

    /// True only for groceries whose expiry date lies strictly before `reference_date`.
    pub fn is_expired(&self, reference_date: NaiveDate) -> bool {
        self.expiry_date()
            .is_some_and(|expiry_date| expiry_date < reference_date)
    }

    /// Removes `quantity` units from stock and returns the remaining stock.
    ///
    /// # Errors
    /// `InsufficientStock` when `quantity` is zero or exceeds the stock on hand.
    /// Stock is untouched on error.
    pub fn sell(&mut self, quantity: u32) -> Result<u32, InventoryError> {
        if quantity == 0 || quantity > self.quantity_in_stock {
            return Err(InventoryError::InsufficientStock {
                product_id: self.id.clone(),
                requested: quantity,
                available: self.quantity_in_stock,
            });
        }
        self.quantity_in_stock -= quantity;
        Ok(self.quantity_in_stock)
    }

    /// Adds `amount` units to stock and returns the new stock level.
    ///
    /// # Errors
    /// `Validation` when `amount` is zero or the stock would overflow.
    pub fn restock(&mut self, amount: u32) -> Result<u32, InventoryError> {
        if amount == 0 {
            return Err(InventoryError::validation(format!(
                "restock amount for {} must be positive",
                self.id
            )));
        }
        self.quantity_in_stock = self.quantity_in_stock.checked_add(amount).ok_or_else(|| {
            InventoryError::validation(format!("restocking {} by {} overflows stock", self.id, amount))
        })?;
        Ok(self.quantity_in_stock)
    }

    /// Description including whether a grocery has expired as of `reference_date`.
    pub fn describe(&self, reference_date: NaiveDate) -> String {
        match self.kind {
            ProductKind::Grocery { .. } => {
                let status = if self.is_expired(reference_date) { "Expired" } else { "Valid" };
                format!("{} ({})", self, status)
            }
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Price: ${:.2}, Stock: {}",
            self.id, self.name, self.price, self.quantity_in_stock
        )?;
        match &self.kind {
            ProductKind::Electronics { warranty_years, brand } => {
                write!(f, ", Brand: {}, Warranty: {} yrs", brand, warranty_years)
            }
            ProductKind::Grocery { expiry_date } => write!(f, ", Expiry: {}", expiry_date),
            ProductKind::Clothing { size, material } => {
                write!(f, ", Size: {}, Material: {}", size, material)
            }
        }
    }
}
