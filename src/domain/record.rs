//! Flat, tagged record shape of a [`Product`] as it appears in a saved inventory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::product::{Product, ProductKind};
use crate::error::{InventoryError, RecordIssue};

/// One persisted product. The `type` field selects the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProductRecord {
    Electronics {
        product_id: String,
        name: String,
        price: f64,
        quantity_in_stock: u32,
        warranty_years: u32,
        brand: String,
    },
    Grocery {
        product_id: String,
        name: String,
        price: f64,
        quantity_in_stock: u32,
        expiry_date: NaiveDate,
    },
    Clothing {
        product_id: String,
        name: String,
        price: f64,
        quantity_in_stock: u32,
        size: String,
        material: String,
    },
}

impl ProductRecord {
    pub fn product_id(&self) -> &str {
        match self {
            ProductRecord::Electronics { product_id, .. }
            | ProductRecord::Grocery { product_id, .. }
            | ProductRecord::Clothing { product_id, .. } => product_id,
        }
    }
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        let product_id = product.id().to_string();
        let name = product.name().to_string();
        let price = product.price();
        let quantity_in_stock = product.quantity_in_stock();
        match product.kind().clone() {
            ProductKind::Electronics { warranty_years, brand } => ProductRecord::Electronics {
                product_id,
                name,
                price,
                quantity_in_stock,
                warranty_years,
                brand,
            },
            ProductKind::Grocery { expiry_date } => ProductRecord::Grocery {
                product_id,
                name,
                price,
                quantity_in_stock,
                expiry_date,
            },
            ProductKind::Clothing { size, material } => ProductRecord::Clothing {
                product_id,
                name,
                price,
                quantity_in_stock,
                size,
                material,
            },
        }
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = InventoryError;

    /// Runs the same checks as direct construction.
    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        match record {
            ProductRecord::Electronics {
                product_id,
                name,
                price,
                quantity_in_stock,
                warranty_years,
                brand,
            } => Product::electronics(product_id, name, price, quantity_in_stock, warranty_years, brand),
            ProductRecord::Grocery {
                product_id,
                name,
                price,
                quantity_in_stock,
                expiry_date,
            } => Product::grocery(product_id, name, price, quantity_in_stock, expiry_date),
            ProductRecord::Clothing {
                product_id,
                name,
                price,
                quantity_in_stock,
                size,
                material,
            } => Product::clothing(product_id, name, price, quantity_in_stock, size, material),
        }
    }
}

impl Product {
    /// Flat JSON object holding every field plus the `type` discriminator.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(ProductRecord::from(self))
    }

    /// Strict inverse of [`Product::to_value`].
    ///
    /// # Errors
    /// `MalformedRecord` with a single issue when the discriminator is unknown, a field is
    /// missing or has the wrong shape, or a field value fails validation.
    pub fn from_value(value: Value) -> Result<Self, InventoryError> {
        decode(value).map_err(|issue| InventoryError::MalformedRecord(vec![issue]))
    }
}

/// Decode one JSON value into a product, describing what went wrong otherwise.
pub(crate) fn decode(value: Value) -> Result<Product, RecordIssue> {
    let claimed_id = value
        .get("product_id")
        .and_then(Value::as_str)
        .map(str::to_string);
    let attach_id = |issue: RecordIssue| match &claimed_id {
        Some(id) => issue.for_product(id.clone()),
        None => issue,
    };

    if !value.is_object() {
        return Err(attach_id(RecordIssue::new("record is not a JSON object")));
    }
    let record: ProductRecord =
        serde_json::from_value(value).map_err(|e| attach_id(RecordIssue::new(e.to_string())))?;
    Product::try_from(record).map_err(|e| attach_id(RecordIssue::new(e.to_string())))
}
