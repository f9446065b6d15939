//! JSON persistence for an [`Inventory`].
//!
//! The document is `{ "products": [ {record}, ... ] }`. Saving goes through a temporary
//! file in the destination directory that is renamed into place, so `path` only ever holds
//! a complete document. Loading is all-or-nothing.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, instrument};

use crate::domain::record::decode;
use crate::domain::{Product, ProductRecord};
use crate::error::{InventoryError, PersistenceError, RecordIssue};
use crate::inventory::Inventory;

/// The saved document: every product record in listing order.
#[derive(Debug, Serialize)]
pub struct InventoryDocument {
    products: Vec<ProductRecord>,
}

impl From<&Inventory> for InventoryDocument {
    fn from(inventory: &Inventory) -> Self {
        Self {
            products: inventory.list_all().map(ProductRecord::from).collect(),
        }
    }
}

/// Write every product of `inventory`, in listing order, to `path`.
#[instrument(skip(inventory, path), fields(path = %path.as_ref().display(), product_count = inventory.len()))]
pub fn save_to_file(inventory: &Inventory, path: impl AsRef<Path>) -> Result<(), InventoryError> {
    let path = path.as_ref();
    let document = InventoryDocument::from(inventory);
    let bytes = serde_json::to_vec_pretty(&document).map_err(|e| InventoryError::persistence(path, e))?;

    write_atomically(path, &bytes).map_err(|e| {
        error!(error = %e, "Save failed");
        InventoryError::persistence(path, e)
    })?;
    info!("Inventory saved");
    Ok(())
}

fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read a fresh inventory from `path`.
///
/// # Errors
/// - `Persistence` when the file cannot be read, is not JSON, or is not a product document.
/// - `MalformedRecord` listing every record that cannot be reconstructed and every repeated
///   product id, each with its index in the document.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Inventory, InventoryError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        error!(error = %e, "Load failed");
        InventoryError::persistence(path, e)
    })?;
    let document: Value = serde_json::from_str(&text).map_err(|e| {
        error!(error = %e, "Inventory file is not valid JSON");
        InventoryError::persistence(path, e)
    })?;
    let records = product_values(document).map_err(|e| InventoryError::persistence(path, e))?;
    debug!(record_count = records.len(), "Decoding records");

    let products = decode_all(records)?;
    let inventory = Inventory::from_products(products)?;
    info!(product_count = inventory.len(), "Inventory loaded");
    Ok(inventory)
}

/// Accepts the `{ "products": [...] }` document and the older bare array.
fn product_values(document: Value) -> Result<Vec<Value>, PersistenceError> {
    match document {
        Value::Array(records) => Ok(records),
        Value::Object(mut fields) => match fields.remove("products") {
            Some(Value::Array(records)) => Ok(records),
            Some(other) => Err(PersistenceError::Shape(format!(
                "`products` must be an array, found {}",
                json_kind(&other)
            ))),
            None => Err(PersistenceError::Shape("missing `products` array".to_string())),
        },
        other => Err(PersistenceError::Shape(format!(
            "expected an object with a `products` array, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn decode_all(records: Vec<Value>) -> Result<Vec<Product>, InventoryError> {
    let mut seen = HashSet::new();
    let mut products = Vec::with_capacity(records.len());
    let mut issues = Vec::new();

    for (index, value) in records.into_iter().enumerate() {
        match decode(value) {
            Ok(product) => {
                if seen.insert(product.id().to_string()) {
                    products.push(product);
                } else {
                    issues.push(
                        RecordIssue::new("duplicate product id")
                            .at(index)
                            .for_product(product.id()),
                    );
                }
            }
            Err(issue) => issues.push(issue.at(index)),
        }
    }

    if issues.is_empty() {
        Ok(products)
    } else {
        error!(issue_count = issues.len(), "Inventory file has malformed records");
        Err(InventoryError::MalformedRecord(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_json(path: &Path, value: &Value) {
        fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    #[test]
    fn test_round_trip_preserves_variants_and_fields() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("inventory.json");
        let inventory = Inventory::from_products([
            Product::clothing("C1", "Shirt", 15.25, 3, "L", "Cotton")?,
            Product::electronics("E1", "Phone", 499.99, 10, 2, "Acme")?,
            Product::grocery("G1", "Milk", 2.0, 0, date(2024, 1, 1))?,
        ])?;

        save_to_file(&inventory, &path)?;
        let loaded = load_from_file(&path)?;

        let original: Vec<&Product> = inventory.list_all().collect();
        let reloaded: Vec<&Product> = loaded.list_all().collect();
        assert_eq!(original, reloaded);
        Ok(())
    }

    #[test]
    fn test_round_trip_keeps_prices_bit_exact() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("inventory.json");
        let prices = [0.1 + 0.2, 123456789.12345679, 1.0 / 3.0, 2.2250738585072014e-308, 9007199254740993.0];
        let products = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| Product::electronics(format!("E{}", i), "Cable", price, 1, 1, "Acme"))
            .collect::<Result<Vec<_>, _>>()?;
        let inventory = Inventory::from_products(products)?;

        save_to_file(&inventory, &path)?;
        let loaded = load_from_file(&path)?;

        for (i, &price) in prices.iter().enumerate() {
            let reloaded = loaded.get(&format!("E{}", i)).map(|p| p.price().to_bits());
            assert_eq!(reloaded, Some(price.to_bits()), "price {} changed", price);
        }
        Ok(())
    }

    #[test]
    fn test_saved_document_shape() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("inventory.json");
        let inventory = Inventory::from_products([Product::electronics("E1", "Phone", 500.0, 10, 2, "Acme")?])?;
        save_to_file(&inventory, &path)?;

        let document: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(
            document,
            json!({ "products": [{
                "type": "Electronics", "product_id": "E1", "name": "Phone",
                "price": 500.0, "quantity_in_stock": 10, "warranty_years": 2, "brand": "Acme"
            }]})
        );
        // Only the target file is left behind.
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_save_overwrites_existing_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("inventory.json");
        fs::write(&path, "stale")?;
        save_to_file(&Inventory::new(), &path)?;
        assert!(load_from_file(&path)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("inventory.json");
        let err = save_to_file(&Inventory::new(), &path).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::Persistence { source: PersistenceError::Io(_), .. }
        ));
    }

    #[test]
    fn test_missing_file_and_invalid_json_are_persistence_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            load_from_file(&missing),
            Err(InventoryError::Persistence { source: PersistenceError::Io(_), .. })
        ));

        let garbage = dir.path().join("garbage.json");
        fs::write(&garbage, "{ not json").unwrap();
        assert!(matches!(
            load_from_file(&garbage),
            Err(InventoryError::Persistence { source: PersistenceError::Json(_), .. })
        ));

        let scalar = dir.path().join("scalar.json");
        fs::write(&scalar, "42").unwrap();
        assert!(matches!(
            load_from_file(&scalar),
            Err(InventoryError::Persistence { source: PersistenceError::Shape(_), .. })
        ));
    }

    #[test]
    fn test_object_without_products_array_is_a_shape_error() {
        let dir = tempdir().unwrap();
        for (name, document) in [
            ("renamed.json", json!({ "items": [] })),
            ("empty.json", json!({})),
            ("scalar_products.json", json!({ "products": 3 })),
        ] {
            let path = dir.path().join(name);
            write_json(&path, &document);
            assert!(
                matches!(
                    load_from_file(&path),
                    Err(InventoryError::Persistence { source: PersistenceError::Shape(_), .. })
                ),
                "{} was not rejected as a shape error",
                document
            );
        }
    }

    #[test]
    fn test_unknown_type_reports_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        write_json(
            &path,
            &json!({ "products": [
                { "type": "Clothing", "product_id": "C1", "name": "Shirt", "price": 1.0,
                  "quantity_in_stock": 1, "size": "M", "material": "Wool" },
                { "type": "Toy", "product_id": "T1", "name": "Ball", "price": 1.0,
                  "quantity_in_stock": 1 }
            ]}),
        );
        match load_from_file(&path) {
            Err(InventoryError::MalformedRecord(issues)) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].index, Some(1));
                assert_eq!(issues[0].product_id.as_deref(), Some("T1"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_in_file_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        let record = json!({ "type": "Grocery", "product_id": "G1", "name": "Milk",
                             "price": 2.0, "quantity_in_stock": 5, "expiry_date": "2024-01-01" });
        write_json(&path, &json!({ "products": [record.clone(), record] }));
        match load_from_file(&path) {
            Err(InventoryError::MalformedRecord(issues)) => {
                assert_eq!(issues, vec![RecordIssue::new("duplicate product id").at(1).for_product("G1")]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_every_bad_record_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        write_json(
            &path,
            &json!({ "products": [
                { "type": "Electronics", "product_id": "E1", "name": "Phone", "price": 1.0,
                  "quantity_in_stock": 1, "warranty_years": 1 },
                "not a record",
                { "type": "Electronics", "product_id": "E2", "name": "Tablet", "price": 1.0,
                  "quantity_in_stock": 1, "warranty_years": 1, "brand": "Acme" }
            ]}),
        );
        match load_from_file(&path) {
            Err(InventoryError::MalformedRecord(issues)) => {
                let indexes: Vec<Option<usize>> = issues.iter().map(|i| i.index).collect();
                assert_eq!(indexes, vec![Some(0), Some(1)]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_bare_array_documents_still_load() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("legacy.json");
        write_json(
            &path,
            &json!([{ "type": "Clothing", "product_id": "C1", "name": "Shirt", "price": 9.5,
                      "quantity_in_stock": 2, "size": "S", "material": "Cotton" }]),
        );
        let inventory = load_from_file(&path)?;
        assert_eq!(inventory.get("C1").map(Product::quantity_in_stock), Some(2));
        Ok(())
    }
}
