use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::framework::StoreError;

/// Every failure an inventory operation or the persistence codec can report.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },
    #[error("Cannot sell expired product {product_id} (expired {expiry_date})")]
    ExpiredProduct {
        product_id: String,
        expiry_date: NaiveDate,
    },
    #[error("Malformed record(s): {}", RecordIssues(.0))]
    MalformedRecord(Vec<RecordIssue>),
    #[error("Persistence error for {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: PersistenceError,
    },
}

impl InventoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        InventoryError::Validation(msg.into())
    }

    pub fn persistence(path: impl Into<PathBuf>, source: impl Into<PersistenceError>) -> Self {
        InventoryError::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }
}

impl From<StoreError<String>> for InventoryError {
    fn from(err: StoreError<String>) -> Self {
        match err {
            StoreError::Duplicate(id) => InventoryError::DuplicateProduct(id),
            StoreError::NotFound(id) => InventoryError::ProductNotFound(id),
        }
    }
}

/// Underlying cause of a failed save or load.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected document shape: {0}")]
    Shape(String),
}

/// One record that could not be reconstructed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordIssue {
    /// Position of the record in the document, when it came from a file.
    pub index: Option<usize>,
    pub product_id: Option<String>,
    pub reason: String,
}

impl RecordIssue {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            index: None,
            product_id: None,
            reason: reason.into(),
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn for_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(index) = self.index {
            write!(f, "record #{}", index)?;
        } else {
            write!(f, "record")?;
        }
        if let Some(id) = &self.product_id {
            write!(f, " ({})", id)?;
        }
        write!(f, ": {}", self.reason)
    }
}

struct RecordIssues<'a>(&'a [RecordIssue]);

impl fmt::Display for RecordIssues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_lists_every_issue() {
        let err = InventoryError::MalformedRecord(vec![
            RecordIssue::new("unknown product type `Toy`").at(1),
            RecordIssue::new("duplicate product id").at(3).for_product("E1"),
        ]);
        assert_eq!(
            err.to_string(),
            "Malformed record(s): record #1: unknown product type `Toy`; record #3 (E1): duplicate product id"
        );
    }

    #[test]
    fn test_persistence_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = InventoryError::persistence("/tmp/inv.json", io);
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("gone"));
        assert!(err.to_string().contains("/tmp/inv.json"));
    }

    #[test]
    fn test_store_errors_map_to_domain_errors() {
        let dup: InventoryError = StoreError::Duplicate("E1".to_string()).into();
        assert!(matches!(dup, InventoryError::DuplicateProduct(id) if id == "E1"));
        let missing: InventoryError = StoreError::NotFound("X".to_string()).into();
        assert!(matches!(missing, InventoryError::ProductNotFound(id) if id == "X"));
    }
}
