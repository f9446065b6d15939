/// Custom actions for Product entities.
///
/// These are the stock-changing operations the inventory dispatches to a single
/// product through the store.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Removes units from stock.
    ///
    /// # Errors
    /// Fails when the quantity is zero or exceeds available stock.
    Sell(u32),
    /// Adds units to stock.
    ///
    /// # Errors
    /// Fails when the amount is zero.
    Restock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    /// Stock remaining after the sale
    Sell(u32),
    /// Stock after restocking
    Restock(u32),
}

impl ProductActionResult {
    /// The stock level each action reports.
    pub fn stock_level(&self) -> u32 {
        match self {
            ProductActionResult::Sell(level)
            | ProductActionResult::Restock(level) => *level,
        }
    }
}
