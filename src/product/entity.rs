use crate::domain::Product;
use crate::error::InventoryError;
use crate::framework::Entity;
use super::actions::{ProductAction, ProductActionResult};

impl Entity for Product {
    type Id = String;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = InventoryError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Handles product-specific actions.
    ///
    /// # Actions
    /// - `Sell(quantity)`: Decrements stock by `quantity`
    /// - `Restock(amount)`: Increments stock by `amount`
    ///
    /// # Errors
    /// Propagates `InsufficientStock` and `Validation` from the product; stock is unchanged
    /// when an action fails.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, InventoryError> {
        match action {
            ProductAction::Sell(quantity) => self.sell(quantity).map(ProductActionResult::Sell),
            ProductAction::Restock(amount) => self.restock(amount).map(ProductActionResult::Restock),
        }
    }
}
