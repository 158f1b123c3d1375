//! In-memory shopping cart.
//!
//! Line identifiers are unique: adding an existing product merges by summing
//! quantities. The total is derived on every read, never cached, so it
//! cannot drift from the lines. The cart is session-scoped and not persisted
//! across process restarts.

use rust_decimal::Decimal;
use thiserror::Error;

use printastic_core::{Price, ProductId};

/// Errors from cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantities are at least 1; removal is an explicit [`Cart::remove`].
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    UnknownProduct(ProductId),
}

/// One product/quantity pair inside the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub image_url: Option<String>,
}

/// The shopping cart.
#[derive(Debug, Default, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a line to the cart.
    ///
    /// If a line with the same product already exists, its quantity grows by
    /// the incoming quantity instead of duplicating the row.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if the incoming quantity is 0.
    pub fn add(&mut self, line: CartLine) -> Result<(), CartError> {
        if line.quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }

        Ok(())
    }

    /// Remove a line by product id. A no-op if the product is absent.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Replace the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for a quantity of 0, or
    /// [`CartError::UnknownProduct`] if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or(CartError::UnknownProduct(product_id))?;

        line.quantity = quantity;
        Ok(())
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `unit_price * quantity` over all lines, recomputed fresh.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|l| l.unit_price.amount * Decimal::from(l.quantity))
            .sum()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use printastic_core::CurrencyCode;

    fn line(id: i64, cents: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: format!("product {id}"),
            unit_price: Price::from_cents(cents, CurrencyCode::EUR),
            quantity,
            image_url: None,
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add(line(7, 1000, 1)).expect("add");
        cart.add(line(7, 1000, 2)).expect("add");

        assert_eq!(cart.len(), 1);
        let merged = &cart.lines()[0];
        assert_eq!(merged.quantity, 3);
        assert_eq!(cart.total(), Decimal::new(3000, 2));
    }

    #[test]
    fn test_add_rejects_zero_quantity() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(line(1, 500, 0)), Err(CartError::ZeroQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_repeated_adds_sum_quantities() {
        let mut cart = Cart::new();
        for quantity in [1, 4, 2, 3] {
            cart.add(line(9, 250, quantity)).expect("add");
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 10);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(line(1, 500, 1)).expect("add");

        cart.remove(ProductId::new(999));
        assert_eq!(cart.len(), 1);

        cart.remove(ProductId::new(1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add(line(1, 500, 1)).expect("add");

        cart.set_quantity(ProductId::new(1), 5).expect("update");
        assert_eq!(cart.lines()[0].quantity, 5);
        assert_eq!(cart.total(), Decimal::new(2500, 2));
    }

    #[test]
    fn test_set_quantity_rejects_zero() {
        let mut cart = Cart::new();
        cart.add(line(1, 500, 2)).expect("add");

        assert_eq!(
            cart.set_quantity(ProductId::new(1), 0),
            Err(CartError::ZeroQuantity)
        );
        // The line is untouched
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_set_quantity_unknown_product() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.set_quantity(ProductId::new(4), 2),
            Err(CartError::UnknownProduct(ProductId::new(4)))
        );
    }

    #[test]
    fn test_total_recomputed_after_every_mutation() {
        let mut cart = Cart::new();
        assert_eq!(cart.total(), Decimal::ZERO);

        cart.add(line(1, 1000, 2)).expect("add");
        cart.add(line(2, 350, 1)).expect("add");
        assert_eq!(cart.total(), Decimal::new(2350, 2));

        cart.remove(ProductId::new(2));
        assert_eq!(cart.total(), Decimal::new(2000, 2));

        cart.clear();
        assert_eq!(cart.total(), Decimal::ZERO);
        assert!(cart.is_empty());
    }
}
