//! Shopping cart store.
//!
//! The cart lives on the client and reaches the server only as JSON at checkout,
//! so this module is pure data manipulation. Lines are keyed by
//! `(service_id, color)`; adding an existing key merges quantities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartKey {
    pub service_id: Uuid,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub service_id: Uuid,
    pub color: String,
    pub quantity: u32,
    pub price: Decimal,
    /// Checked for checkout
    #[serde(default)]
    pub selected: bool,
}

impl CartLine {
    pub fn new(service_id: Uuid, color: impl Into<String>, quantity: u32, price: Decimal) -> Self {
        Self {
            service_id,
            color: color.into(),
            quantity,
            price,
            selected: false,
        }
    }

    pub fn key(&self) -> CartKey {
        CartKey {
            service_id: self.service_id,
            color: self.color.clone(),
        }
    }

    fn matches(&self, key: &CartKey) -> bool {
        self.service_id == key.service_id && self.color == key.color
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    lines: Vec<CartLine>,
}

fn line_missing() -> ServiceError {
    ServiceError::NotFound("Item is not in the cart".to_string())
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds a line, merging into an existing line with the same key.
    pub fn add(&mut self, line: CartLine) -> Result<(), ServiceError> {
        if line.quantity < 1 {
            return Err(ServiceError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }
        let key = line.key();
        match self.lines.iter_mut().find(|l| l.matches(&key)) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                existing.price = line.price;
            }
            None => self.lines.push(line),
        }
        Ok(())
    }

    pub fn remove(&mut self, key: &CartKey) -> Result<CartLine, ServiceError> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.matches(key))
            .ok_or_else(line_missing)?;
        Ok(self.lines.remove(idx))
    }

    pub fn update_quantity(&mut self, key: &CartKey, quantity: u32) -> Result<(), ServiceError> {
        if quantity < 1 {
            return Err(ServiceError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.matches(key))
            .ok_or_else(line_missing)?;
        line.quantity = quantity;
        Ok(())
    }

    pub fn set_selected(&mut self, key: &CartKey, selected: bool) -> Result<(), ServiceError> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.matches(key))
            .ok_or_else(line_missing)?;
        line.selected = selected;
        Ok(())
    }

    pub fn select_all(&mut self, selected: bool) {
        for line in &mut self.lines {
            line.selected = selected;
        }
    }

    pub fn selected_items(&self) -> Vec<&CartLine> {
        self.lines.iter().filter(|l| l.selected).collect()
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn selected_total(&self) -> Decimal {
        self.selected_items().into_iter().map(CartLine::line_total).sum()
    }

    /// Drops the selected lines, used once checkout succeeds.
    pub fn clear_selected(&mut self) {
        self.lines.retain(|l| !l.selected);
    }

    pub fn to_json(&self) -> Result<String, ServiceError> {
        serde_json::to_string(self)
            .map_err(|e| ServiceError::InternalError(format!("Failed to serialize cart: {}", e)))
    }

    pub fn from_json(raw: &str) -> Result<Self, ServiceError> {
        let mut parsed: Cart = serde_json::from_str(raw)
            .map_err(|e| ServiceError::ValidationError(format!("Invalid cart data: {}", e)))?;
        // Stored carts may predate merging; fold duplicates back together.
        let lines = std::mem::take(&mut parsed.lines);
        for line in lines.into_iter().filter(|l| l.quantity >= 1) {
            let selected = line.selected;
            let key = line.key();
            parsed.add(line)?;
            if selected {
                parsed.set_selected(&key, true)?;
            }
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn key(id: Uuid, color: &str) -> CartKey {
        CartKey {
            service_id: id,
            color: color.to_string(),
        }
    }

    #[test]
    fn adding_same_key_twice_merges() {
        let a = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add(CartLine::new(a, "red", 1, dec!(100))).unwrap();
        cart.add(CartLine::new(a, "red", 1, dec!(100))).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total(), dec!(200));
    }

    #[test]
    fn colors_are_separate_lines() {
        let a = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add(CartLine::new(a, "red", 1, dec!(100))).unwrap();
        cart.add(CartLine::new(a, "black", 3, dec!(100))).unwrap();
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.total(), dec!(400));
    }

    #[test]
    fn quantity_must_stay_positive() {
        let a = Uuid::new_v4();
        let mut cart = Cart::new();
        assert_matches!(
            cart.add(CartLine::new(a, "red", 0, dec!(5))),
            Err(ServiceError::ValidationError(_))
        );
        cart.add(CartLine::new(a, "red", 2, dec!(5))).unwrap();
        assert_matches!(
            cart.update_quantity(&key(a, "red"), 0),
            Err(ServiceError::ValidationError(_))
        );
        cart.update_quantity(&key(a, "red"), 7).unwrap();
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn remove_and_missing_lines() {
        let a = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add(CartLine::new(a, "red", 1, dec!(5))).unwrap();
        cart.remove(&key(a, "red")).unwrap();
        assert!(cart.is_empty());
        assert_matches!(cart.remove(&key(a, "red")), Err(ServiceError::NotFound(_)));
    }

    #[test]
    fn selection_feeds_checkout_subset() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new();
        cart.add(CartLine::new(a, "red", 2, dec!(10))).unwrap();
        cart.add(CartLine::new(b, "clear", 1, dec!(50))).unwrap();
        cart.set_selected(&key(b, "clear"), true).unwrap();

        let selected = cart.selected_items();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].service_id, b);
        assert_eq!(cart.selected_total(), dec!(50));

        cart.clear_selected();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].service_id, a);
    }

    #[test]
    fn json_boundary_folds_duplicates() {
        let a = Uuid::new_v4();
        let raw = format!(
            r#"{{"lines":[
                {{"service_id":"{a}","color":"red","quantity":1,"price":"10"}},
                {{"service_id":"{a}","color":"red","quantity":2,"price":"10","selected":true}}
            ]}}"#
        );
        let cart = Cart::from_json(&raw).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert!(cart.lines()[0].selected);

        let again = Cart::from_json(&cart.to_json().unwrap()).unwrap();
        assert_eq!(again, cart);
    }

    #[test]
    fn garbage_json_is_a_validation_error() {
        assert_matches!(Cart::from_json("not json"), Err(ServiceError::ValidationError(_)));
    }
}
