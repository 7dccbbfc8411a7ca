use crate::models::{CartLineItem, CartTotals};

pub const MAX_QUANTITY: u32 = 99;
pub const DELIVERY_FEE: f64 = 5.00;

/// What happened to a line after a quantity adjustment.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantityOutcome {
    Updated(u32),
    /// The quantity dropped to zero or below; carries the removed display name.
    Removed(String),
    /// The quantity was capped at [`MAX_QUANTITY`].
    ClampedMax,
    Missing,
}

/// Adds a line to the cart, or bumps the quantity of an existing line with
/// the same product id. Quantities never leave 1..=MAX_QUANTITY.
pub fn add_or_increment(items: &mut Vec<CartLineItem>, mut line: CartLineItem) {
    if let Some(existing) = items
        .iter_mut()
        .find(|item| item.product_id == line.product_id)
    {
        existing.quantity = existing
            .quantity
            .saturating_add(line.quantity)
            .min(MAX_QUANTITY);
        return;
    }

    line.quantity = line.quantity.clamp(1, MAX_QUANTITY);
    items.push(line);
}

/// Applies `delta` to the named line. A result at or below zero removes the
/// line entirely; a result above the cap clamps and reports it. Unknown
/// product ids are a no-op.
pub fn change_quantity(
    items: &mut Vec<CartLineItem>,
    product_id: i64,
    delta: i64,
) -> QuantityOutcome {
    let Some(index) = items.iter().position(|item| item.product_id == product_id) else {
        return QuantityOutcome::Missing;
    };

    let next = i64::from(items[index].quantity) + delta;
    if next <= 0 {
        let removed = items.remove(index);
        return QuantityOutcome::Removed(removed.product_name);
    }

    if next > i64::from(MAX_QUANTITY) {
        items[index].quantity = MAX_QUANTITY;
        return QuantityOutcome::ClampedMax;
    }

    items[index].quantity = next as u32;
    QuantityOutcome::Updated(items[index].quantity)
}

/// Removes the line outright, returning its display name if it existed.
pub fn remove_item(items: &mut Vec<CartLineItem>, product_id: i64) -> Option<String> {
    let index = items.iter().position(|item| item.product_id == product_id)?;
    Some(items.remove(index).product_name)
}

pub fn totals(items: &[CartLineItem], delivery_fee: f64) -> CartTotals {
    let subtotal = items
        .iter()
        .map(|item| item.price * f64::from(item.quantity))
        .sum();
    CartTotals {
        subtotal,
        delivery_fee,
        total: subtotal + delivery_fee,
    }
}

pub fn item_count(items: &[CartLineItem]) -> u32 {
    items.iter().map(|item| item.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, price: f64, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id,
            product_name: format!("Item {product_id}"),
            price,
            quantity,
            category: "main_course".to_string(),
        }
    }

    #[test]
    fn repeated_adds_keep_a_single_line_per_product() {
        let mut cart = Vec::new();
        add_or_increment(&mut cart, line(1, 10.0, 2));
        add_or_increment(&mut cart, line(1, 10.0, 3));
        add_or_increment(&mut cart, line(2, 4.5, 1));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart[0].quantity, 5);
        assert_eq!(totals(&cart, 0.0).subtotal, 54.5);
    }

    #[test]
    fn add_clamps_at_maximum() {
        let mut cart = vec![line(1, 10.0, 97)];
        add_or_increment(&mut cart, line(1, 10.0, 10));
        assert_eq!(cart[0].quantity, MAX_QUANTITY);
    }

    #[test]
    fn new_line_with_zero_quantity_becomes_one() {
        let mut cart = Vec::new();
        add_or_increment(&mut cart, line(7, 3.0, 0));
        assert_eq!(cart[0].quantity, 1);
    }

    #[test]
    fn decrement_to_zero_removes_the_line() {
        let mut cart = vec![line(1, 10.0, 1), line(2, 5.0, 2)];
        let outcome = change_quantity(&mut cart, 1, -1);

        assert_eq!(outcome, QuantityOutcome::Removed("Item 1".to_string()));
        assert_eq!(cart.len(), 1);
        assert!(cart.iter().all(|item| item.product_id != 1));
    }

    #[test]
    fn increment_past_cap_clamps_and_reports() {
        let mut cart = vec![line(1, 10.0, MAX_QUANTITY)];
        let outcome = change_quantity(&mut cart, 1, 1);

        assert_eq!(outcome, QuantityOutcome::ClampedMax);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, MAX_QUANTITY);
    }

    #[test]
    fn change_on_unknown_product_is_a_noop() {
        let mut cart = vec![line(1, 10.0, 2)];
        assert_eq!(change_quantity(&mut cart, 99, 1), QuantityOutcome::Missing);
        assert_eq!(cart[0].quantity, 2);
    }

    #[test]
    fn remove_returns_the_display_name() {
        let mut cart = vec![line(3, 2.0, 1)];
        assert_eq!(remove_item(&mut cart, 3), Some("Item 3".to_string()));
        assert!(cart.is_empty());
        assert_eq!(remove_item(&mut cart, 3), None);
    }

    #[test]
    fn totals_add_the_fee_to_the_subtotal() {
        let cart = vec![line(1, 10.0, 5)];
        let totals = totals(&cart, DELIVERY_FEE);
        assert_eq!(totals.subtotal, 50.0);
        assert_eq!(totals.total, totals.subtotal + DELIVERY_FEE);
    }

    #[test]
    fn item_count_sums_quantities() {
        let cart = vec![line(1, 10.0, 2), line(2, 1.0, 7)];
        assert_eq!(item_count(&cart), 9);
        assert_eq!(item_count(&[]), 0);
    }
}
