use crate::cart::MAX_QUANTITY;
use crate::models::{CartLineItem, Order, OrderItem};
use chrono::NaiveDateTime;
use serde::Serialize;

/// The delivery pipeline, in order. `cancelled` sits outside the sequence.
pub const STATUS_SEQUENCE: [&str; 5] =
    ["pending", "confirmed", "preparing", "ready", "delivered"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageState {
    Completed,
    Active,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineStage {
    pub label: &'static str,
    pub state: StageState,
    /// Shown for reached stages only. The backend records a single creation
    /// date, so that is the only timestamp a reached stage can carry.
    pub timestamp: Option<String>,
}

/// Derives the display timeline from the order's current status alone.
/// Earlier stages read as completed, the current one as active, later ones
/// as pending. A cancelled order lights up nothing.
pub fn timeline(order: &Order) -> Vec<TimelineStage> {
    let position = STATUS_SEQUENCE
        .iter()
        .position(|status| order.status.eq_ignore_ascii_case(status));

    STATUS_SEQUENCE
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let state = match position {
                Some(current) if index < current => StageState::Completed,
                Some(current) if index == current => StageState::Active,
                _ => StageState::Pending,
            };
            let timestamp = match state {
                StageState::Pending => None,
                _ => Some(display_date(&order.order_date)),
            };
            TimelineStage {
                label,
                state,
                timestamp,
            }
        })
        .collect()
}

/// Backend dates arrive as `YYYY-MM-DD HH:MM[:SS]`. Unparseable values pass
/// through untouched rather than blanking the page.
pub fn display_date(raw: &str) -> String {
    let trimmed = raw.trim();
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return parsed.format("%b %d, %Y %H:%M").to_string();
        }
    }
    trimmed.to_string()
}

/// Client-side status filter; `all` bypasses filtering.
pub fn filter_by_status(orders: &[Order], status: &str) -> Vec<Order> {
    if status.eq_ignore_ascii_case("all") {
        return orders.to_vec();
    }
    orders
        .iter()
        .filter(|order| order.status.eq_ignore_ascii_case(status))
        .cloned()
        .collect()
}

/// Merges a past order back into the cart. Lines match by product id when the
/// historical item carries one, otherwise by display name (legacy records
/// predate stable ids).
pub fn merge_reorder(cart: &mut Vec<CartLineItem>, order: &Order) {
    for item in &order.items {
        let existing = cart.iter_mut().find(|line| match item.product_id {
            Some(id) => line.product_id == id,
            None => line.product_name == item.product_name,
        });

        match existing {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .saturating_add(item.quantity)
                    .min(MAX_QUANTITY);
            }
            None => cart.push(CartLineItem {
                product_id: item.product_id.unwrap_or_else(|| fallback_id(item)),
                product_name: item.product_name.clone(),
                price: item.unit_price,
                quantity: item.quantity.clamp(1, MAX_QUANTITY),
                category: item.category.clone(),
            }),
        }
    }
}

/// Deterministic stand-in id for legacy items, negative so it can never
/// collide with a real catalog id.
fn fallback_id(item: &OrderItem) -> i64 {
    let folded = item
        .product_name
        .bytes()
        .fold(0i64, |acc, byte| acc.wrapping_mul(31).wrapping_add(i64::from(byte)));
    -(folded.unsigned_abs() as i64).max(1)
}

fn demo_item(product_name: &str, quantity: u32, unit_price: f64, category: &str) -> OrderItem {
    OrderItem {
        product_id: None,
        product_name: product_name.to_string(),
        quantity,
        unit_price,
        category: category.to_string(),
    }
}

/// Shown when the backend cannot serve order history, mirroring the catalog's
/// degraded-mode policy.
pub fn demo_orders() -> Vec<Order> {
    vec![
        Order {
            order_id: 1001,
            order_date: "2024-01-12 14:30:00".to_string(),
            total_amount: 45.97,
            status: "delivered".to_string(),
            delivery_address: "123 Main Street, Penang, Malaysia".to_string(),
            payment_method: "card".to_string(),
            notes: "Please ring the doorbell".to_string(),
            items: vec![
                demo_item("Margherita Pizza", 2, 12.99, "main_course"),
                demo_item("Caesar Salad", 1, 8.99, "appetizer"),
                demo_item("Coke", 2, 2.50, "beverage"),
            ],
        },
        Order {
            order_id: 1002,
            order_date: "2024-01-11 18:45:00".to_string(),
            total_amount: 32.98,
            status: "preparing".to_string(),
            delivery_address: "123 Main Street, Penang, Malaysia".to_string(),
            payment_method: "cash".to_string(),
            notes: String::new(),
            items: vec![
                demo_item("Classic Burger", 2, 10.99, "main_course"),
                demo_item("French Fries", 2, 5.50, "appetizer"),
            ],
        },
        Order {
            order_id: 1003,
            order_date: "2024-01-10 12:15:00".to_string(),
            total_amount: 58.94,
            status: "confirmed".to_string(),
            delivery_address: "123 Main Street, Penang, Malaysia".to_string(),
            payment_method: "online".to_string(),
            notes: "Extra spicy please".to_string(),
            items: vec![
                demo_item("Pad Thai", 3, 12.99, "main_course"),
                demo_item("Spring Rolls", 2, 6.99, "appetizer"),
                demo_item("Thai Iced Tea", 3, 3.99, "beverage"),
            ],
        },
    ]
}
