use crate::models::{AdminSummary, Order, Product, SessionUser};

/// Case-insensitive substring match over username and email.
pub fn search_users(users: &[SessionUser], term: &str) -> Vec<SessionUser> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return users.to_vec();
    }
    users
        .iter()
        .filter(|user| {
            user.username.to_lowercase().contains(&term)
                || user.email.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

/// Dashboard headline numbers; revenue is the sum over every order.
pub fn summary(products: &[Product], orders: &[Order], users: &[SessionUser]) -> AdminSummary {
    AdminSummary {
        total_products: products.len(),
        total_orders: orders.len(),
        total_users: users.len(),
        revenue: orders.iter().map(|order| order.total_amount).sum(),
    }
}
