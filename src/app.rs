use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        // pages
        .route("/", get(handlers::home_page))
        .route("/menu", get(handlers::menu_page))
        .route("/checkout", get(handlers::checkout_page))
        .route("/orders", get(handlers::orders_page))
        .route("/login", get(handlers::login_page))
        .route("/register", get(handlers::register_page))
        .route("/admin", get(handlers::admin_page))
        // cart
        .route("/api/cart", get(handlers::get_cart))
        .route("/api/cart/add", post(handlers::cart_add))
        .route("/api/cart/quantity", post(handlers::cart_quantity))
        .route("/api/cart/remove", post(handlers::cart_remove))
        // session + auth
        .route("/api/session", get(handlers::api_session))
        .route("/api/login", post(handlers::api_login))
        .route("/api/register", post(handlers::api_register))
        .route("/api/logout", post(handlers::api_logout))
        // catalog, checkout, orders
        .route("/api/products", get(handlers::api_products))
        .route("/api/checkout", post(handlers::api_checkout))
        .route("/api/orders", get(handlers::api_orders))
        .route("/api/reorder", post(handlers::api_reorder))
        // admin
        .route("/api/admin/summary", get(handlers::admin_summary))
        .route(
            "/api/admin/products",
            get(handlers::admin_products).post(handlers::admin_save_product),
        )
        .route("/api/admin/orders", get(handlers::admin_orders))
        .route("/api/admin/users", get(handlers::admin_users))
        .with_state(state)
}
