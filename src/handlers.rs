use crate::cart::{self, QuantityOutcome};
use crate::errors::AppError;
use crate::models::{
    AddToCartRequest, AdminProductRequest, CartLineItem, CartResponse, CatalogQuery,
    CheckoutRequest, CheckoutResponse, LoginRequest, Order, OrderDraft, OrderDraftItem,
    OrdersQuery, ProductView, ProductsResponse, QuantityRequest, RegisterRequest,
    RemoveItemRequest, ReorderRequest, SessionResponse, UserSearchQuery,
};
use crate::orders::TimelineStage;
use crate::state::AppState;
use crate::{admin, auth, catalog, orders, session, storage, ui};
use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

// ---- pages ----

pub async fn home_page() -> Html<String> {
    Html(ui::render_home())
}

pub async fn menu_page() -> Html<String> {
    Html(ui::render_menu())
}

pub async fn checkout_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match session::current_user(&state, &headers).await {
        Some(_) => Html(ui::render_checkout()).into_response(),
        None => Redirect::to(&session::login_redirect("checkout")).into_response(),
    }
}

pub async fn orders_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match session::current_user(&state, &headers).await {
        Some(_) => Html(ui::render_orders()).into_response(),
        None => Redirect::to(&session::login_redirect("orders")).into_response(),
    }
}

pub async fn login_page(headers: HeaderMap) -> Html<String> {
    let remembered = session::cookie_value(&headers, session::REMEMBER_COOKIE);
    Html(ui::render_login(remembered.as_deref()))
}

pub async fn register_page() -> Html<String> {
    Html(ui::render_register())
}

pub async fn admin_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match session::current_user(&state, &headers).await {
        Some(user) if user.is_admin() => Html(ui::render_admin()).into_response(),
        _ => Redirect::to(&session::login_redirect("admin")).into_response(),
    }
}

// ---- cart plumbing ----

struct CartHandle {
    key: String,
    /// `Set-Cookie` value when this browser had no cart id yet.
    minted: Option<String>,
}

fn cart_handle(headers: &HeaderMap) -> CartHandle {
    match session::cookie_value(headers, session::CART_COOKIE) {
        Some(key) => CartHandle { key, minted: None },
        None => {
            let key = session::mint_cart_id();
            let cookie = format!("{}={key}; Path=/", session::CART_COOKIE);
            CartHandle {
                key,
                minted: Some(cookie),
            }
        }
    }
}

fn with_cookies(mut response: Response, cookies: impl IntoIterator<Item = String>) -> Response {
    for cookie in cookies {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

fn cart_response(items: Vec<CartLineItem>, notice: Option<String>) -> CartResponse {
    CartResponse {
        success: true,
        item_count: cart::item_count(&items),
        totals: cart::totals(&items, cart::DELIVERY_FEE),
        items,
        notice,
    }
}

/// Locks the book, applies the mutation, and persists before the lock is
/// released, so no stale snapshot can ever be written back.
async fn mutate_cart<F>(
    state: &AppState,
    key: &str,
    mutate: F,
) -> Result<(Vec<CartLineItem>, Option<String>), AppError>
where
    F: FnOnce(&mut Vec<CartLineItem>) -> Option<String>,
{
    let mut book = state.carts.lock().await;
    let (snapshot, notice) = {
        let items = book.carts.entry(key.to_string()).or_default();
        let notice = mutate(items);
        (items.clone(), notice)
    };
    storage::persist_carts(&state.cart_path, &book).await?;
    Ok((snapshot, notice))
}

fn refused(message: impl Into<String>) -> Response {
    Json(json!({ "success": false, "message": message.into() })).into_response()
}

// ---- cart API ----

pub async fn get_cart(State(state): State<AppState>, headers: HeaderMap) -> Json<CartResponse> {
    let items = match session::cookie_value(&headers, session::CART_COOKIE) {
        Some(key) => state
            .carts
            .lock()
            .await
            .carts
            .get(&key)
            .cloned()
            .unwrap_or_default(),
        None => Vec::new(),
    };
    Json(cart_response(items, None))
}

pub async fn cart_add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AddToCartRequest>,
) -> Result<Response, AppError> {
    let products = load_catalog(&state, &headers).await.0;

    let Some(product) = catalog::find_product(&products, request.product_id) else {
        return Ok(refused("Product not found"));
    };
    if !product.is_available() || !product.is_in_stock() {
        return Ok(refused("Sorry, this item is out of stock"));
    }

    let line = CartLineItem {
        product_id: product.product_id,
        product_name: product.product_name.clone(),
        price: product.price,
        quantity: request.quantity,
        category: product.category.clone(),
    };
    let notice = format!("{} added to cart!", product.product_name);

    let handle = cart_handle(&headers);
    let (items, _) = mutate_cart(&state, &handle.key, move |items| {
        cart::add_or_increment(items, line);
        None
    })
    .await?;

    let body = Json(cart_response(items, Some(notice))).into_response();
    Ok(with_cookies(body, handle.minted))
}

pub async fn cart_quantity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<QuantityRequest>,
) -> Result<Response, AppError> {
    let handle = cart_handle(&headers);
    let (items, notice) = mutate_cart(&state, &handle.key, move |items| {
        match cart::change_quantity(items, request.product_id, request.delta) {
            QuantityOutcome::Removed(_) => Some("Item removed from cart".to_string()),
            QuantityOutcome::ClampedMax => Some("Maximum quantity reached".to_string()),
            QuantityOutcome::Updated(_) | QuantityOutcome::Missing => None,
        }
    })
    .await?;

    let body = Json(cart_response(items, notice)).into_response();
    Ok(with_cookies(body, handle.minted))
}

pub async fn cart_remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RemoveItemRequest>,
) -> Result<Response, AppError> {
    let handle = cart_handle(&headers);
    let (items, notice) = mutate_cart(&state, &handle.key, move |items| {
        cart::remove_item(items, request.product_id)
            .map(|name| format!("{name} removed from cart"))
    })
    .await?;

    let body = Json(cart_response(items, notice)).into_response();
    Ok(with_cookies(body, handle.minted))
}

// ---- session + auth API ----

pub async fn api_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    let user = session::current_user(&state, &headers).await;
    Json(SessionResponse {
        success: user.is_some(),
        logged_in: user.is_some(),
        user,
    })
}

pub async fn api_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Response {
    if let Err(message) = auth::validate_login(&request) {
        return refused(message);
    }

    let reply = match state
        .backend
        .login(request.username.trim(), &request.password)
        .await
    {
        Ok(reply) => reply,
        Err(err) => {
            warn!("login call failed: {}", err.message);
            return refused("Login failed. Please try again.");
        }
    };

    let role = reply
        .body
        .role
        .clone()
        .or_else(|| reply.body.user.as_ref().map(|user| user.role.clone()));

    let mut cookies = reply.set_cookies;
    if reply.body.success {
        if request.remember {
            cookies.push(format!(
                "{}={}; Path=/",
                session::REMEMBER_COOKIE,
                request.username.trim()
            ));
        } else {
            cookies.push(format!("{}=; Path=/; Max-Age=0", session::REMEMBER_COOKIE));
        }
    }

    let redirect = reply.body.success.then(|| {
        if role.as_deref() == Some("admin") {
            "/admin"
        } else {
            "/"
        }
    });
    let body = Json(json!({
        "success": reply.body.success,
        "message": reply.body.message,
        "role": role,
        "redirect": redirect,
    }))
    .into_response();
    with_cookies(body, cookies)
}

pub async fn api_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Response {
    let form = match auth::validate_registration(&request) {
        Ok(form) => form,
        Err(message) => return refused(message),
    };

    let fields = [
        ("username", form.username.as_str()),
        ("password", form.password.as_str()),
        ("email", form.email.as_str()),
        ("fullName", form.full_name.as_str()),
        ("phone", form.phone.as_str()),
    ];
    let reply = match state.backend.register(&fields).await {
        Ok(reply) => reply,
        Err(err) => {
            warn!("register call failed: {}", err.message);
            return refused("Registration failed. Please try again.");
        }
    };

    let body = Json(json!({
        "success": reply.body.success,
        "message": reply.body.message,
    }))
    .into_response();
    with_cookies(body, reply.set_cookies)
}

pub async fn api_logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    // Logout failure must never trap the user; the page navigates to /login
    // whatever happens here.
    let cookies = match state
        .backend
        .logout(session::forwarded_cookies(&headers))
        .await
    {
        Ok(reply) => reply.set_cookies,
        Err(err) => {
            warn!("logout call failed: {}", err.message);
            Vec::new()
        }
    };
    with_cookies(Json(json!({ "success": true })).into_response(), cookies)
}

// ---- catalog ----

async fn load_catalog(state: &AppState, headers: &HeaderMap) -> (Vec<crate::models::Product>, bool) {
    match state
        .backend
        .list_products(session::forwarded_cookies(headers))
        .await
    {
        Ok(products) => (products, false),
        Err(err) => {
            warn!("product list unavailable, serving demo menu: {}", err.message);
            (catalog::demo_products(), true)
        }
    }
}

pub async fn api_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CatalogQuery>,
) -> Json<ProductsResponse> {
    let (all, fallback) = load_catalog(&state, &headers).await;
    let view = catalog::apply_view(
        &all,
        query.category.as_deref(),
        query.search.as_deref(),
        query.sort.as_deref(),
    );
    Json(ProductsResponse {
        success: true,
        products: view.into_iter().map(ProductView::from).collect(),
        fallback,
    })
}

// ---- checkout ----

pub async fn api_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CheckoutRequest>,
) -> Result<Response, AppError> {
    session::require_user(&state, &headers).await?;

    if request.delivery_address.trim().is_empty() || request.payment_method.trim().is_empty() {
        return Ok(refused("Delivery address and payment method are required"));
    }

    let key = session::cookie_value(&headers, session::CART_COOKIE);
    let snapshot = match &key {
        Some(key) => state
            .carts
            .lock()
            .await
            .carts
            .get(key)
            .cloned()
            .unwrap_or_default(),
        None => Vec::new(),
    };
    if snapshot.is_empty() {
        return Ok(refused("Your cart is empty!"));
    }

    let totals = cart::totals(&snapshot, cart::DELIVERY_FEE);
    let draft = OrderDraft {
        delivery_address: request.delivery_address.trim().to_string(),
        payment_method: request.payment_method.clone(),
        total_amount: totals.total,
        notes: request.notes.trim().to_string(),
        items: snapshot
            .iter()
            .map(|item| OrderDraftItem {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.price,
            })
            .collect(),
    };

    let reply = match state
        .backend
        .create_order(session::forwarded_cookies(&headers), &draft)
        .await
    {
        Ok(reply) => reply,
        Err(err) => {
            warn!("order submission failed: {}", err.message);
            return Ok(refused("Failed to place order. Please try again."));
        }
    };

    if !reply.success {
        // The cart stays intact so the user can retry.
        let message = reply
            .message
            .unwrap_or_else(|| "Failed to place order. Please try again.".to_string());
        return Ok(refused(message));
    }

    if let Some(key) = key {
        let mut book = state.carts.lock().await;
        book.carts.remove(&key);
        storage::persist_carts(&state.cart_path, &book).await?;
    }

    Ok(Json(CheckoutResponse {
        success: true,
        order_id: reply.order_id,
        message: Some("Order placed successfully!".to_string()),
    })
    .into_response())
}

// ---- orders ----

#[derive(Debug, Serialize)]
struct OrderView {
    #[serde(flatten)]
    order: Order,
    timeline: Vec<TimelineStage>,
}

async fn load_orders(state: &AppState, headers: &HeaderMap) -> (Vec<Order>, bool) {
    match state
        .backend
        .list_my_orders(session::forwarded_cookies(headers))
        .await
    {
        Ok(orders) => (orders, false),
        Err(err) => {
            warn!("order list unavailable, serving demo orders: {}", err.message);
            (orders::demo_orders(), true)
        }
    }
}

pub async fn api_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OrdersQuery>,
) -> Result<Response, AppError> {
    session::require_user(&state, &headers).await?;

    let (all, fallback) = load_orders(&state, &headers).await;
    let filtered = orders::filter_by_status(&all, query.status.as_deref().unwrap_or("all"));
    let views: Vec<OrderView> = filtered
        .into_iter()
        .map(|mut order| {
            let timeline = orders::timeline(&order);
            order.order_date = orders::display_date(&order.order_date);
            OrderView { order, timeline }
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "orders": views,
        "fallback": fallback,
    }))
    .into_response())
}

pub async fn api_reorder(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ReorderRequest>,
) -> Result<Response, AppError> {
    session::require_user(&state, &headers).await?;

    let (all, _) = load_orders(&state, &headers).await;
    let Some(order) = all.into_iter().find(|o| o.order_id == request.order_id) else {
        return Ok(refused("Order not found"));
    };

    let handle = cart_handle(&headers);
    let (items, _) = mutate_cart(&state, &handle.key, move |items| {
        orders::merge_reorder(items, &order);
        None
    })
    .await?;

    let body = Json(cart_response(items, Some("Items added to cart!".to_string()))).into_response();
    Ok(with_cookies(body, handle.minted))
}

// ---- admin ----

pub async fn admin_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    session::require_admin(&state, &headers).await?;
    let cookie = session::forwarded_cookies(&headers);

    let products = state.backend.list_products(cookie).await?;
    let all_orders = state.backend.list_all_orders(cookie).await?;
    let users = state.backend.list_users(cookie).await?;

    Ok(Json(json!({
        "success": true,
        "summary": admin::summary(&products, &all_orders, &users),
    }))
    .into_response())
}

pub async fn admin_products(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    session::require_admin(&state, &headers).await?;
    let products = state
        .backend
        .list_products(session::forwarded_cookies(&headers))
        .await?;

    Ok(Json(json!({
        "success": true,
        "products": products
            .into_iter()
            .map(ProductView::from)
            .collect::<Vec<_>>(),
    }))
    .into_response())
}

pub async fn admin_save_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AdminProductRequest>,
) -> Result<Response, AppError> {
    session::require_admin(&state, &headers).await?;

    if !matches!(request.action.as_str(), "add" | "update" | "delete") {
        return Ok(refused("Unknown product action"));
    }

    let mut fields = vec![
        ("action", request.action.clone()),
        ("name", request.name.clone()),
        ("category", request.category.clone()),
        ("price", format!("{:.2}", request.price)),
        ("stock", request.stock.to_string()),
        ("description", request.description.clone()),
        ("status", request.status.clone()),
    ];
    if let Some(id) = request.product_id {
        fields.push(("productId", id.to_string()));
    }

    let reply = state
        .backend
        .save_product(session::forwarded_cookies(&headers), &fields)
        .await?;

    Ok(Json(json!({
        "success": reply.success,
        "message": reply.message,
    }))
    .into_response())
}

pub async fn admin_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OrdersQuery>,
) -> Result<Response, AppError> {
    session::require_admin(&state, &headers).await?;
    let all = state
        .backend
        .list_all_orders(session::forwarded_cookies(&headers))
        .await?;
    let mut filtered = orders::filter_by_status(&all, query.status.as_deref().unwrap_or("all"));
    for order in &mut filtered {
        order.order_date = orders::display_date(&order.order_date);
    }

    Ok(Json(json!({ "success": true, "orders": filtered })).into_response())
}

pub async fn admin_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UserSearchQuery>,
) -> Result<Response, AppError> {
    session::require_admin(&state, &headers).await?;
    let users = state
        .backend
        .list_users(session::forwarded_cookies(&headers))
        .await?;
    let filtered = admin::search_users(&users, query.search.as_deref().unwrap_or(""));

    Ok(Json(json!({ "success": true, "users": filtered })).into_response())
}
