use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use once_cell::sync::Lazy;
use reqwest::{redirect, Client};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartItem {
    product_id: i64,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartBody {
    success: bool,
    items: Vec<CartItem>,
    item_count: u32,
    notice: Option<String>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_cart_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("foodhub_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

// ---- stub backend ----
//
// Stands in for the upstream FoodHub backend. A cookie containing
// `session=valid` counts as logged in, `session=admin` as an admin, and an
// order whose delivery address contains "reject" is refused with the exact
// message the pages must surface.

const STUB_USER: &str = r#"{"id":7,"username":"alice","email":"alice@example.com","fullName":"Alice Example","role":"user"}"#;

fn stub_session(headers: &HeaderMap) -> Option<&'static str> {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if cookie.contains("session=admin") {
        Some("admin")
    } else if cookie.contains("session=valid") {
        Some("user")
    } else {
        None
    }
}

async fn stub_login_servlet(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    match params.get("action").map(String::as_str) {
        Some("checkSession") => match stub_session(&headers) {
            Some(role) => {
                let mut user: Value = serde_json::from_str(STUB_USER).unwrap();
                user["role"] = json!(role);
                Json(json!({ "success": true, "loggedIn": true, "user": user }))
            }
            None => Json(json!({ "success": false, "loggedIn": false })),
        },
        Some("logout") => Json(json!({ "success": true })),
        Some("listUsers") => Json(json!({
            "success": true,
            "users": [serde_json::from_str::<Value>(STUB_USER).unwrap()],
        })),
        _ => Json(json!({ "success": false, "message": "unknown action" })),
    }
}

async fn stub_login(Form(fields): Form<HashMap<String, String>>) -> impl IntoResponse {
    let username = fields.get("username").cloned().unwrap_or_default();
    let password = fields.get("password").cloned().unwrap_or_default();
    if username == "alice" && password == "secret123" {
        let mut user: Value = serde_json::from_str(STUB_USER).unwrap();
        user["role"] = json!("user");
        (
            AppendHeaders([(header::SET_COOKIE, "session=valid; Path=/")]),
            Json(json!({ "success": true, "role": "user", "user": user })),
        )
            .into_response()
    } else {
        Json(json!({ "success": false, "message": "Invalid username or password" }))
            .into_response()
    }
}

async fn stub_products(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.get("action").map(String::as_str) != Some("list") {
        return Json(json!({ "success": false, "message": "unknown action" }));
    }
    Json(json!({
        "success": true,
        "products": [
            {
                "productId": 1,
                "productName": "Spring Rolls",
                "description": "Crispy vegetable rolls",
                "price": 5.99,
                "stock": 20,
                "category": "appetizer",
                "status": "available"
            },
            {
                "productId": 2,
                "productName": "Sold Out Soup",
                "description": "Not today",
                "price": 4.50,
                "stock": 0,
                "category": "appetizer",
                "status": "available"
            }
        ]
    }))
}

async fn stub_order_create(headers: HeaderMap, Json(draft): Json<Value>) -> Json<Value> {
    if stub_session(&headers).is_none() {
        return Json(json!({ "success": false, "message": "Not logged in" }));
    }
    let address = draft["deliveryAddress"].as_str().unwrap_or("");
    if address.contains("reject") {
        Json(json!({ "success": false, "message": "Out of stock" }))
    } else {
        Json(json!({ "success": true, "orderId": 555 }))
    }
}

async fn stub_orders_list(headers: HeaderMap) -> Json<Value> {
    if stub_session(&headers).is_none() {
        return Json(json!({ "success": false, "message": "Not logged in" }));
    }
    Json(json!({
        "success": true,
        "orders": [
            {
                "orderId": 555,
                "orderDate": "2024-05-01 12:00",
                "totalAmount": 10.99,
                "status": "pending",
                "deliveryAddress": "123 Main St",
                "paymentMethod": "cash",
                "items": [
                    {
                        "productId": 1,
                        "productName": "Spring Rolls",
                        "quantity": 1,
                        "unitPrice": 5.99,
                        "category": "appetizer"
                    }
                ]
            }
        ]
    }))
}

fn spawn_stub_backend() -> u16 {
    let port = pick_free_port();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("stub runtime");
        runtime.block_on(async move {
            let app = Router::new()
                .route("/LoginServlet", get(stub_login_servlet))
                .route("/login", post(stub_login))
                .route("/ProductServlet", get(stub_products))
                .route(
                    "/OrderServlet",
                    get(stub_orders_list).post(stub_order_create),
                );
            let addr = format!("127.0.0.1:{port}");
            let listener = tokio::net::TcpListener::bind(addr).await.expect("bind stub");
            axum::serve(listener, app).await.expect("serve stub");
        });
    });
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/cart")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let stub_port = spawn_stub_backend();
    let port = pick_free_port();
    let cart_path = unique_cart_path();
    let child = Command::new(env!("CARGO_BIN_EXE_foodhub_web"))
        .env("PORT", port.to_string())
        .env("FOODHUB_BACKEND_URL", format!("http://127.0.0.1:{stub_port}"))
        .env("FOODHUB_CART_PATH", cart_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

fn cart_cookie_from(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("foodhub_cart="))
        .map(|value| value.split(';').next().unwrap_or(value).to_string())
}

async fn add_to_cart(
    client: &Client,
    base_url: &str,
    cookie: Option<&str>,
    product_id: i64,
    quantity: u32,
) -> (CartBody, Option<String>) {
    let mut request = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "productId": product_id, "quantity": quantity }));
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let response = request.send().await.unwrap();
    let minted = cart_cookie_from(&response);
    (response.json().await.unwrap(), minted)
}

#[tokio::test]
async fn http_adding_the_same_product_twice_merges_lines() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let (first, minted) = add_to_cart(&client, &server.base_url, None, 1, 1).await;
    assert!(first.success);
    assert_eq!(first.items.len(), 1);
    assert_eq!(first.item_count, 1);
    let cookie = minted.expect("first add mints a cart cookie");

    let (second, _) = add_to_cart(&client, &server.base_url, Some(&cookie), 1, 2).await;
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].product_id, 1);
    assert_eq!(second.items[0].quantity, 3);
    assert_eq!(second.item_count, 3);
}

#[tokio::test]
async fn http_quantity_dropping_to_zero_removes_the_line() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let (_, minted) = add_to_cart(&client, &server.base_url, None, 1, 1).await;
    let cookie = minted.unwrap();

    let body: CartBody = client
        .post(format!("{}/api/cart/quantity", server.base_url))
        .header(header::COOKIE, &cookie)
        .json(&json!({ "productId": 1, "delta": -1 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body.items.is_empty());
    assert_eq!(body.item_count, 0);
    assert_eq!(body.notice.as_deref(), Some("Item removed from cart"));
}

#[tokio::test]
async fn http_out_of_stock_product_is_refused() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let body: Value = client
        .post(format!("{}/api/cart/add", server.base_url))
        .json(&json!({ "productId": 2, "quantity": 1 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Sorry, this item is out of stock"));
}

#[tokio::test]
async fn http_checkout_page_redirects_anonymous_visitors_to_login() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap();

    let response = client
        .get(format!("{}/checkout", server.base_url))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    assert_eq!(location, "/login?redirect=checkout");
}

#[tokio::test]
async fn http_checkout_with_an_empty_cart_is_refused_locally() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let body: Value = client
        .post(format!("{}/api/checkout", server.base_url))
        .header(header::COOKIE, "session=valid")
        .json(&json!({ "deliveryAddress": "123 Main St", "paymentMethod": "cash" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Your cart is empty!"));
}

#[tokio::test]
async fn http_successful_checkout_clears_the_cart() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let (_, minted) = add_to_cart(&client, &server.base_url, None, 1, 2).await;
    let cart_cookie = minted.unwrap();
    let cookie = format!("{cart_cookie}; session=valid");

    let body: Value = client
        .post(format!("{}/api/checkout", server.base_url))
        .header(header::COOKIE, &cookie)
        .json(&json!({ "deliveryAddress": "123 Main St", "paymentMethod": "cash" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["orderId"], json!(555));

    let cart: CartBody = client
        .get(format!("{}/api/cart", server.base_url))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(cart.items.is_empty());
    assert_eq!(cart.item_count, 0);
}

#[tokio::test]
async fn http_failed_checkout_keeps_the_cart_and_surfaces_the_message() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let (_, minted) = add_to_cart(&client, &server.base_url, None, 1, 1).await;
    let cart_cookie = minted.unwrap();
    let cookie = format!("{cart_cookie}; session=valid");

    let body: Value = client
        .post(format!("{}/api/checkout", server.base_url))
        .header(header::COOKIE, &cookie)
        .json(&json!({ "deliveryAddress": "reject this one", "paymentMethod": "cash" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Out of stock"));

    let cart: CartBody = client
        .get(format!("{}/api/cart", server.base_url))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 1);
}

#[tokio::test]
async fn http_checkout_api_requires_a_session() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/checkout", server.base_url))
        .json(&json!({ "deliveryAddress": "123 Main St", "paymentMethod": "cash" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], json!("Please login to continue"));
}

#[tokio::test]
async fn http_login_sets_session_and_remember_cookies() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/login", server.base_url))
        .json(&json!({ "username": "alice", "password": "secret123", "remember": true }))
        .send()
        .await
        .unwrap();

    let cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("session=valid")));
    assert!(cookies.iter().any(|c| c.starts_with("foodhub_remember=alice")));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["redirect"], json!("/"));
}

#[tokio::test]
async fn http_reorder_fills_the_cart_from_a_past_order() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/reorder", server.base_url))
        .header(header::COOKIE, "session=valid")
        .json(&json!({ "orderId": 555 }))
        .send()
        .await
        .unwrap();
    let minted = cart_cookie_from(&response);
    let body: CartBody = response.json().await.unwrap();

    assert!(body.success);
    assert!(minted.is_some());
    assert_eq!(body.items.len(), 1);
    assert_eq!(body.items[0].product_id, 1);
    assert_eq!(body.notice.as_deref(), Some("Items added to cart!"));
}
