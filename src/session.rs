use crate::errors::AppError;
use crate::models::SessionUser;
use crate::state::AppState;
use axum::http::HeaderMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const CART_COOKIE: &str = "foodhub_cart";
pub const REMEMBER_COOKIE: &str = "foodhub_remember";

/// The browser's raw `Cookie` header, forwarded verbatim upstream so the
/// backend session travels with every proxied call.
pub fn forwarded_cookies(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::COOKIE)
        .and_then(|value| value.to_str().ok())
}

pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = forwarded_cookies(headers)?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

static MINT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Issues a fresh cart id for browsers that have none yet.
pub fn mint_cart_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let serial = MINT_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("c{nanos:x}-{serial:x}")
}

/// Asks the backend who is logged in. Transport failure reads as "nobody",
/// which is exactly what the fail-open navbar pages want.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<SessionUser> {
    state
        .backend
        .check_session(forwarded_cookies(headers))
        .await
}

/// Gate for authenticated API routes.
pub async fn require_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<SessionUser, AppError> {
    current_user(state, headers)
        .await
        .ok_or_else(|| AppError::unauthorized("Please login to continue"))
}

/// Gate for the admin dashboard and its API.
pub async fn require_admin(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<SessionUser, AppError> {
    let user = require_user(state, headers).await?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(AppError::forbidden("Admin access required"))
    }
}

/// Where protected pages send unauthenticated visitors.
pub fn login_redirect(target: &str) -> String {
    format!("/login?redirect={target}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_str(raw).unwrap(),
        );
        headers
    }

    #[test]
    fn cookie_value_picks_the_named_pair() {
        let headers = headers_with_cookie("JSESSIONID=abc; foodhub_cart=c42; other=1");
        assert_eq!(
            cookie_value(&headers, CART_COOKIE),
            Some("c42".to_string())
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_value_handles_absent_header() {
        assert_eq!(cookie_value(&HeaderMap::new(), CART_COOKIE), None);
    }

    #[test]
    fn minted_ids_are_distinct() {
        assert_ne!(mint_cart_id(), mint_cart_id());
    }

    #[test]
    fn login_redirect_carries_the_return_target() {
        assert_eq!(login_redirect("checkout"), "/login?redirect=checkout");
    }
}
