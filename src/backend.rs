use crate::errors::AppError;
use crate::models::{Order, OrderDraft, Product, SessionUser};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;

/// HTTP client for the external FoodHub backend. Every call forwards the
/// browser's cookie header so the upstream session travels with the request.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SessionEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "loggedIn")]
    logged_in: bool,
    #[serde(default)]
    user: Option<SessionUser>,
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct OrdersEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    users: Vec<SessionUser>,
}

/// Generic `{success, message?}` reply to a mutating call, with whatever
/// extras the endpoint includes.
#[derive(Debug, Deserialize)]
pub struct MutationReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "orderId")]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

/// Auth replies carry upstream `Set-Cookie` headers that must reach the
/// browser for the session to stick.
#[derive(Debug)]
pub struct AuthReply {
    pub body: MutationReply,
    pub set_cookies: Vec<String>,
}

impl BackendClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    fn with_cookie(&self, builder: RequestBuilder, cookie: Option<&str>) -> RequestBuilder {
        match cookie {
            Some(value) => builder.header(COOKIE, value),
            None => builder,
        }
    }

    fn collect_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok().map(str::to_string))
            .collect()
    }

    /// Queries the session-check endpoint. Any transport failure or a
    /// non-success body is reported as "not logged in".
    pub async fn check_session(&self, cookie: Option<&str>) -> Option<SessionUser> {
        let url = format!("{}/LoginServlet?action=checkSession", self.base_url);
        let request = self.with_cookie(self.http.get(url), cookie);

        let envelope: SessionEnvelope = match request.send().await {
            Ok(response) => match response.json().await {
                Ok(body) => body,
                Err(err) => {
                    debug!("session check body unreadable: {err}");
                    return None;
                }
            },
            Err(err) => {
                debug!("session check failed: {err}");
                return None;
            }
        };

        if envelope.success || envelope.logged_in {
            envelope.user
        } else {
            None
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthReply, AppError> {
        let url = format!("{}/login", self.base_url);
        let response = self
            .http
            .post(url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let set_cookies = Self::collect_cookies(&response);
        let body = response.json().await?;
        Ok(AuthReply { body, set_cookies })
    }

    pub async fn register(
        &self,
        fields: &[(&str, &str)],
    ) -> Result<AuthReply, AppError> {
        let url = format!("{}/register", self.base_url);
        let response = self.http.post(url).form(fields).send().await?;

        let set_cookies = Self::collect_cookies(&response);
        let body = response.json().await?;
        Ok(AuthReply { body, set_cookies })
    }

    pub async fn logout(&self, cookie: Option<&str>) -> Result<AuthReply, AppError> {
        let url = format!("{}/LoginServlet?action=logout", self.base_url);
        let response = self.with_cookie(self.http.get(url), cookie).send().await?;

        let set_cookies = Self::collect_cookies(&response);
        let body = response.json().await.unwrap_or(MutationReply {
            success: true,
            message: None,
            order_id: None,
            role: None,
            user: None,
        });
        Ok(AuthReply { body, set_cookies })
    }

    pub async fn list_products(&self, cookie: Option<&str>) -> Result<Vec<Product>, AppError> {
        let url = format!("{}/ProductServlet?action=list", self.base_url);
        let envelope: ProductsEnvelope = self
            .with_cookie(self.http.get(url), cookie)
            .send()
            .await?
            .json()
            .await?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "Failed to load products".to_string());
            return Err(AppError::bad_gateway(message));
        }
        Ok(envelope.products)
    }

    pub async fn create_order(
        &self,
        cookie: Option<&str>,
        draft: &OrderDraft,
    ) -> Result<MutationReply, AppError> {
        let url = format!("{}/OrderServlet?action=create", self.base_url);
        let reply = self
            .with_cookie(self.http.post(url), cookie)
            .json(draft)
            .send()
            .await?
            .json()
            .await?;
        Ok(reply)
    }

    pub async fn list_my_orders(&self, cookie: Option<&str>) -> Result<Vec<Order>, AppError> {
        self.fetch_orders("list", cookie).await
    }

    pub async fn list_all_orders(&self, cookie: Option<&str>) -> Result<Vec<Order>, AppError> {
        self.fetch_orders("listAll", cookie).await
    }

    async fn fetch_orders(
        &self,
        action: &str,
        cookie: Option<&str>,
    ) -> Result<Vec<Order>, AppError> {
        let url = format!("{}/OrderServlet?action={action}", self.base_url);
        let envelope: OrdersEnvelope = self
            .with_cookie(self.http.get(url), cookie)
            .send()
            .await?
            .json()
            .await?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "Failed to load orders".to_string());
            return Err(AppError::bad_gateway(message));
        }
        Ok(envelope.orders)
    }

    pub async fn list_users(&self, cookie: Option<&str>) -> Result<Vec<SessionUser>, AppError> {
        let url = format!("{}/LoginServlet?action=listUsers", self.base_url);
        let envelope: UsersEnvelope = self
            .with_cookie(self.http.get(url), cookie)
            .send()
            .await?
            .json()
            .await?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "Failed to load users".to_string());
            return Err(AppError::bad_gateway(message));
        }
        Ok(envelope.users)
    }

    /// Admin product create/update/delete, form-encoded like the servlet
    /// expects. `fields` already contains the `action` pair.
    pub async fn save_product(
        &self,
        cookie: Option<&str>,
        fields: &[(&str, String)],
    ) -> Result<MutationReply, AppError> {
        let url = format!("{}/ProductServlet", self.base_url);
        let reply = self
            .with_cookie(self.http.post(url), cookie)
            .form(fields)
            .send()
            .await?
            .json()
            .await?;
        Ok(reply)
    }
}
