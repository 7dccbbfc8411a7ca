use crate::backend::BackendClient;
use crate::config::Config;
use crate::models::CartBook;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub cart_path: PathBuf,
    pub carts: Arc<Mutex<CartBook>>,
    pub backend: BackendClient,
}

impl AppState {
    pub fn new(config: &Config, carts: CartBook) -> Self {
        Self {
            cart_path: config.cart_path.clone(),
            carts: Arc::new(Mutex::new(carts)),
            backend: BackendClient::new(config.backend_url.clone()),
        }
    }
}
