use std::{env, path::PathBuf};

/// Runtime configuration, all from the environment with local defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL of the external FoodHub backend this service proxies.
    pub backend_url: String,
    pub cart_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        let backend_url = env::var("FOODHUB_BACKEND_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8081/201Project".to_string());

        let cart_path = env::var("FOODHUB_CART_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/carts.json"));

        Self {
            port,
            backend_url: backend_url.trim_end_matches('/').to_string(),
            cart_path,
        }
    }
}
