use crate::errors::AppError;
use crate::models::CartBook;
use std::path::Path;
use tokio::fs;
use tracing::error;

/// Reads the cart book from disk. A missing or malformed file is treated as
/// an empty book so a bad write can never take the service down.
pub async fn load_carts(path: &Path) -> CartBook {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(book) => book,
            Err(err) => {
                error!("failed to parse cart file: {err}");
                CartBook::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => CartBook::default(),
        Err(err) => {
            error!("failed to read cart file: {err}");
            CartBook::default()
        }
    }
}

/// Writes the whole book in a single write, replacing prior content.
pub async fn persist_carts(path: &Path, book: &CartBook) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(book).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
