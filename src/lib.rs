pub mod application;
pub mod config;
pub mod console;
pub mod domain;
pub mod errors;
pub mod infrastructure;

use application::cart_store::CartStore;
use application::session::CartSession;
use infrastructure::order_client::HttpOrderGateway;
use infrastructure::storage::FileStorage;

pub use config::Config;
pub use errors::AppError;

/// Build the file-backed session and HTTP gateway described by `config`.
pub fn build_session(
    config: &Config,
) -> Result<(CartSession<FileStorage>, HttpOrderGateway), AppError> {
    let storage = FileStorage::new(&config.storage_path);
    let store = CartStore::with_key(storage, config.storage_key.clone());
    let session = CartSession::with_policy(store, config.quantity_policy);
    let gateway = HttpOrderGateway::new(&config.api_base_url, config.http_timeout)?;
    Ok((session, gateway))
}
