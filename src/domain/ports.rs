use super::errors::{CheckoutError, StorageError};
use super::order::{OrderDraft, PlacedOrder};

/// Key-value persistence in the shape of browser local storage.
pub trait Storage: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// The order endpoints of the storefront backend.
#[allow(async_fn_in_trait)]
pub trait OrderGateway {
    async fn create_order(&self, draft: &OrderDraft) -> Result<PlacedOrder, CheckoutError>;
    async fn list_orders(&self, today_only: bool) -> Result<Vec<PlacedOrder>, CheckoutError>;
    async fn get_order(&self, id: i64) -> Result<Option<PlacedOrder>, CheckoutError>;
}
