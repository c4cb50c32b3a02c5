use crate::domain::cart::{CartItem, Product, ProductId};
use crate::domain::errors::StorageError;
use crate::domain::ports::Storage;

use super::pricing;

pub const DEFAULT_CART_KEY: &str = "shoppingCart";

/// Durable cart contents: one JSON array under a single storage key.
///
/// Every operation is a full read-modify-write against the storage. Errors
/// are logged and swallowed so callers always see a usable cart.
pub struct CartStore<S> {
    storage: S,
    key: String,
}

impl<S: Storage> CartStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_CART_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn get_items(&self) -> Vec<CartItem> {
        match self.read() {
            Ok(items) => items,
            Err(e) => {
                log::error!("Failed to load cart from '{}': {}", self.key, e);
                Vec::new()
            }
        }
    }

    pub fn save_items(&self, items: &[CartItem]) {
        if let Err(e) = self.write(items) {
            log::error!("Failed to save cart to '{}': {}", self.key, e);
        }
    }

    /// Appends a new line with quantity 1, even when the product is already
    /// in the cart. Returns the total quantity across all lines.
    pub fn add_item(&self, product: &Product) -> u64 {
        let mut items = self.get_items();
        items.push(CartItem::from_product(product));
        self.save_items(&items);
        log::debug!("Added product {} to cart ({} lines)", product.id, items.len());
        pricing::total_quantity(&items)
    }

    /// Drops every line carrying `product_id`.
    pub fn remove_item(&self, product_id: &ProductId) {
        let mut items = self.get_items();
        let before = items.len();
        items.retain(|item| &item.id != product_id);
        self.save_items(&items);
        log::debug!(
            "Removed {} line(s) for product {}",
            before - items.len(),
            product_id
        );
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.delete(&self.key) {
            log::error!("Failed to clear cart '{}': {}", self.key, e);
        }
    }

    fn read(&self) -> Result<Vec<CartItem>, StorageError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(Vec::new());
        };
        let mut items: Vec<CartItem> = serde_json::from_str(&raw)?;
        for item in items.iter_mut().filter(|item| item.quantity == 0) {
            log::warn!("Stored quantity 0 for product {}, using 1", item.id);
            item.quantity = 1;
        }
        Ok(items)
    }

    fn write(&self, items: &[CartItem]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.storage.set(&self.key, &raw)
    }
}
