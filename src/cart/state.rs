//! Shopping Cart State Management
//!
//! In-memory cart storage shared by the cart widgets.

use super::{helpers::update_cart_with_new_items, models::CartItem};
use dashmap::DashMap;

/// Carts keyed by cart id.
///
/// DashMap allows concurrent access without external Mutexes.
#[derive(Debug, Default)]
pub struct CartStore {
    carts: DashMap<String, Vec<CartItem>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `items` into the cart and returns its new contents.
    pub fn add_items(&self, cart_id: &str, items: Vec<CartItem>) -> Vec<CartItem> {
        let mut cart_items = self.carts.entry(cart_id.to_owned()).or_default();
        update_cart_with_new_items(&mut cart_items, items);
        cart_items.clone()
    }

    /// Removes the cart, returning whatever it held.
    pub fn checkout(&self, cart_id: &str) -> Vec<CartItem> {
        self.carts
            .remove(cart_id)
            .map(|(_, items)| items)
            .unwrap_or_default()
    }
}
